use crate::types::{HitId, PlaneId, TrajId, VertexId};
use serde::{Deserialize, Serialize};

/// Hit reference attached to a trajectory point; `used` marks hits that
/// actually contribute to the point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointHit {
    pub hit: HitId,
    #[serde(default = "default_used")]
    pub used: bool,
}

fn default_used() -> bool {
    true
}

/// A single point of a 2D trajectory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrajPoint {
    /// `[wire, drift time]`; the time coordinate is in WSE units
    /// (ticks scaled by `units_per_tick`).
    pub pos: [f32; 2],
    #[serde(default)]
    pub dir: [f32; 2],
    pub chg: f32,
    #[serde(default)]
    pub hits: Vec<PointHit>,
}

impl TrajPoint {
    pub fn has_charge(&self) -> bool {
        self.chg > 0.0
    }

    pub fn used_hits(&self) -> impl Iterator<Item = HitId> + '_ {
        self.hits.iter().filter(|h| h.used).map(|h| h.hit)
    }
}

/// Algorithm-modification tags carried by a trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajFlags {
    /// Logically deleted; excluded from all matching and merging.
    pub killed: bool,
    /// Already a constituent of a particle-flow object.
    pub matched_3d: bool,
    pub in_shower: bool,
    pub shower_tj: bool,
    pub hi_vx3_score: bool,
}

/// End-of-track signatures detected at one end of a trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopFlags {
    pub bragg: bool,
}

/// 2D trajectory confined to one plane of one volume.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trajectory {
    pub id: TrajId,
    pub plane: PlaneId,
    pub points: Vec<TrajPoint>,
    /// First and last charge-bearing points, inclusive.
    pub end_pts: [usize; 2],
    #[serde(default = "default_step_dir")]
    pub step_dir: i8,
    #[serde(default)]
    pub flags: TrajFlags,
    #[serde(default)]
    pub stop_flags: [StopFlags; 2],
    #[serde(default)]
    pub vertex_ids: [Option<VertexId>; 2],
    #[serde(default)]
    pub pdg_code: i32,
}

fn default_step_dir() -> i8 {
    1
}

impl Trajectory {
    /// Builds a trajectory whose charge range covers every point.
    pub fn new(id: TrajId, plane: PlaneId, points: Vec<TrajPoint>) -> Self {
        let last = points.len().saturating_sub(1);
        Self {
            id,
            plane,
            points,
            end_pts: [0, last],
            step_dir: 1,
            flags: TrajFlags::default(),
            stop_flags: [StopFlags::default(); 2],
            vertex_ids: [None, None],
            pdg_code: 0,
        }
    }

    /// Point-count span `end_pts[1] - end_pts[0]`.
    pub fn span(&self) -> usize {
        self.end_pts[1].saturating_sub(self.end_pts[0])
    }

    /// Number of points in the charge range, `span() + 1`.
    pub fn range_len(&self) -> usize {
        self.span() + 1
    }

    /// Iterates `(point index, point)` over `[end_pts[0], end_pts[1]]`,
    /// clamped to the stored points.
    pub fn range_points(&self) -> impl Iterator<Item = (usize, &TrajPoint)> {
        let end = self.end_pts[1].min(self.points.len().saturating_sub(1));
        let start = self.end_pts[0];
        self.points
            .iter()
            .enumerate()
            .skip(start)
            .take((end + 1).saturating_sub(start))
    }

    pub fn charged_points(&self) -> impl Iterator<Item = (usize, &TrajPoint)> {
        self.range_points().filter(|(_, tp)| tp.has_charge())
    }

    pub fn num_charged_points(&self) -> usize {
        self.charged_points().count()
    }

    /// Trajectory available for matching: neither killed nor already matched.
    pub fn is_available(&self) -> bool {
        !self.flags.killed && !self.flags.matched_3d
    }

    pub fn first_point(&self) -> Option<&TrajPoint> {
        self.points.get(self.end_pts[0])
    }

    pub fn last_point(&self) -> Option<&TrajPoint> {
        self.points.get(self.end_pts[1])
    }
}
