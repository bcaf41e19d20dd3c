//! Reference implementations of the collaborator traits.
//!
//! The full 2D reconstruction supplies its own trajectory algebra and
//! detector services. These lightweight versions back the demo binary and
//! the tests:
//!
//! - [`BasicTrajectoryOps`] treats two fragments as compatible when the gap
//!   between the trailing end of the first and the leading end of the second
//!   is short along the step direction and their directions agree. Merging
//!   concatenates the charge ranges into a new trajectory and kills the
//!   inputs.
//! - [`UniformGeometry`] models planes with a fixed wire count and a linear
//!   drift-time calibration.

use crate::angle::{angle_between, norm};
use crate::store::{DetectorGeometry, TrajPoint, Trajectory, TrajectoryOps, TrajectoryStore};
use crate::types::{PlaneId, TrajId, VertexId, VolumeId};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicTrajectoryOps {
    /// Largest wire gap bridged by a merge.
    pub max_wire_gap: f32,
    /// Largest direction change (degrees) across the joint.
    pub max_angle_deg: f32,
}

impl Default for BasicTrajectoryOps {
    fn default() -> Self {
        Self {
            max_wire_gap: 8.0,
            max_angle_deg: 30.0,
        }
    }
}

impl TrajectoryOps for BasicTrajectoryOps {
    fn reverse(&self, store: &mut TrajectoryStore, id: TrajId) {
        let Some(tj) = store.get_mut(id) else {
            return;
        };
        let n = tj.points.len();
        if n == 0 {
            return;
        }
        tj.points.reverse();
        let last = n - 1;
        let [e0, e1] = tj.end_pts;
        tj.end_pts = [last - e1.min(last), last - e0.min(last)];
        for tp in &mut tj.points {
            tp.dir = [-tp.dir[0], -tp.dir[1]];
        }
        tj.stop_flags.swap(0, 1);
        tj.vertex_ids.swap(0, 1);
        tj.step_dir = -tj.step_dir;
    }

    fn compatible_merge(&self, store: &TrajectoryStore, first: TrajId, second: TrajId) -> bool {
        let (Some(a), Some(b)) = (store.get(first), store.get(second)) else {
            return false;
        };
        if a.flags.killed || b.flags.killed || a.plane != b.plane {
            return false;
        }
        let (Some(tail), Some(head)) = (a.last_point(), b.first_point()) else {
            return false;
        };
        let gap = (head.pos[0] - tail.pos[0]) * a.step_dir as f32;
        if gap < 0.0 || gap > self.max_wire_gap {
            debug!(
                "compatible_merge: {} -> {} rejected, wire gap {:.2}",
                first, second, gap
            );
            return false;
        }
        if norm(&tail.dir) > 1e-6 && norm(&head.dir) > 1e-6 {
            let angle = angle_between(&tail.dir, &head.dir);
            if angle > self.max_angle_deg.to_radians() {
                debug!(
                    "compatible_merge: {} -> {} rejected, angle {:.1} deg",
                    first,
                    second,
                    angle.to_degrees()
                );
                return false;
            }
        }
        true
    }

    fn merge_and_store(
        &self,
        store: &mut TrajectoryStore,
        first: TrajId,
        second: TrajId,
    ) -> Option<TrajId> {
        let a = store.get(first)?;
        let b = store.get(second)?;
        if first == second || a.flags.killed || b.flags.killed || a.plane != b.plane {
            return None;
        }
        let points: Vec<TrajPoint> = a
            .range_points()
            .chain(b.range_points())
            .map(|(_, tp)| tp.clone())
            .collect();
        let mut merged = Trajectory::new(first, a.plane, points);
        merged.step_dir = a.step_dir;
        merged.stop_flags = [a.stop_flags[0], b.stop_flags[1]];
        merged.vertex_ids = [a.vertex_ids[0], b.vertex_ids[1]];
        merged.pdg_code = a.pdg_code;
        merged.flags.hi_vx3_score = a.flags.hi_vx3_score || b.flags.hi_vx3_score;

        for id in [first, second] {
            if let Some(tj) = store.get_mut(id) {
                tj.flags.killed = true;
            }
        }
        let id = store.push(merged);
        store.claim_hits(id);
        debug!("merge_and_store: {} + {} -> {}", first, second, id);
        Some(id)
    }

    fn make_vertex_obsolete(&self, store: &mut TrajectoryStore, vertex: VertexId) {
        if let Some(vx) = store.vertex_mut(vertex) {
            vx.obsolete = true;
        }
        for tj in &mut store.trajectories {
            for end in tj.vertex_ids.iter_mut() {
                if *end == Some(vertex) {
                    *end = None;
                }
            }
        }
    }
}

/// Planes with a fixed wire count and a linear drift calibration
/// `x = x_offset + ticks * x_per_tick`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformGeometry {
    pub wires_per_plane: Vec<u32>,
    pub x_per_tick: f32,
    pub x_offset: f32,
    pub drift_distance: f32,
}

impl Default for UniformGeometry {
    fn default() -> Self {
        Self {
            wires_per_plane: vec![2400, 2400, 3456],
            x_per_tick: 0.08,
            x_offset: 0.0,
            drift_distance: 256.0,
        }
    }
}

impl DetectorGeometry for UniformGeometry {
    fn has_wire(&self, plane: PlaneId, wire: i32) -> bool {
        let Some(&count) = self.wires_per_plane.get(plane.plane as usize) else {
            return false;
        };
        wire >= 0 && (wire as u32) < count
    }

    fn ticks_to_x(&self, ticks: f32, _plane: PlaneId) -> f32 {
        self.x_offset + ticks * self.x_per_tick
    }

    fn drift_distance(&self, _volume: VolumeId) -> f32 {
        self.drift_distance
    }
}
