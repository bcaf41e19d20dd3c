#![allow(dead_code)]

use nalgebra::Vector3;
use std::ops::Range;
use track_match3d::store::{Hit, PointHit, SpacePoint, TrajPoint, Trajectory, TrajectoryStore};
use track_match3d::types::{HitId, PlaneId, SpacePointId, TrajId, VolumeId};
use track_match3d::VolumeContext;

/// Builds a single-volume event: straight trajectories with one owned hit per
/// point, and space points linking chosen points across trajectories.
pub struct EventBuilder {
    volume: VolumeId,
    num_planes: u8,
    store: TrajectoryStore,
    space_points: Vec<SpacePoint>,
}

impl EventBuilder {
    pub fn new(num_planes: u8) -> Self {
        Self {
            volume: VolumeId { cryostat: 0, tpc: 0 },
            num_planes,
            store: TrajectoryStore::default(),
            space_points: Vec::new(),
        }
    }

    /// Adds a trajectory on `plane` with one charged point per wire.
    pub fn trajectory(&mut self, plane: u8, wires: Range<i32>) -> TrajId {
        assert!(plane < self.num_planes, "plane {plane} outside the volume");
        let plane = PlaneId {
            volume: self.volume,
            plane,
        };
        let points: Vec<TrajPoint> = wires
            .map(|w| {
                let tick = 200.0 + 4.0 * w as f32;
                self.store.hits.push(Hit {
                    owner: None,
                    peak_time: tick,
                    rms: 2.0,
                });
                TrajPoint {
                    pos: [w as f32, tick],
                    dir: [1.0, 0.0],
                    chg: 50.0,
                    hits: vec![PointHit {
                        hit: HitId(self.store.hits.len() as u32 - 1),
                        used: true,
                    }],
                }
            })
            .collect();
        assert!(!points.is_empty(), "trajectory needs at least one point");
        let id = self
            .store
            .push(Trajectory::new(TrajId::from_index(0), plane, points));
        self.store.claim_hits(id);
        id
    }

    /// Hit used by point `ipt` of trajectory `tj`.
    pub fn hit_at(&self, tj: TrajId, ipt: usize) -> HitId {
        let tj = self.store.get(tj).expect("trajectory exists");
        tj.points[ipt].hits[0].hit
    }

    /// Adds a space point made of the hits of the listed `(trajectory, point)` pairs.
    pub fn space_point(&mut self, members: &[(TrajId, usize)], pos: [f32; 3]) -> SpacePointId {
        let hits = members.iter().map(|&(tj, ipt)| self.hit_at(tj, ipt)).collect();
        self.space_points.push(SpacePoint {
            pos: Vector3::new(pos[0], pos[1], pos[2]),
            hits,
        });
        SpacePointId(self.space_points.len() as u32 - 1)
    }

    pub fn build(self) -> VolumeContext {
        VolumeContext::new(self.volume, self.num_planes, self.store)
            .with_space_points(self.space_points)
    }
}

/// Asserts that no PFO holds two constituents from the same plane.
pub fn assert_plane_exclusive(ctx: &VolumeContext) {
    for pfo in &ctx.pfos {
        let mut planes: Vec<u8> = pfo
            .tj_ids
            .iter()
            .map(|&id| ctx.store.get(id).expect("constituent exists").plane.plane)
            .collect();
        let n = planes.len();
        planes.sort_unstable();
        planes.dedup();
        assert_eq!(planes.len(), n, "pfo {:?} repeats a plane: {:?}", pfo.id, pfo.tj_ids);
    }
}
