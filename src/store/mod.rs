//! Data model shared by the matching stages.
//!
//! [`TrajectoryStore`] owns the trajectories, hits and 2D vertices of an
//! event. Trajectories are never removed: merges append a new trajectory and
//! mark the inputs killed, so a [`TrajId`] stays valid for the lifetime of
//! the store.

mod hit;
mod pfo;
mod traits;
mod trajectory;

pub use hit::{Hit, SpacePoint, Vertex2d};
pub use pfo::{Pfo, ELECTRON_PDG, SHOWER_PDG};
pub use traits::{DetectorGeometry, TrajectoryOps};
pub use trajectory::{PointHit, StopFlags, TrajFlags, TrajPoint, Trajectory};

use crate::types::{HitId, TrajId, VertexId};
use serde::{Deserialize, Serialize};

/// Deserialization is checked: trajectory and vertex ids must equal their
/// slot index plus one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "StoreData")]
pub struct TrajectoryStore {
    pub trajectories: Vec<Trajectory>,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub vertices: Vec<Vertex2d>,
}

#[derive(Deserialize)]
struct StoreData {
    trajectories: Vec<Trajectory>,
    #[serde(default)]
    hits: Vec<Hit>,
    #[serde(default)]
    vertices: Vec<Vertex2d>,
}

impl TryFrom<StoreData> for TrajectoryStore {
    type Error = String;

    fn try_from(data: StoreData) -> Result<Self, Self::Error> {
        for (slot, tj) in data.trajectories.iter().enumerate() {
            if tj.id.index() != slot {
                return Err(format!(
                    "trajectory in slot {slot} has id {}, expected {}",
                    tj.id,
                    TrajId::from_index(slot)
                ));
            }
        }
        for (slot, vx) in data.vertices.iter().enumerate() {
            if vx.id.index() != Some(slot) {
                return Err(format!(
                    "vertex in slot {slot} has id {}, expected {}",
                    vx.id.0,
                    slot + 1
                ));
            }
        }
        Ok(Self {
            trajectories: data.trajectories,
            hits: data.hits,
            vertices: data.vertices,
        })
    }
}

impl TrajectoryStore {
    pub fn get(&self, id: TrajId) -> Option<&Trajectory> {
        self.trajectories.get(id.index())
    }

    pub fn get_mut(&mut self, id: TrajId) -> Option<&mut Trajectory> {
        self.trajectories.get_mut(id.index())
    }

    /// Appends a trajectory, assigning it the next identifier.
    pub fn push(&mut self, mut tj: Trajectory) -> TrajId {
        let id = TrajId::from_index(self.trajectories.len());
        tj.id = id;
        self.trajectories.push(tj);
        id
    }

    pub fn hit(&self, id: HitId) -> Option<&Hit> {
        self.hits.get(id.0 as usize)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex2d> {
        id.index().and_then(|i| self.vertices.get_mut(i))
    }

    /// Points every hit used by the trajectory's charge range back at it.
    pub fn claim_hits(&mut self, id: TrajId) {
        let Some(tj) = self.trajectories.get(id.index()) else {
            return;
        };
        let hits: Vec<HitId> = tj
            .range_points()
            .flat_map(|(_, tp)| tp.used_hits())
            .collect();
        for hit in hits {
            if let Some(h) = self.hits.get_mut(hit.0 as usize) {
                h.owner = Some(id);
            }
        }
    }
}
