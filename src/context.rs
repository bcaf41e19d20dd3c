//! Per-volume reconstruction context.
//!
//! One [`VolumeContext`] is created for every drift volume processed. It owns
//! the trajectory store, the space points and the outputs (PFO collection,
//! projection index) for the duration of that volume and is passed by
//! reference into each stage. Nothing is retained across volumes.

use crate::projection::ProjectionIndex;
use crate::spacepoints::SpacePointIndex;
use crate::store::{Pfo, SpacePoint, TrajectoryStore};
use crate::types::VolumeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeContext {
    pub volume: VolumeId,
    #[serde(default = "default_num_planes")]
    pub num_planes: u8,
    /// Canonical step direction of trajectories in this volume.
    #[serde(default = "default_step_dir")]
    pub step_dir: i8,
    /// Upstream guarantee that hit-to-trajectory associations are ordered.
    #[serde(default = "default_hits_ordered")]
    pub hits_ordered: bool,
    pub store: TrajectoryStore,
    #[serde(default)]
    pub space_points: Vec<SpacePoint>,
    #[serde(default)]
    pub pfos: Vec<Pfo>,
    #[serde(skip)]
    pub projections: ProjectionIndex,
}

fn default_num_planes() -> u8 {
    3
}

fn default_step_dir() -> i8 {
    1
}

fn default_hits_ordered() -> bool {
    true
}

impl VolumeContext {
    pub fn new(volume: VolumeId, num_planes: u8, store: TrajectoryStore) -> Self {
        Self {
            volume,
            num_planes,
            step_dir: 1,
            hits_ordered: true,
            store,
            space_points: Vec::new(),
            pfos: Vec::new(),
            projections: ProjectionIndex::default(),
        }
    }

    pub fn with_space_points(mut self, space_points: Vec<SpacePoint>) -> Self {
        self.space_points = space_points;
        self
    }

    /// Lookup index over this volume's space points.
    pub fn spacepoint_index(&self) -> SpacePointIndex<'_> {
        SpacePointIndex::new(&self.space_points)
    }
}
