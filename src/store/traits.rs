//! Seams to the collaborators that own trajectory algebra and detector
//! geometry. The matcher only calls through these traits.

use super::TrajectoryStore;
use crate::types::{PlaneId, TrajId, VertexId, VolumeId};

/// Low-level trajectory operations provided by the 2D reconstruction.
pub trait TrajectoryOps {
    /// Reverses the trajectory in place, flipping its step direction.
    fn reverse(&self, store: &mut TrajectoryStore, id: TrajId);

    /// Whether `second` can be appended to `first` as one trajectory.
    fn compatible_merge(&self, store: &TrajectoryStore, first: TrajId, second: TrajId) -> bool;

    /// Merges `second` onto `first`, stores the result and returns its id.
    /// `None` when the store refuses the merge.
    fn merge_and_store(
        &self,
        store: &mut TrajectoryStore,
        first: TrajId,
        second: TrajId,
    ) -> Option<TrajId>;

    /// Retires a 2D vertex and detaches it from the trajectories using it.
    fn make_vertex_obsolete(&self, store: &mut TrajectoryStore, vertex: VertexId);
}

/// Geometry and calibration services.
pub trait DetectorGeometry {
    fn has_wire(&self, plane: PlaneId, wire: i32) -> bool;

    /// Converts a drift time in ticks into the along-drift coordinate.
    fn ticks_to_x(&self, ticks: f32, plane: PlaneId) -> f32;

    fn drift_distance(&self, volume: VolumeId) -> f32;
}
