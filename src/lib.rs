#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod context;
pub mod diagnostics;
pub mod matcher;
pub mod projection;
pub mod spacepoints;
pub mod store;
pub mod types;

// Reference collaborators and tool plumbing.
pub mod algebra;
pub mod angle;
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: matcher + per-volume context.
pub use crate::context::VolumeContext;
pub use crate::matcher::{MatchEngine, MatchParams};
pub use crate::projection::{ProjectionIndex, ProjectionParams};

// High-level diagnostics returned by the matcher.
pub use crate::diagnostics::{MatchReport, VolumeReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use track_match3d::prelude::*;
///
/// # fn main() {
/// let volume = VolumeId { cryostat: 0, tpc: 0 };
/// let mut ctx = VolumeContext::new(volume, 3, TrajectoryStore::default());
///
/// let engine = MatchEngine::new(BasicTrajectoryOps::default());
/// let report = engine.process_volume(&mut ctx, &UniformGeometry::default());
/// println!("pfos={} seeds={:?}", ctx.pfos.len(), report.matching.map(|m| m.seeds_processed));
/// # }
/// ```
pub mod prelude {
    pub use crate::algebra::{BasicTrajectoryOps, UniformGeometry};
    pub use crate::store::{DetectorGeometry, TrajectoryOps, TrajectoryStore};
    pub use crate::types::{PlaneId, TrajId, VolumeId};
    pub use crate::{MatchEngine, MatchParams, VolumeContext};
}
