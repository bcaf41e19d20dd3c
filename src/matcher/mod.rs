//! Cross-plane matching of 2D trajectories into particle-flow objects.
//!
//! - [`MatchEngine`] drives the per-volume pass (seed ordering, candidate
//!   collection through shared space points, PFO creation).
//! - [`merge_broken_trajectories`] repairs same-plane fragments of one
//!   particle before a PFO is formed.
//! - [`resolve_endpoints`] assigns the two 3D end points of a PFO.
//!
//! Seeds are processed strictly in order on the calling thread: a trajectory
//! matched or merged while handling one seed must be visible to the next.

mod endpoints;
mod engine;
mod merge;
mod params;

pub use endpoints::resolve_endpoints;
pub use engine::MatchEngine;
pub use merge::{merge_broken_trajectories, MergeOutcome};
pub use params::MatchParams;
