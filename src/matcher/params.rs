//! Tunables of the space-point matcher.
//!
//! The defaults reproduce the established behaviour exactly; they are
//! exposed as parameters so throughput guards can be tuned per dataset.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Seed trajectories handled per pass, in span order.
    pub max_seeds: usize,
    /// Candidate span must reach this fraction of the seed span.
    pub min_span_fraction: f32,
    /// Lower bound on the candidate span requirement.
    pub min_span_floor: usize,
    /// Planes that must still offer an unmatched candidate after merging.
    pub min_planes: usize,
    /// Volumes with a shorter drift distance are not processed.
    pub min_drift_distance: f32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            max_seeds: 11,
            min_span_fraction: 0.1,
            min_span_floor: 2,
            min_planes: 2,
            min_drift_distance: 25.0,
        }
    }
}

impl MatchParams {
    /// Minimum candidate span for a seed of span `seed_span`:
    /// `max(floor, floor(fraction * seed_span))`.
    pub fn min_candidate_span(&self, seed_span: usize) -> usize {
        let scaled = (self.min_span_fraction * seed_span as f32).floor();
        (scaled.max(0.0) as usize).max(self.min_span_floor)
    }
}
