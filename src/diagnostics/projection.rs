use serde::{Deserialize, Serialize};

/// Summary of one projection-index rebuild.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionStage {
    pub elapsed_ms: f64,
    pub trajectories: usize,
    pub charged_points: usize,
    pub entries: usize,
    pub skipped_missing_wire: usize,
    pub match_flags_reset: usize,
}
