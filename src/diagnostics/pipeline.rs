use super::{MatchReport, MatchSkip, ProjectionStage, TimingBreakdown};
use crate::types::VolumeId;
use serde::{Deserialize, Serialize};

/// End-to-end trace of one volume processed by
/// [`MatchEngine::process_volume`](crate::matcher::MatchEngine::process_volume).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeReport {
    pub volume: VolumeId,
    pub drift_distance: f32,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<MatchSkip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching: Option<MatchReport>,
}

impl VolumeReport {
    pub fn pfos_created(&self) -> usize {
        self.matching.as_ref().map_or(0, |m| m.pfos_created)
    }
}
