use crate::types::{TrajId, VertexId};
use serde::{Deserialize, Serialize};

/// Why a broken-trajectory merge did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeFailure {
    TooFewTrajectories,
    MissingTrajectory,
    Killed,
    AlreadyMatched,
    /// The physical merge refused a compatible pair.
    StoreRejected,
    /// The merge reported an identifier that is not in the store.
    InvalidResult,
}

/// One fold step of the merger.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStep {
    pub accumulator: TrajId,
    pub next: TrajId,
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_cleared: Option<VertexId>,
    pub bragg_flags_cleared: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TrajId>,
}

/// Merge attempt on the candidates of one plane.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRecord {
    pub plane: u8,
    pub input: Vec<TrajId>,
    /// Spatial order the fold followed.
    pub order: Vec<TrajId>,
    pub steps: Vec<MergeStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<TrajId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<MergeFailure>,
}
