use super::endpoints::{EndpointFailure, EndpointSpan};
use super::merge::MergeRecord;
use crate::types::{PfoId, TrajId, VolumeId};
use serde::{Deserialize, Serialize};

/// Why a whole volume was not matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSkip {
    /// Hit-to-trajectory associations are not ordered upstream.
    HitsUnordered,
    /// Drift distance below the configured minimum.
    ShortDrift,
}

/// Why a seed trajectory did not produce a particle-flow object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedSkip {
    Killed,
    AlreadyMatched,
    NoCandidates,
    TooFewPlanes,
}

/// Candidate trajectories of one plane, after merging.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneCandidates {
    pub plane: u8,
    pub tj_ids: Vec<TrajId>,
}

/// Outcome of one seed trajectory.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    pub seed: TrajId,
    pub span: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<PlaneCandidates>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<MergeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<SeedSkip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfo: Option<PfoId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_failure: Option<EndpointFailure>,
}

impl SeedRecord {
    pub fn new(seed: TrajId, span: usize) -> Self {
        Self {
            seed,
            span,
            candidates: Vec::new(),
            merges: Vec::new(),
            skip: None,
            pfo: None,
            endpoints: None,
            endpoint_failure: None,
        }
    }

    pub fn skipped(mut self, reason: SeedSkip) -> Self {
        self.skip = Some(reason);
        self
    }
}

/// Trace of one space-point matching pass over a volume.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub volume: VolumeId,
    pub elapsed_ms: f64,
    /// Trajectories that entered the seed ordering.
    pub eligible: usize,
    pub seeds_processed: usize,
    pub pfos_created: usize,
    pub seed_cap_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<MatchSkip>,
    pub seeds: Vec<SeedRecord>,
}

impl MatchReport {
    pub fn new(volume: VolumeId) -> Self {
        Self {
            volume,
            elapsed_ms: 0.0,
            eligible: 0,
            seeds_processed: 0,
            pfos_created: 0,
            seed_cap_reached: false,
            skipped: None,
            seeds: Vec::new(),
        }
    }

    pub fn seed(&self, seed: TrajId) -> Option<&SeedRecord> {
        self.seeds.iter().find(|s| s.seed == seed)
    }
}
