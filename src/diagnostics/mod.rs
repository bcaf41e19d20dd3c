//! Diagnostics data model returned by the matching stages.
//!
//! Every non-fatal failure is reported as a typed reason code rather than
//! only a log line, so callers and tests can tell why a match did not
//! happen. `VolumeReport` is the entry point returned by
//! `MatchEngine::process_volume`; `MatchReport` covers one
//! `match_3d_spts` pass.

pub mod endpoints;
pub mod matching;
pub mod merge;
pub mod pipeline;
pub mod projection;
pub mod timing;

pub use endpoints::{EndpointFailure, EndpointSpan};
pub use matching::{MatchReport, MatchSkip, PlaneCandidates, SeedRecord, SeedSkip};
pub use merge::{MergeFailure, MergeRecord, MergeStep};
pub use pipeline::VolumeReport;
pub use projection::ProjectionStage;
pub use timing::{StageTiming, TimingBreakdown};
