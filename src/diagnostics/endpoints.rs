use serde::{Deserialize, Serialize};

/// Why the 3D end points of a particle-flow object were not resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointFailure {
    ShowerPfo,
    TooFewConstituents,
    NoSpacePointLists,
    NoSpacePoints,
    ReferenceNotConstituent,
}

/// Reference-trajectory offsets where every constituent shares a space point.
/// `None` on a side means that end was left unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSpan {
    pub first: Option<usize>,
    pub last: Option<usize>,
}

impl EndpointSpan {
    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.last.is_some()
    }
}
