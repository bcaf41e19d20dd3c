use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a 2D trajectory.
///
/// Identifiers are 1-based: trajectory `1` lives in store slot `0`. The
/// conversion happens only through [`TrajId::index`] and
/// [`TrajId::from_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TrajId(u32);

impl TrajId {
    /// Validates a raw identifier; zero and negative values mean "no trajectory".
    pub fn new(raw: i64) -> Option<Self> {
        if raw > 0 && raw <= u32::MAX as i64 {
            Some(Self(raw as u32))
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for TrajId {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        TrajId::new(raw).ok_or_else(|| format!("invalid trajectory id {raw}"))
    }
}

impl From<TrajId> for i64 {
    fn from(id: TrajId) -> Self {
        id.0 as i64
    }
}

impl fmt::Display for TrajId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Index into the hit store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitId(pub u32);

/// Index into the space-point store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpacePointId(pub u32);

/// 1-based 2D vertex identifier (vertex `1` is store slot `0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

/// Identifier of a particle-flow object within its volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PfoId(pub u32);

/// A detector drift volume (cryostat + TPC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId {
    pub cryostat: u16,
    pub tpc: u16,
}

/// One readout plane inside a volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneId {
    pub volume: VolumeId,
    pub plane: u8,
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C{}:T{}:P{}",
            self.volume.cryostat, self.volume.tpc, self.plane
        )
    }
}
