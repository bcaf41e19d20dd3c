use crate::types::{PlaneId, TrajId};
use serde::{Deserialize, Serialize};

/// Projection of one charge-bearing trajectory point onto the drift axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionEntry {
    pub wire: i32,
    pub xlo: f32,
    pub xhi: f32,
    pub dir: [f32; 2],
    pub plane: PlaneId,
    pub tj_id: TrajId,
    /// Point index inside the owning trajectory.
    pub ipt: usize,
    /// Point count of the owning trajectory's charge range.
    pub npts: usize,
    /// 0 when the trajectory already has a confident 3D vertex, else 1.
    pub score: u8,
    pub showerlike: bool,
}

impl ProjectionEntry {
    pub fn overlaps(&self, xlo: f32, xhi: f32) -> bool {
        self.xlo <= xhi && self.xhi >= xlo
    }
}

/// Volume-wide projection array, sorted by ascending `xlo`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectionIndex {
    entries: Vec<ProjectionEntry>,
}

impl ProjectionIndex {
    pub(crate) fn from_sorted(entries: Vec<ProjectionEntry>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].xlo <= w[1].xlo));
        Self { entries }
    }

    pub fn entries(&self) -> &[ProjectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose `[xlo, xhi]` interval overlaps the query interval.
    ///
    /// Only the prefix with `xlo <= xhi` can overlap; it is located by binary
    /// search on the sort order.
    pub fn overlapping(&self, xlo: f32, xhi: f32) -> impl Iterator<Item = &ProjectionEntry> {
        let end = self.entries.partition_point(|e| e.xlo <= xhi);
        self.entries[..end]
            .iter()
            .filter(move |e| e.overlaps(xlo, xhi))
    }
}
