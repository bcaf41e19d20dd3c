//! Read-only lookups between hits, trajectory points and 3D space points.
//!
//! The index keeps a hit → space-point multimap built once from the space
//! point store. Space points are visited in ascending order while the map is
//! built, so [`SpacePointIndex::at_hit`] returns exactly what a linear scan of
//! the store would. Every union below is duplicate-free and keeps the order
//! of first discovery; only [`SpacePointIndex::trajectories_near`] sorts its
//! output. Downstream tie-breaks depend on this ordering.
//!
//! Hit ownership is not cached: merges reassign hits between trajectories,
//! so owner lookups always read the live hit store passed by the caller.
//! Out-of-range space-point or hit references are skipped.

use crate::store::{Hit, SpacePoint, TrajPoint, Trajectory};
use crate::types::{HitId, SpacePointId, TrajId};
use std::collections::HashMap;

pub struct SpacePointIndex<'a> {
    space_points: &'a [SpacePoint],
    by_hit: HashMap<HitId, Vec<SpacePointId>>,
}

impl<'a> SpacePointIndex<'a> {
    pub fn new(space_points: &'a [SpacePoint]) -> Self {
        let mut by_hit: HashMap<HitId, Vec<SpacePointId>> = HashMap::new();
        for (isp, spt) in space_points.iter().enumerate() {
            let id = SpacePointId(isp as u32);
            for &hit in &spt.hits {
                let list = by_hit.entry(hit).or_default();
                // a space point listing the same hit twice is reported once
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
        }
        Self {
            space_points,
            by_hit,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.space_points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.space_points.len()
    }

    pub fn space_point(&self, id: SpacePointId) -> Option<&'a SpacePoint> {
        self.space_points.get(id.0 as usize)
    }

    /// Space points whose hit set contains `hit`, in store order.
    pub fn at_hit(&self, hit: HitId) -> &[SpacePointId] {
        self.by_hit.get(&hit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Space points reachable from the used hits of a charge-bearing point.
    pub fn associated_with_point(&self, tp: &TrajPoint) -> Vec<SpacePointId> {
        let mut out = Vec::new();
        if !tp.has_charge() {
            return out;
        }
        for hit in tp.used_hits() {
            extend_unique(&mut out, self.at_hit(hit));
        }
        out
    }

    /// Union over the charge-bearing points of the trajectory's charge range.
    pub fn associated_with_trajectory(&self, tj: &Trajectory) -> Vec<SpacePointId> {
        let mut out = Vec::new();
        if tj.flags.killed {
            return out;
        }
        for (_, tp) in tj.charged_points() {
            let spts = self.associated_with_point(tp);
            extend_unique(&mut out, &spts);
        }
        out
    }

    /// Ascending, duplicate-free owners of the hits in the listed space points.
    pub fn trajectories_near(&self, hits: &[Hit], spts: &[SpacePointId]) -> Vec<TrajId> {
        let mut out: Vec<TrajId> = Vec::new();
        for isp in spts {
            let Some(spt) = self.space_point(*isp) else {
                continue;
            };
            for iht in &spt.hits {
                let Some(owner) = hits.get(iht.0 as usize).and_then(|h| h.owner) else {
                    continue;
                };
                if !out.contains(&owner) {
                    out.push(owner);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

fn extend_unique<T: Copy + PartialEq>(out: &mut Vec<T>, items: &[T]) {
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
}
