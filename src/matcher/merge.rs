//! Repair of trajectories broken into fragments within one plane.
//!
//! Fragments are folded in spatial order along the step direction, so a
//! three-way break reduces correctly whichever pair turns out incompatible.
//! Vertex and stop-flag fixups happen before each physical merge because the
//! merge itself has no 3D context: a vertex joining the two fragments is
//! retired and a Bragg flag on either adjoining end is cleared.

use crate::diagnostics::{MergeFailure, MergeRecord, MergeStep};
use crate::store::{TrajectoryOps, TrajectoryStore};
use crate::types::TrajId;
use log::{debug, error, warn};
use std::cmp::Ordering;

/// Trace and result of [`merge_broken_trajectories`].
#[derive(Clone, Debug)]
pub struct MergeOutcome {
    /// Spatial order followed by the fold (empty when validation failed).
    pub order: Vec<TrajId>,
    pub steps: Vec<MergeStep>,
    pub result: Result<TrajId, MergeFailure>,
}

impl MergeOutcome {
    fn failed(failure: MergeFailure) -> Self {
        Self {
            order: Vec::new(),
            steps: Vec::new(),
            result: Err(failure),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_record(self, plane: u8, input: Vec<TrajId>) -> MergeRecord {
        let (merged, failure) = match self.result {
            Ok(id) => (Some(id), None),
            Err(f) => (None, Some(f)),
        };
        MergeRecord {
            plane,
            input,
            order: self.order,
            steps: self.steps,
            merged,
            failure,
        }
    }
}

/// Merges same-plane fragments believed to be one particle.
///
/// On success `tj_ids` is replaced by the single surviving identifier. A
/// rejected validation leaves `tj_ids` as passed in. When the store refuses a
/// merge after earlier pairs were merged, `tj_ids` holds the partial result
/// followed by the fragments still alive, in spatial order.
pub fn merge_broken_trajectories<O: TrajectoryOps + ?Sized>(
    store: &mut TrajectoryStore,
    ops: &O,
    step_dir: i8,
    tj_ids: &mut Vec<TrajId>,
) -> MergeOutcome {
    if tj_ids.len() < 2 {
        return MergeOutcome::failed(MergeFailure::TooFewTrajectories);
    }
    for &id in tj_ids.iter() {
        let Some(tj) = store.get(id) else {
            return MergeOutcome::failed(MergeFailure::MissingTrajectory);
        };
        if tj.flags.killed {
            return MergeOutcome::failed(MergeFailure::Killed);
        }
        if tj.flags.matched_3d {
            return MergeOutcome::failed(MergeFailure::AlreadyMatched);
        }
    }
    debug!("merge_broken_trajectories: working on {:?}", tj_ids);

    for &id in tj_ids.iter() {
        if store.get(id).is_some_and(|tj| tj.step_dir != step_dir) {
            ops.reverse(store, id);
        }
    }

    // Sort by the leading point's wire coordinate along the step direction.
    let sign = if step_dir < 0 { -1.0 } else { 1.0 };
    let mut keyed: Vec<(TrajId, f32)> = tj_ids
        .iter()
        .map(|&id| {
            let wire = store
                .get(id)
                .and_then(|tj| tj.first_point())
                .map_or(f32::INFINITY, |tp| sign * tp.pos[0]);
            (id, wire)
        })
        .collect();
    keyed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let order: Vec<TrajId> = keyed.into_iter().map(|(id, _)| id).collect();
    debug!("merge_broken_trajectories: spatial order {:?}", order);

    let mut steps = Vec::with_capacity(order.len() - 1);
    let mut acc = order[0];
    for &next in &order[1..] {
        let mut step = MergeStep {
            accumulator: acc,
            next,
            compatible: ops.compatible_merge(store, acc, next),
            vertex_cleared: None,
            bragg_flags_cleared: 0,
            result: None,
        };
        if !step.compatible {
            steps.push(step);
            continue;
        }

        let shared_vertex = match (store.get(acc), store.get(next)) {
            (Some(a), Some(b)) if a.vertex_ids[1].is_some() && a.vertex_ids[1] == b.vertex_ids[0] => {
                a.vertex_ids[1]
            }
            _ => None,
        };
        if let Some(vx) = shared_vertex {
            ops.make_vertex_obsolete(store, vx);
            step.vertex_cleared = Some(vx);
        }
        // a stop signature between two fragments of one particle is spurious
        if let Some(tj) = store.get_mut(acc) {
            if tj.stop_flags[1].bragg {
                tj.stop_flags[1].bragg = false;
                step.bragg_flags_cleared += 1;
            }
        }
        if let Some(tj) = store.get_mut(next) {
            if tj.stop_flags[0].bragg {
                tj.stop_flags[0].bragg = false;
                step.bragg_flags_cleared += 1;
            }
        }

        let Some(merged) = ops.merge_and_store(store, acc, next) else {
            debug!("merge_broken_trajectories: store rejected {} + {}", acc, next);
            if acc != order[0] {
                let survivors = surviving_fragments(store, acc, &order);
                warn!(
                    "merge_broken_trajectories: fold stopped at {}, keeping partial result {} in {:?}",
                    next, acc, survivors
                );
                *tj_ids = survivors;
            }
            steps.push(step);
            return MergeOutcome {
                order,
                steps,
                result: Err(MergeFailure::StoreRejected),
            };
        };
        if store.get(merged).is_none() {
            error!(
                "merge_broken_trajectories: merge of {} + {} returned unknown id {}",
                acc, next, merged
            );
            steps.push(step);
            return MergeOutcome {
                order,
                steps,
                result: Err(MergeFailure::InvalidResult),
            };
        }
        step.result = Some(merged);
        steps.push(step);
        acc = merged;
    }

    tj_ids.clear();
    tj_ids.push(acc);
    debug!("merge_broken_trajectories: returns {}", acc);
    MergeOutcome {
        order,
        steps,
        result: Ok(acc),
    }
}

fn surviving_fragments(store: &TrajectoryStore, acc: TrajId, order: &[TrajId]) -> Vec<TrajId> {
    let rest = order
        .iter()
        .copied()
        .filter(|&id| id != acc && store.get(id).is_some_and(|tj| !tj.flags.killed));
    std::iter::once(acc).chain(rest).collect()
}
