//! Global per-point projection index of a volume.
//!
//! Every charge-bearing point of every eligible trajectory is projected to a
//! discrete wire and an along-drift interval `[xlo, xhi]`. The array is
//! rebuilt from scratch on each call and sorted by `xlo`, which is the
//! contract interval-overlap searches rely on (see
//! [`ProjectionIndex::overlapping`]).
//!
//! Eligible trajectories are those of the target volume that are not killed,
//! not tagged in-shower and not shower trajectories themselves.

mod entry;
mod options;

pub use entry::{ProjectionEntry, ProjectionIndex};
pub use options::ProjectionParams;

use crate::diagnostics::ProjectionStage;
use crate::store::{DetectorGeometry, Hit, TrajPoint, Trajectory, TrajectoryStore, ELECTRON_PDG};
use crate::types::VolumeId;
use log::debug;
use std::cmp::Ordering;
use std::time::Instant;

/// Result of [`build_projection_index`].
#[derive(Clone, Debug)]
pub struct ProjectionBuild {
    pub index: ProjectionIndex,
    pub stage: ProjectionStage,
}

fn is_eligible(tj: &Trajectory, volume: VolumeId) -> bool {
    !tj.flags.killed && !tj.flags.in_shower && !tj.flags.shower_tj && tj.plane.volume == volume
}

/// Rebuilds the projection index for `volume`.
pub fn build_projection_index<G: DetectorGeometry + ?Sized>(
    store: &mut TrajectoryStore,
    volume: VolumeId,
    geometry: &G,
    params: &ProjectionParams,
) -> ProjectionBuild {
    let start = Instant::now();
    let mut stage = ProjectionStage::default();

    let mut charged = 0usize;
    for tj in store.trajectories.iter_mut() {
        if !is_eligible(tj, volume) {
            continue;
        }
        stage.trajectories += 1;
        charged += tj.num_charged_points();
        if params.reset_match_flags && tj.flags.matched_3d {
            tj.flags.matched_3d = false;
            stage.match_flags_reset += 1;
        }
    }
    stage.charged_points = charged;
    if charged < 2 {
        debug!(
            "build_projection_index: {} charged points in volume {:?}, index left empty",
            charged, volume
        );
        stage.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        return ProjectionBuild {
            index: ProjectionIndex::default(),
            stage,
        };
    }

    let mut entries = Vec::with_capacity(charged);
    for tj in &store.trajectories {
        if !is_eligible(tj, volume) {
            continue;
        }
        let score = if tj.flags.hi_vx3_score { 0 } else { 1 };
        let showerlike = tj.pdg_code == ELECTRON_PDG;
        let npts = tj.range_len();
        for (ipt, tp) in tj.charged_points() {
            let wire = tp.pos[0].round_ties_even() as i32;
            if !geometry.has_wire(tj.plane, wire) {
                stage.skipped_missing_wire += 1;
                continue;
            }
            let upt = params.units_per_tick;
            let xpos = geometry.ticks_to_x(tp.pos[1] / upt, tj.plane);
            let pos_plus_rms = tp.pos[1] + hits_rms_time(tp, &store.hits, upt);
            let rms = geometry.ticks_to_x(pos_plus_rms / upt, tj.plane) - xpos;
            let half_width = rms.max(params.min_half_width);
            entries.push(ProjectionEntry {
                wire,
                xlo: xpos - half_width,
                xhi: xpos + half_width,
                dir: tp.dir,
                plane: tj.plane,
                tj_id: tj.id,
                ipt,
                npts,
                score,
                showerlike,
            });
        }
    }

    entries.sort_by(|a, b| a.xlo.partial_cmp(&b.xlo).unwrap_or(Ordering::Equal));
    stage.entries = entries.len();
    stage.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        "build_projection_index: volume {:?} trajectories={} entries={} missing_wire={}",
        volume, stage.trajectories, stage.entries, stage.skipped_missing_wire
    );
    ProjectionBuild {
        index: ProjectionIndex::from_sorted(entries),
        stage,
    }
}

/// Half spread of the used hits' `[peak - rms, peak + rms]` envelope, in WSE
/// units. A single hit contributes its own rms.
pub fn hits_rms_time(tp: &TrajPoint, hits: &[Hit], units_per_tick: f32) -> f32 {
    let mut used = tp.used_hits().filter_map(|id| hits.get(id.0 as usize));
    let Some(first) = used.next() else {
        return 0.0;
    };
    let mut lo = first.peak_time - first.rms;
    let mut hi = first.peak_time + first.rms;
    for hit in used {
        lo = lo.min(hit.peak_time - hit.rms);
        hi = hi.max(hit.peak_time + hit.rms);
    }
    0.5 * (hi - lo) * units_per_tick
}
