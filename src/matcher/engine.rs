use super::endpoints::resolve_endpoints;
use super::merge::merge_broken_trajectories;
use super::params::MatchParams;
use crate::algebra::BasicTrajectoryOps;
use crate::context::VolumeContext;
use crate::diagnostics::{
    timing::elapsed_ms, MatchReport, MatchSkip, PlaneCandidates, SeedRecord, SeedSkip,
    TimingBreakdown, VolumeReport,
};
use crate::projection::{build_projection_index, ProjectionParams};
use crate::spacepoints::SpacePointIndex;
use crate::store::{DetectorGeometry, Pfo, TrajPoint, TrajectoryOps, TrajectoryStore};
use crate::types::{PfoId, SpacePointId, TrajId, VolumeId};
use log::{debug, warn};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Space-point driven cross-plane matcher.
///
/// Seeds are visited longest first. Each seed collects the trajectories that
/// share its space points, repairs broken fragments plane by plane and, when
/// enough planes remain, records a particle-flow object in the volume
/// context.
#[derive(Clone, Debug)]
pub struct MatchEngine<O> {
    pub params: MatchParams,
    pub projection: ProjectionParams,
    ops: O,
}

impl Default for MatchEngine<BasicTrajectoryOps> {
    fn default() -> Self {
        Self::new(BasicTrajectoryOps::default())
    }
}

impl<O: TrajectoryOps> MatchEngine<O> {
    pub fn new(ops: O) -> Self {
        Self {
            params: MatchParams::default(),
            projection: ProjectionParams::default(),
            ops,
        }
    }

    pub fn with_params(mut self, params: MatchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_projection(mut self, projection: ProjectionParams) -> Self {
        self.projection = projection;
        self
    }

    /// Full pass over one volume: drift-distance filter, projection index
    /// rebuild, then [`Self::match_3d_spts`].
    pub fn process_volume<G: DetectorGeometry + ?Sized>(
        &self,
        ctx: &mut VolumeContext,
        geometry: &G,
    ) -> VolumeReport {
        let drift_distance = geometry.drift_distance(ctx.volume);
        let mut report = VolumeReport {
            volume: ctx.volume,
            drift_distance,
            timings: TimingBreakdown::default(),
            skipped: None,
            projection: None,
            matching: None,
        };
        if drift_distance < self.params.min_drift_distance {
            debug!(
                "process_volume: skipping {:?}, drift distance {:.1} < {:.1}",
                ctx.volume, drift_distance, self.params.min_drift_distance
            );
            report.skipped = Some(MatchSkip::ShortDrift);
            return report;
        }

        let start = Instant::now();
        let build = build_projection_index(&mut ctx.store, ctx.volume, geometry, &self.projection);
        ctx.projections = build.index;
        report.projection = Some(build.stage);
        report.timings.record_since("projection", start);

        let start = Instant::now();
        let matching = self.match_3d_spts(ctx);
        report.timings.record_since("match_3d_spts", start);
        report.skipped = matching.skipped;
        report.matching = Some(matching);
        report
    }

    /// Matches trajectories of `ctx.volume` across planes through shared
    /// space points, appending new PFOs to `ctx.pfos`.
    pub fn match_3d_spts(&self, ctx: &mut VolumeContext) -> MatchReport {
        let start = Instant::now();
        let mut report = MatchReport::new(ctx.volume);
        if !ctx.hits_ordered {
            debug!("match_3d_spts: hit associations unordered, nothing done");
            report.skipped = Some(MatchSkip::HitsUnordered);
            return report;
        }

        let VolumeContext {
            volume,
            num_planes,
            step_dir,
            store,
            space_points,
            pfos,
            ..
        } = ctx;
        let seeds = seed_order(store, *volume);
        report.eligible = seeds.len();
        let index = SpacePointIndex::new(space_points.as_slice());
        let mut scope = SeedScope {
            volume: *volume,
            num_planes: *num_planes as usize,
            step_dir: *step_dir,
            store,
            pfos,
        };

        for (k, &(seed, span)) in seeds.iter().enumerate() {
            if k >= self.params.max_seeds {
                debug!(
                    "match_3d_spts: seed cap {} reached, {} seeds left",
                    self.params.max_seeds,
                    seeds.len() - k
                );
                report.seed_cap_reached = true;
                break;
            }
            report.seeds_processed += 1;
            let record = self.match_seed(&mut scope, &index, seed, span);
            if record.pfo.is_some() {
                report.pfos_created += 1;
            }
            report.seeds.push(record);
        }

        report.elapsed_ms = elapsed_ms(start);
        debug!(
            "match_3d_spts: volume {:?} eligible={} processed={} pfos={}",
            report.volume, report.eligible, report.seeds_processed, report.pfos_created
        );
        report
    }

    fn match_seed(
        &self,
        scope: &mut SeedScope<'_>,
        index: &SpacePointIndex<'_>,
        seed: TrajId,
        span: usize,
    ) -> SeedRecord {
        let mut record = SeedRecord::new(seed, span);
        // Earlier seeds of this pass may have merged or matched this one
        // since the ordering was taken; the live flags are authoritative.
        let Some(tj) = scope.store.get(seed) else {
            return record.skipped(SeedSkip::Killed);
        };
        if tj.flags.killed {
            return record.skipped(SeedSkip::Killed);
        }
        if tj.flags.matched_3d {
            return record.skipped(SeedSkip::AlreadyMatched);
        }

        // one list per point of the charge range, empty where uncharged
        let points: Vec<&TrajPoint> = tj.range_points().map(|(_, tp)| tp).collect();
        let spt_lists = point_space_points(index, &points);

        // unmatched trajectories sharing a space point, in first-seen order
        let mut near: Vec<TrajId> = Vec::new();
        for spts in spt_lists.iter().filter(|l| !l.is_empty()) {
            for id in index.trajectories_near(&scope.store.hits, spts) {
                if scope.store.get(id).is_some_and(|t| t.flags.matched_3d) {
                    continue;
                }
                if !near.contains(&id) {
                    near.push(id);
                }
            }
        }
        if near.is_empty() {
            return record.skipped(SeedSkip::NoCandidates);
        }

        let min_span = self.params.min_candidate_span(span);
        let mut in_plane: Vec<Vec<TrajId>> = vec![Vec::new(); scope.num_planes];
        for &id in &near {
            let Some(mtj) = scope.store.get(id) else {
                continue;
            };
            if mtj.span() < min_span || !mtj.is_available() || mtj.plane.volume != scope.volume {
                continue;
            }
            match in_plane.get_mut(mtj.plane.plane as usize) {
                Some(list) => list.push(id),
                None => debug!("match_seed: {} on {} outside the volume's planes", id, mtj.plane),
            }
        }
        debug!("match_seed: {} span {} candidates {:?}", seed, span, in_plane);

        for (plane, list) in in_plane.iter_mut().enumerate() {
            if list.len() < 2 {
                continue;
            }
            let input = list.clone();
            let outcome = merge_broken_trajectories(scope.store, &self.ops, scope.step_dir, list);
            if let Err(failure) = outcome.result {
                warn!(
                    "match_seed: merge of {:?} on plane {} failed ({:?}), skipping this combination",
                    input, plane, failure
                );
            }
            record.merges.push(outcome.into_record(plane as u8, input));
        }

        // first entry per plane that is still free to join a PFO
        let chosen: Vec<Option<TrajId>> = in_plane
            .iter()
            .map(|list| {
                list.iter()
                    .copied()
                    .find(|&id| scope.store.get(id).is_some_and(|t| t.is_available()))
            })
            .collect();
        record.candidates = in_plane
            .into_iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(plane, tj_ids)| PlaneCandidates {
                plane: plane as u8,
                tj_ids,
            })
            .collect();
        let planes_available = chosen.iter().flatten().count();
        if planes_available < self.params.min_planes {
            debug!(
                "match_seed: {} has candidates in {} planes, need {}",
                seed, planes_available, self.params.min_planes
            );
            return record.skipped(SeedSkip::TooFewPlanes);
        }

        let mut pfo = Pfo::new(PfoId(scope.pfos.len() as u32 + 1), scope.volume);
        for id in chosen.into_iter().flatten() {
            pfo.tj_ids.push(id);
            if let Some(tj) = scope.store.get_mut(id) {
                tj.flags.matched_3d = true;
            }
        }
        match resolve_endpoints(&mut pfo, &spt_lists, seed, index, &scope.store.hits) {
            Ok(span) => record.endpoints = Some(span),
            Err(failure) => {
                warn!("match_seed: end points of pfo {:?} not set ({:?})", pfo.id, failure);
                record.endpoint_failure = Some(failure);
            }
        }
        debug!("match_seed: {} -> pfo {:?} with {:?}", seed, pfo.id, pfo.tj_ids);
        record.pfo = Some(pfo.id);
        scope.pfos.push(pfo);
        record
    }
}

/// Per-volume state a seed reads and mutates.
struct SeedScope<'c> {
    volume: VolumeId,
    num_planes: usize,
    step_dir: i8,
    store: &'c mut TrajectoryStore,
    pfos: &'c mut Vec<Pfo>,
}

/// Non-killed, non-in-shower trajectories of the volume, longest span first.
/// Equal spans keep store order.
fn seed_order(store: &TrajectoryStore, volume: VolumeId) -> Vec<(TrajId, usize)> {
    let mut seeds: Vec<(TrajId, usize)> = store
        .trajectories
        .iter()
        .filter(|tj| !tj.flags.killed && !tj.flags.in_shower && tj.plane.volume == volume)
        .map(|tj| (tj.id, tj.span()))
        .collect();
    seeds.sort_by(|a, b| b.1.cmp(&a.1));
    seeds
}

fn point_space_points(index: &SpacePointIndex<'_>, points: &[&TrajPoint]) -> Vec<Vec<SpacePointId>> {
    #[cfg(feature = "parallel")]
    {
        points
            .par_iter()
            .map(|tp| index.associated_with_point(tp))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        points
            .iter()
            .map(|tp| index.associated_with_point(tp))
            .collect()
    }
}
