mod common;

use common::init_logging;
use common::synthetic_event::{assert_plane_exclusive, EventBuilder};
use nalgebra::Vector3;
use track_match3d::algebra::UniformGeometry;
use track_match3d::diagnostics::{EndpointFailure, EndpointSpan, MatchSkip, SeedSkip};
use track_match3d::types::TrajId;
use track_match3d::{MatchEngine, VolumeContext};

/// Three planes with spans 20/22/19 sharing four space points along their
/// full length.
fn three_plane_event() -> (VolumeContext, [TrajId; 3]) {
    let mut ev = EventBuilder::new(3);
    let u = ev.trajectory(0, 100..121);
    let v = ev.trajectory(1, 300..323);
    let w = ev.trajectory(2, 500..520);
    let shared = [(0, 0, 0, 0), (7, 6, 6, 10), (14, 13, 12, 20), (22, 20, 19, 30)];
    for &(iv, iu, iw, z) in &shared {
        ev.space_point(&[(u, iu), (v, iv), (w, iw)], [10.0, -5.0, z as f32]);
    }
    (ev.build(), [u, v, w])
}

#[test]
fn three_planes_form_one_pfo() {
    init_logging();
    let (mut ctx, [u, v, w]) = three_plane_event();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    assert_eq!(ctx.pfos.len(), 1, "expected a single pfo: {:?}", ctx.pfos);
    assert_eq!(report.pfos_created, 1);
    let pfo = &ctx.pfos[0];
    assert_eq!(pfo.tj_ids, vec![u, v, w]);
    assert_eq!(pfo.xyz[0], Vector3::new(10.0, -5.0, 0.0));
    assert_eq!(pfo.xyz[1], Vector3::new(10.0, -5.0, 30.0));
    let index = ctx.spacepoint_index();
    for id in [u, v, w] {
        let tj = ctx.store.get(id).expect("constituent exists");
        assert!(tj.flags.matched_3d);
        assert_eq!(index.associated_with_trajectory(tj).len(), 4);
    }

    // longest trajectory seeds the match, the others find themselves matched
    let seed = report.seed(v).expect("seed record");
    assert_eq!(seed.pfo, Some(pfo.id));
    assert_eq!(
        seed.endpoints,
        Some(EndpointSpan {
            first: Some(0),
            last: Some(22)
        })
    );
    assert_eq!(report.seeds[0].seed, v);
    for id in [u, w] {
        assert_eq!(
            report.seed(id).and_then(|s| s.skip),
            Some(SeedSkip::AlreadyMatched)
        );
    }
    assert_plane_exclusive(&ctx);
}

#[test]
fn rematching_finds_nothing_new() {
    init_logging();
    let (mut ctx, _) = three_plane_event();
    let engine = MatchEngine::default();
    engine.match_3d_spts(&mut ctx);
    let first: Vec<_> = ctx.pfos.iter().map(|p| p.tj_ids.clone()).collect();

    let again = engine.match_3d_spts(&mut ctx);
    assert_eq!(again.pfos_created, 0);
    let second: Vec<_> = ctx.pfos.iter().map(|p| p.tj_ids.clone()).collect();
    assert_eq!(first, second);
    assert!(again
        .seeds
        .iter()
        .all(|s| s.skip == Some(SeedSkip::AlreadyMatched)));
}

#[test]
fn broken_plane_is_merged_before_matching() {
    init_logging();
    let mut ev = EventBuilder::new(2);
    let seed = ev.trajectory(0, 0..41);
    // gap of five wires between the fragments
    let head = ev.trajectory(1, 0..18);
    let tail = ev.trajectory(1, 22..41);
    for k in [2usize, 10, 15] {
        ev.space_point(&[(seed, k), (head, k)], [0.0, 0.0, k as f32]);
    }
    for k in [25usize, 35] {
        ev.space_point(&[(seed, k), (tail, k - 22)], [0.0, 0.0, k as f32]);
    }
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    assert_eq!(ctx.pfos.len(), 1);
    let record = report.seed(seed).expect("seed record");
    assert_eq!(record.merges.len(), 1);
    let merged = record.merges[0].merged.expect("fragments merged");
    assert_eq!(record.merges[0].order, vec![head, tail]);
    assert_eq!(ctx.pfos[0].tj_ids, vec![seed, merged]);
    for id in [head, tail] {
        assert!(ctx.store.get(id).is_some_and(|tj| tj.flags.killed));
    }
    // end points come from the space points at seed offsets 2 and 35
    assert_eq!(ctx.pfos[0].xyz[0].z, 2.0);
    assert_eq!(ctx.pfos[0].xyz[1].z, 35.0);
    assert_plane_exclusive(&ctx);
}

#[test]
fn plane_candidates_follow_first_seen_order() {
    init_logging();
    let mut ev = EventBuilder::new(2);
    let seed = ev.trajectory(0, 0..41);
    // tail gets the lower id but is reached later along the seed
    let tail = ev.trajectory(1, 22..41);
    let head = ev.trajectory(1, 0..18);
    for k in [3usize, 12] {
        ev.space_point(&[(seed, k), (head, k)], [0.0, 0.0, k as f32]);
    }
    for k in [24usize, 30, 38] {
        ev.space_point(&[(seed, k), (tail, k - 22)], [0.0, 0.0, k as f32]);
    }
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    assert!(tail < head);
    let record = report.seed(seed).expect("seed record");
    assert_eq!(record.merges.len(), 1);
    assert_eq!(record.merges[0].input, vec![head, tail]);
    assert_eq!(record.merges[0].order, vec![head, tail]);
    assert!(record.merges[0].merged.is_some(), "merge failed: {:?}", record.merges[0]);
    assert_eq!(ctx.pfos.len(), 1);
}

#[test]
fn incompatible_fragments_keep_one_per_plane() {
    init_logging();
    let mut ev = EventBuilder::new(2);
    let seed = ev.trajectory(0, 0..41);
    let near = ev.trajectory(1, 0..15);
    let far = ev.trajectory(1, 30..41);
    ev.space_point(&[(seed, 5), (near, 5)], [0.0, 0.0, 5.0]);
    ev.space_point(&[(seed, 35), (far, 5)], [0.0, 0.0, 35.0]);
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    let record = report.seed(seed).expect("seed record");
    assert!(!record.merges[0].steps[0].compatible);
    assert_eq!(ctx.pfos.len(), 1);
    assert_eq!(ctx.pfos[0].tj_ids, vec![seed, near]);
    assert!(ctx.store.get(far).is_some_and(|tj| !tj.flags.matched_3d));
    // only offset 5 links the seed to the chosen fragment
    assert_eq!(
        record.endpoints,
        Some(EndpointSpan {
            first: Some(5),
            last: Some(5)
        })
    );
    assert_plane_exclusive(&ctx);
}

#[test]
fn short_candidates_are_filtered() {
    init_logging();
    let mut ev = EventBuilder::new(3);
    let seed = ev.trajectory(0, 0..51);
    let stub = ev.trajectory(1, 10..14);
    let partner = ev.trajectory(2, 0..31);
    ev.space_point(&[(seed, 10), (stub, 0), (partner, 6)], [0.0, 0.0, 1.0]);
    ev.space_point(&[(seed, 12), (stub, 2), (partner, 8)], [0.0, 0.0, 2.0]);
    ev.space_point(&[(seed, 40), (partner, 25)], [0.0, 0.0, 3.0]);
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    // seed span 50 needs candidates of span >= 5; the stub spans 3
    assert_eq!(ctx.pfos.len(), 1);
    assert_eq!(ctx.pfos[0].tj_ids, vec![seed, partner]);
    assert!(ctx.pfos.iter().all(|p| !p.tj_ids.contains(&stub)));
    assert_eq!(
        report.seed(stub).and_then(|s| s.skip),
        Some(SeedSkip::TooFewPlanes)
    );
}

#[test]
fn seed_cap_limits_processed_seeds() {
    init_logging();
    let mut ev = EventBuilder::new(2);
    let mut seeds = Vec::new();
    for i in 0..15 {
        let seed = ev.trajectory(0, 0..31 + i);
        let partner = ev.trajectory(1, 0..11);
        ev.space_point(&[(seed, 1), (partner, 1)], [i as f32, 0.0, 1.0]);
        ev.space_point(&[(seed, 9), (partner, 9)], [i as f32, 0.0, 9.0]);
        seeds.push(seed);
    }
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    assert_eq!(report.eligible, 30);
    assert_eq!(report.seeds_processed, 11);
    assert!(report.seed_cap_reached);
    assert_eq!(ctx.pfos.len(), 11);
    // the four shortest seeds were never reached
    for &seed in &seeds[..4] {
        assert!(report.seed(seed).is_none());
        assert!(ctx.store.get(seed).is_some_and(|tj| !tj.flags.matched_3d));
    }
    assert_plane_exclusive(&ctx);
}

#[test]
fn merged_away_seed_still_records_pfo() {
    init_logging();
    let mut ev = EventBuilder::new(2);
    let seed = ev.trajectory(0, 0..45);
    let tail = ev.trajectory(0, 48..59);
    let other = ev.trajectory(1, 0..30);
    ev.space_point(&[(seed, 5), (other, 5)], [0.0, 0.0, 5.0]);
    ev.space_point(&[(seed, 44), (tail, 0), (other, 29)], [0.0, 0.0, 44.0]);
    let mut ctx = ev.build();
    let report = MatchEngine::default().match_3d_spts(&mut ctx);

    let record = report.seed(seed).expect("seed record");
    let merged = record.merges[0].merged.expect("seed merged with its tail");
    assert_eq!(ctx.pfos.len(), 1);
    assert_eq!(ctx.pfos[0].tj_ids, vec![merged, other]);
    assert_eq!(
        record.endpoint_failure,
        Some(EndpointFailure::ReferenceNotConstituent)
    );
    assert_eq!(ctx.pfos[0].xyz[0], Vector3::zeros());
}

#[test]
fn unordered_hits_are_a_no_op() {
    init_logging();
    let (mut ctx, ids) = three_plane_event();
    ctx.hits_ordered = false;
    let report = MatchEngine::default().match_3d_spts(&mut ctx);
    assert_eq!(report.skipped, Some(MatchSkip::HitsUnordered));
    assert!(ctx.pfos.is_empty());
    for id in ids {
        assert!(ctx.store.get(id).is_some_and(|tj| !tj.flags.matched_3d));
    }
}

#[test]
fn process_volume_builds_projection_then_matches() {
    init_logging();
    let (mut ctx, _) = three_plane_event();
    let report = MatchEngine::default().process_volume(&mut ctx, &UniformGeometry::default());

    assert!(report.skipped.is_none());
    assert_eq!(report.pfos_created(), 1);
    let stage = report.projection.expect("projection stage");
    assert_eq!(stage.entries, 21 + 23 + 20);
    assert_eq!(ctx.projections.len(), stage.entries);
    let xlo: Vec<f32> = ctx.projections.entries().iter().map(|e| e.xlo).collect();
    assert!(xlo.windows(2).all(|w| w[0] <= w[1]));
    let labels: Vec<&str> = report.timings.stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["projection", "match_3d_spts"]);
}

#[test]
fn short_drift_volume_is_skipped() {
    init_logging();
    let (mut ctx, _) = three_plane_event();
    let geometry = UniformGeometry {
        drift_distance: 10.0,
        ..Default::default()
    };
    let report = MatchEngine::default().process_volume(&mut ctx, &geometry);
    assert_eq!(report.skipped, Some(MatchSkip::ShortDrift));
    assert!(report.projection.is_none());
    assert!(report.matching.is_none());
    assert!(ctx.pfos.is_empty());
    assert!(ctx.projections.is_empty());
}
