use crate::diagnostics::{EndpointFailure, EndpointSpan};
use crate::spacepoints::SpacePointIndex;
use crate::store::{Hit, Pfo};
use crate::types::{SpacePointId, TrajId};
use log::debug;

/// Sets the 3D end points of a particle-flow object.
///
/// `spt_lists[k]` holds the space points of the reference trajectory's point
/// at offset `k` from its first charge-bearing point. The first and last
/// offsets at which every constituent owns a hit in one of those space points
/// give the two ends; each end takes the position of the first space point
/// listed there. An end with no such offset is left at its prior value.
pub fn resolve_endpoints(
    pfo: &mut Pfo,
    spt_lists: &[Vec<SpacePointId>],
    reference: TrajId,
    index: &SpacePointIndex<'_>,
    hits: &[Hit],
) -> Result<EndpointSpan, EndpointFailure> {
    if pfo.is_shower() {
        return Err(EndpointFailure::ShowerPfo);
    }
    if pfo.tj_ids.len() < 2 {
        return Err(EndpointFailure::TooFewConstituents);
    }
    if spt_lists.is_empty() {
        return Err(EndpointFailure::NoSpacePointLists);
    }
    if index.is_empty() {
        return Err(EndpointFailure::NoSpacePoints);
    }
    if !pfo.tj_ids.contains(&reference) {
        return Err(EndpointFailure::ReferenceNotConstituent);
    }

    let mut span = EndpointSpan::default();
    for (offset, spts) in spt_lists.iter().enumerate() {
        if spts.is_empty() {
            continue;
        }
        let near = index.trajectories_near(hits, spts);
        let cnt = pfo.tj_ids.iter().filter(|id| near.contains(id)).count();
        if cnt != pfo.tj_ids.len() {
            continue;
        }
        span.first.get_or_insert(offset);
        span.last = Some(offset);
    }

    for (end, offset) in [span.first, span.last].into_iter().enumerate() {
        let Some(pos) = offset
            .and_then(|k| spt_lists[k].first())
            .and_then(|&isp| index.space_point(isp))
            .map(|spt| spt.pos)
        else {
            continue;
        };
        pfo.xyz[end] = pos;
    }
    debug!(
        "resolve_endpoints: pfo {:?} tjs {:?} first {:?} last {:?}",
        pfo.id, pfo.tj_ids, span.first, span.last
    );
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SpacePoint, SHOWER_PDG};
    use crate::types::{HitId, PfoId, VolumeId};
    use nalgebra::Vector3;

    fn tj(n: i64) -> TrajId {
        TrajId::new(n).expect("positive id")
    }

    struct Fixture {
        hits: Vec<Hit>,
        space_points: Vec<SpacePoint>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                hits: Vec::new(),
                space_points: Vec::new(),
            }
        }

        /// Space point shared by hits of the given owners.
        fn shared(&mut self, owners: &[TrajId], z: f32) -> SpacePointId {
            let hits = owners
                .iter()
                .map(|&owner| {
                    self.hits.push(Hit::owned_by(owner));
                    HitId(self.hits.len() as u32 - 1)
                })
                .collect();
            self.space_points.push(SpacePoint {
                pos: Vector3::new(1.0, 2.0, z),
                hits,
            });
            SpacePointId(self.space_points.len() as u32 - 1)
        }
    }

    fn pfo(ids: &[TrajId]) -> Pfo {
        let mut pfo = Pfo::new(PfoId(1), VolumeId::default());
        pfo.tj_ids = ids.to_vec();
        pfo
    }

    #[test]
    fn single_full_coverage_offset_sets_both_ends() {
        let mut fx = Fixture::new();
        let partial = fx.shared(&[tj(1)], 0.0);
        let full = fx.shared(&[tj(1), tj(2)], 7.0);
        let lists = vec![vec![partial], vec![], vec![full], vec![partial]];
        let index = SpacePointIndex::new(&fx.space_points);
        let mut p = pfo(&[tj(1), tj(2)]);
        let span = resolve_endpoints(&mut p, &lists, tj(1), &index, &fx.hits)
            .expect("endpoints resolved");
        assert_eq!(span.first, Some(2));
        assert_eq!(span.last, Some(2));
        assert_eq!(p.xyz[0], Vector3::new(1.0, 2.0, 7.0));
        assert_eq!(p.xyz[1], p.xyz[0]);
    }

    #[test]
    fn disjoint_offsets_give_distinct_ends() {
        let mut fx = Fixture::new();
        let head = fx.shared(&[tj(1), tj(2)], 3.0);
        let tail = fx.shared(&[tj(2), tj(1)], 9.0);
        let lone = fx.shared(&[tj(2)], 5.0);
        let lists = vec![vec![], vec![head, lone], vec![lone], vec![tail, head]];
        let index = SpacePointIndex::new(&fx.space_points);
        let mut p = pfo(&[tj(2), tj(1)]);
        let span = resolve_endpoints(&mut p, &lists, tj(1), &index, &fx.hits)
            .expect("endpoints resolved");
        assert_eq!(span, EndpointSpan { first: Some(1), last: Some(3) });
        assert_eq!(p.xyz[0].z, 3.0);
        assert_eq!(p.xyz[1].z, 9.0);
    }

    #[test]
    fn no_full_coverage_leaves_ends_unchanged() {
        let mut fx = Fixture::new();
        let partial = fx.shared(&[tj(1)], 4.0);
        let lists = vec![vec![partial]];
        let index = SpacePointIndex::new(&fx.space_points);
        let mut p = pfo(&[tj(1), tj(2)]);
        p.xyz[1] = Vector3::new(-1.0, -1.0, -1.0);
        let span = resolve_endpoints(&mut p, &lists, tj(1), &index, &fx.hits)
            .expect("preconditions hold");
        assert!(!span.is_complete());
        assert_eq!(p.xyz[0], Vector3::zeros());
        assert_eq!(p.xyz[1], Vector3::new(-1.0, -1.0, -1.0));
    }

    #[test]
    fn precondition_failures_are_reported() {
        let mut fx = Fixture::new();
        let full = fx.shared(&[tj(1), tj(2)], 1.0);
        let lists = vec![vec![full]];
        let index = SpacePointIndex::new(&fx.space_points);

        let mut shower = pfo(&[tj(1), tj(2)]);
        shower.pdg_code = SHOWER_PDG;
        assert_eq!(
            resolve_endpoints(&mut shower, &lists, tj(1), &index, &fx.hits),
            Err(EndpointFailure::ShowerPfo)
        );
        assert_eq!(
            resolve_endpoints(&mut pfo(&[tj(1)]), &lists, tj(1), &index, &fx.hits),
            Err(EndpointFailure::TooFewConstituents)
        );
        assert_eq!(
            resolve_endpoints(&mut pfo(&[tj(1), tj(2)]), &[], tj(1), &index, &fx.hits),
            Err(EndpointFailure::NoSpacePointLists)
        );
        let empty = SpacePointIndex::new(&[]);
        assert_eq!(
            resolve_endpoints(&mut pfo(&[tj(1), tj(2)]), &lists, tj(1), &empty, &fx.hits),
            Err(EndpointFailure::NoSpacePoints)
        );
        let mut p = pfo(&[tj(1), tj(2)]);
        assert_eq!(
            resolve_endpoints(&mut p, &lists, tj(3), &index, &fx.hits),
            Err(EndpointFailure::ReferenceNotConstituent)
        );
        assert_eq!(p.xyz[0], Vector3::zeros());
    }
}
