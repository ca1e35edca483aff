use std::cmp::Ordering;

use tracing::warn;

use crate::geo::GeoPoint;
use crate::inventory::InfrastructureObject;

use super::{Candidate, MAX_CANDIDATES};

/// Rank eligible objects by distance from `point`.
///
/// Inactive objects and objects without free ports are skipped even if the
/// repository already filtered them. The result is sorted ascending by
/// distance and holds at most [`MAX_CANDIDATES`] entries.
///
/// Equal distances are ordered by `object_id`, then by record key, so the
/// ranking does not depend on the order the repository returned rows in.
/// Objects whose distance is not finite (for example a `NaN` coordinate read
/// from the database) are dropped with a warning, so they can never take a
/// slot from a real candidate.
pub fn rank<'a, I>(point: GeoPoint, objects: I) -> Vec<Candidate<'a>>
where
    I: IntoIterator<Item = &'a InfrastructureObject>,
{
    let mut candidates: Vec<Candidate<'a>> = objects
        .into_iter()
        .filter(|object| object.is_eligible())
        .map(|object| Candidate {
            object,
            distance_m: point.distance_to(&object.location()),
        })
        .filter(|candidate| {
            let finite = candidate.distance_m.is_finite();
            if !finite {
                warn!(
                    object_id = %candidate.object.object_id,
                    lat = candidate.object.lat,
                    lng = candidate.object.lng,
                    "skipping object with unusable coordinates"
                );
            }
            finite
        })
        .collect();

    candidates.sort_by(compare_candidates);
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.distance_m
        .total_cmp(&b.distance_m)
        .then_with(|| a.object.object_id.cmp(&b.object.object_id))
        .then_with(|| a.object.id.cmp(&b.object.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(38.56, 68.78);

    fn object_at(id: i64, object_id: &str, lat: f64, lng: f64) -> InfrastructureObject {
        InfrastructureObject::builder(id, object_id)
            .at(lat, lng)
            .ports(16, 4)
            .build()
    }

    #[test]
    fn empty_input_ranks_to_nothing() {
        let objects: Vec<InfrastructureObject> = Vec::new();
        assert!(rank(ORIGIN, &objects).is_empty());
    }

    #[test]
    fn results_are_sorted_and_capped() {
        let objects: Vec<_> = (0..25)
            .map(|i| {
                // Scatter latitudes so insertion order is not distance order.
                let offset = ((i * 7) % 25) as f64 * 0.001;
                object_at(i, &format!("OBJ-{i:02}"), 38.56 + offset, 68.78)
            })
            .collect();

        let ranked = rank(ORIGIN, &objects);
        assert_eq!(ranked.len(), MAX_CANDIDATES);
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
        }
        assert_eq!(ranked[0].distance_m, 0.0);
    }

    #[test]
    fn ineligible_objects_are_skipped() {
        let objects = vec![
            InfrastructureObject::builder(1, "FULL")
                .at(38.56, 68.78)
                .ports(8, 0)
                .build(),
            InfrastructureObject::builder(2, "OFF")
                .at(38.56, 68.78)
                .ports(8, 3)
                .active(false)
                .build(),
            object_at(3, "OK", 38.57, 68.78),
        ];

        let ranked = rank(ORIGIN, &objects);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].object.object_id, "OK");
    }

    #[test]
    fn ties_are_broken_by_object_identifier() {
        let objects = vec![
            object_at(1, "C", 38.57, 68.78),
            object_at(2, "A", 38.57, 68.78),
            object_at(3, "B", 38.57, 68.78),
        ];

        let ranked = rank(ORIGIN, objects.iter().rev());
        let order: Vec<_> = ranked.iter().map(|c| c.object.object_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn non_finite_distances_never_displace_real_candidates() {
        let mut objects: Vec<_> = (0..MAX_CANDIDATES as i64)
            .map(|i| object_at(i, &format!("BAD-{i:02}"), f64::NAN, 68.78))
            .collect();
        objects.push(object_at(100, "NEAR", 38.565, 68.78));
        objects.push(object_at(101, "ANTIPODE", -38.56, 68.78 - 180.0));

        let ranked = rank(ORIGIN, &objects);
        let order: Vec<_> = ranked.iter().map(|c| c.object.object_id.as_str()).collect();
        assert_eq!(order, vec!["NEAR", "ANTIPODE"]);
        assert!(ranked.iter().all(|c| c.distance_m.is_finite()));
    }

    #[test]
    fn ranking_is_independent_of_input_order() {
        let objects = vec![
            object_at(1, "N1", 38.561, 68.78),
            object_at(2, "N2", 38.565, 68.781),
            object_at(3, "N3", 38.55, 68.79),
        ];
        let forward: Vec<_> = rank(ORIGIN, &objects)
            .iter()
            .map(|c| c.object.id)
            .collect();
        let backward: Vec<_> = rank(ORIGIN, objects.iter().rev())
            .iter()
            .map(|c| c.object.id)
            .collect();
        assert_eq!(forward, backward);
    }
}
