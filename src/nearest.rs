//! Nearest voting center resolution.
//!
//! Pure functions over an origin and a slice of centers. Centers without a
//! usable location are skipped; an empty or fully ineligible list yields
//! `None`, which callers display as "no center found".

use crate::centers::VotingCenter;
use crate::geo::{haversine_km, GeoPoint};
use serde::Serialize;

/// The closest center and its great-circle distance from the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestResult {
    pub center: VotingCenter,
    pub distance_km: f64,
}

fn eligible<'a>(
    origin: GeoPoint,
    centers: &'a [VotingCenter],
) -> impl Iterator<Item = (&'a VotingCenter, f64)> + 'a {
    centers.iter().filter_map(move |c| {
        let loc = c.location.filter(GeoPoint::is_valid)?;
        Some((c, haversine_km(origin, loc)))
    })
}

/// Find the center closest to `origin`.
///
/// Ties keep the first center in input order.
pub fn resolve(origin: GeoPoint, centers: &[VotingCenter]) -> Option<NearestResult> {
    if !origin.is_valid() {
        return None;
    }

    let mut best: Option<(&VotingCenter, f64)> = None;
    for (center, dist) in eligible(origin, centers) {
        match best {
            Some((_, min)) if dist >= min => {}
            _ => best = Some((center, dist)),
        }
    }

    best.map(|(center, distance_km)| NearestResult {
        center: center.clone(),
        distance_km,
    })
}

/// All eligible centers ordered by distance, closest first, at most `limit`.
///
/// The sort is stable, so equal distances keep input order and the first
/// entry always agrees with [`resolve`].
pub fn rank(origin: GeoPoint, centers: &[VotingCenter], limit: usize) -> Vec<NearestResult> {
    if !origin.is_valid() {
        return Vec::new();
    }

    let mut ranked: Vec<(&VotingCenter, f64)> = eligible(origin, centers).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    ranked
        .into_iter()
        .take(limit)
        .map(|(center, distance_km)| NearestResult {
            center: center.clone(),
            distance_km,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn center(id: &str, lat: f64, lon: f64) -> VotingCenter {
        VotingCenter {
            id: id.into(),
            name: format!("Centro {}", id),
            address: None,
            district: None,
            location: Some(GeoPoint { latitude: lat, longitude: lon }),
        }
    }

    fn unlocated(id: &str) -> VotingCenter {
        VotingCenter {
            id: id.into(),
            name: format!("Centro {}", id),
            address: None,
            district: None,
            location: None,
        }
    }

    const LIMA: GeoPoint = GeoPoint { latitude: -12.0464, longitude: -77.0428 };

    #[test]
    fn test_center_at_origin() {
        let centers = vec![center("far", -13.5, -72.0), center("here", -12.0464, -77.0428)];
        let r = resolve(LIMA, &centers).unwrap();
        assert_eq!(r.center.id, "here");
        assert!(r.distance_km < 1e-9);
    }

    #[test]
    fn test_empty_list() {
        assert!(resolve(LIMA, &[]).is_none());
        assert!(rank(LIMA, &[], 5).is_empty());
    }

    #[test]
    fn test_all_invalid() {
        let centers = vec![
            unlocated("a"),
            center("b", 95.0, 0.0),
            center("c", f64::NAN, -77.0),
            center("d", -12.0, 200.0),
        ];
        assert!(resolve(LIMA, &centers).is_none());
    }

    #[test]
    fn test_skips_invalid_entries() {
        let centers = vec![unlocated("a"), center("b", f64::NAN, 0.0), center("c", -12.1, -77.0)];
        let r = resolve(LIMA, &centers).unwrap();
        assert_eq!(r.center.id, "c");
    }

    #[test]
    fn test_tie_keeps_first() {
        let dup = vec![center("first", 0.0, 1.0), center("second", 0.0, 1.0)];
        let origin = GeoPoint { latitude: 0.0, longitude: 0.0 };
        assert_eq!(resolve(origin, &dup).unwrap().center.id, "first");
        assert_eq!(rank(origin, &dup, 2)[0].center.id, "first");
    }

    #[test]
    fn test_quarter_circle_fixture() {
        let origin = GeoPoint { latitude: 0.0, longitude: 0.0 };
        let r = resolve(origin, &[center("q", 0.0, 90.0)]).unwrap();
        assert!((r.distance_km - 10007.5).abs() < 0.1);
    }

    #[test]
    fn test_invalid_origin() {
        let origin = GeoPoint { latitude: 120.0, longitude: 0.0 };
        assert!(resolve(origin, &[center("a", 0.0, 0.0)]).is_none());
    }

    #[test]
    fn test_rank_order_and_limit() {
        let centers = vec![
            center("cusco", -13.532, -71.9675),
            center("miraflores", -12.1211, -77.0297),
            unlocated("ghost"),
            center("callao", -12.0566, -77.1181),
        ];
        let ranked = rank(LIMA, &centers, 2);
        let ids: Vec<&str> = ranked.iter().map(|r| r.center.id.as_str()).collect();
        assert_eq!(ids, vec!["callao", "miraflores"]);
        assert!(ranked[0].distance_km <= ranked[1].distance_km);
    }

    fn arb_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(latitude, longitude)| GeoPoint { latitude, longitude })
    }

    proptest! {
        #[test]
        fn prop_result_is_minimal(origin in arb_point(), pts in prop::collection::vec(arb_point(), 1..20)) {
            let centers: Vec<VotingCenter> = pts
                .iter()
                .enumerate()
                .map(|(i, p)| center(&i.to_string(), p.latitude, p.longitude))
                .collect();
            let r = resolve(origin, &centers).unwrap();
            prop_assert!(r.distance_km.is_finite() && r.distance_km >= 0.0);
            for p in &pts {
                prop_assert!(r.distance_km <= haversine_km(origin, *p));
            }
        }

        #[test]
        fn prop_distance_symmetric(a in arb_point(), b in arb_point()) {
            prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
        }

        #[test]
        fn prop_rank_head_matches_resolve(origin in arb_point(), pts in prop::collection::vec(arb_point(), 1..20)) {
            let centers: Vec<VotingCenter> = pts
                .iter()
                .enumerate()
                .map(|(i, p)| center(&i.to_string(), p.latitude, p.longitude))
                .collect();
            let best = resolve(origin, &centers).unwrap();
            let ranked = rank(origin, &centers, centers.len());
            prop_assert_eq!(ranked.len(), centers.len());
            prop_assert_eq!(&ranked[0].center.id, &best.center.id);
        }
    }
}
