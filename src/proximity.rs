use crate::catalog::Satellite;
use crate::geometry::distance_km;

/// Two objects within the alerting threshold of each other. Derived and
/// ephemeral: recomputed from scratch on every scan.
#[derive(Debug, Clone)]
pub struct ProximityPair {
    pub a: Satellite,
    pub b: Satellite,
    pub distance_km: f64,
}

/// Exhaustive all-pairs distance screen over a catalog snapshot. Objects
/// missing either coordinate are skipped. Pairs are emitted in input order
/// (i < j over the slice).
///
/// O(n^2), fine at the expected catalog size (low hundreds). If the
/// population grows past that, bucket by lat/lng grid before comparing;
/// the emitted pairs and distances must stay identical.
pub fn find_close_pairs(sats: &[Satellite], threshold_km: f64) -> Vec<ProximityPair> {
    let mut pairs = Vec::new();
    for (i, a) in sats.iter().enumerate() {
        let (Some(a_lat), Some(a_lng)) = (a.lat, a.lng) else {
            continue;
        };
        for b in &sats[i + 1..] {
            let (Some(b_lat), Some(b_lng)) = (b.lat, b.lng) else {
                continue;
            };
            let d = distance_km(a_lat, a_lng, a.alt_km, b_lat, b_lng, b.alt_km);
            if d <= threshold_km {
                pairs.push(ProximityPair {
                    a: a.clone(),
                    b: b.clone(),
                    distance_km: d,
                });
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, SatId};

    fn sat(id: SatId, lat: Option<f64>, lng: Option<f64>, alt_km: f64) -> Satellite {
        Satellite {
            id,
            name: Some(format!("SAT-{id}")),
            lat,
            lng,
            alt_km,
            category: Some(Category::Leo),
            last_update: 0.0,
        }
    }

    #[test]
    fn skips_objects_without_coordinates() {
        let sats = vec![
            sat(1, Some(0.0), Some(0.0), 550.0),
            sat(2, None, Some(0.0), 550.0),
            sat(3, Some(0.0), None, 550.0),
            sat(4, Some(0.0), Some(0.001), 550.0),
        ];
        let pairs = find_close_pairs(&sats, 100.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].a.id, 1);
        assert_eq!(pairs[0].b.id, 4);
    }

    #[test]
    fn threshold_selects_exactly_the_close_pairs() {
        // Equatorial points at alt 0: 0.01 deg of longitude is ~1.11 km.
        let sats = vec![
            sat(1, Some(0.0), Some(0.0), 0.0),
            sat(2, Some(0.0), Some(0.01), 0.0),
            sat(3, Some(0.0), Some(0.02), 0.0),
            sat(4, Some(0.0), Some(1.0), 0.0),
            sat(5, Some(0.0), Some(180.0), 0.0),
        ];
        let pairs = find_close_pairs(&sats, 2.0);

        let ids: Vec<(SatId, SatId)> = pairs.iter().map(|p| (p.a.id, p.b.id)).collect();
        assert_eq!(ids, vec![(1, 2), (2, 3)]);
        for p in &pairs {
            assert!(p.distance_km <= 2.0);
            assert!((p.distance_km - 1.112).abs() < 0.01);
        }
    }

    #[test]
    fn leo_pair_scenario() {
        // Two objects ~1.2 km apart at 550 km altitude, a third far away.
        let sats = vec![
            sat(1, Some(0.0), Some(0.0), 550.0),
            sat(2, Some(0.0), Some(0.01), 550.0),
            sat(3, Some(0.0), Some(90.0), 550.0),
        ];
        let pairs = find_close_pairs(&sats, 5.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a.id, pairs[0].b.id), (1, 2));
        assert!(pairs[0].distance_km > 1.0 && pairs[0].distance_km < 1.5);
        assert!(pairs.iter().all(|p| p.a.id != 3 && p.b.id != 3));
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(find_close_pairs(&[], 5.0).is_empty());
    }
}
