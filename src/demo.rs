//! Simulated satellite population for running without an upstream source.
//! Seeding is deterministic and each step advances objects by the wall-clock
//! time elapsed since their last update, so on-demand and periodic stepping
//! compose to the same trajectories.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::catalog::{now_epoch, Catalog, Category, SatUpdate};
use crate::scheduler::WorkerHandle;

pub const GEO_COUNT: u32 = 12;
pub const LEO_COUNT: u32 = 30;
/// Cadence of the periodic simulation step.
pub const STEP_INTERVAL: Duration = Duration::from_secs(1);
const GEO_ALT_KM: f64 = 35_786.0;
const LEO_ALT_KM: f64 = 550.0;
const GEO_ID_BASE: u32 = 900_000;
const LEO_ID_BASE: u32 = 910_000;

/// Degrees of longitude per second for one revolution per sidereal-ish day.
const GEO_DEG_PER_S: f64 = 360.0 / (24.0 * 3600.0);
const LEO_PERIOD_S: f64 = 95.0 * 60.0;
const LEO_DEG_PER_S: f64 = 360.0 / LEO_PERIOD_S;

/// Seed the catalog if it is empty: 12 evenly spaced GEO objects on the
/// equator and 30 LEO objects staggered in latitude and longitude.
pub fn ensure_catalog(catalog: &Catalog, now: f64) {
    if !catalog.is_empty() {
        return;
    }
    log::info!("seeding demo catalog ({GEO_COUNT} GEO, {LEO_COUNT} LEO)");

    for i in 0..GEO_COUNT {
        catalog.merge(
            GEO_ID_BASE + i,
            SatUpdate {
                name: Some(format!("GEO-{:02}", i + 1)),
                lat: Some(0.0),
                lng: Some(f64::from(i) * 30.0),
                alt_km: Some(GEO_ALT_KM),
                category: Some(Category::Geo),
            },
            now,
        );
    }
    for i in 0..LEO_COUNT {
        catalog.merge(
            LEO_ID_BASE + i,
            SatUpdate {
                name: Some(format!("LEO-{:02}", i + 1)),
                lat: Some(f64::from(i % 6) * 10.0 - 25.0),
                lng: Some(f64::from(i * 12 % 360)),
                alt_km: Some(LEO_ALT_KM),
                category: Some(Category::Leo),
            },
            now,
        );
    }
}

/// Advance every object by the wall-clock time elapsed since its last
/// update. GEO objects drift eastward at one revolution per day; LEO
/// objects circle every ~95 minutes with a +/-30 degree latitude
/// oscillation driven by absolute time.
pub fn step(catalog: &Catalog, now: f64) {
    for sat in catalog.snapshot() {
        let dt = (now - sat.last_update).max(0.0);
        let lng = sat.lng.unwrap_or(0.0);
        let update = match sat.category {
            Some(Category::Geo) => SatUpdate {
                lat: Some(0.0),
                lng: Some((lng + GEO_DEG_PER_S * dt).rem_euclid(360.0)),
                ..Default::default()
            },
            _ => {
                let t = now.rem_euclid(LEO_PERIOD_S);
                SatUpdate {
                    lat: Some(30.0 * (TAU * t / LEO_PERIOD_S).sin()),
                    lng: Some((lng + LEO_DEG_PER_S * dt).rem_euclid(360.0)),
                    ..Default::default()
                }
            }
        };
        catalog.merge(sat.id, update, now);
    }
}

/// Demo cycle: seed once, then advance the simulated population every
/// second until stopped.
pub fn spawn_demo_loop(catalog: Arc<Catalog>, interval: Duration) -> WorkerHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        ensure_catalog(&catalog, now_epoch());
        loop {
            tokio::select! {
                _ = sleep(interval) => {}
                _ = &mut stop_rx => break,
            }
            step(&catalog, now_epoch());
        }
    });
    WorkerHandle::new(stop_tx, join)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic_and_nonempty() {
        let a = Catalog::new();
        let b = Catalog::new();
        ensure_catalog(&a, 1000.0);
        ensure_catalog(&b, 1000.0);

        assert_eq!(a.len(), (GEO_COUNT + LEO_COUNT) as usize);
        let mut sa = a.snapshot();
        let mut sb = b.snapshot();
        sa.sort_by_key(|s| s.id);
        sb.sort_by_key(|s| s.id);
        for (x, y) in sa.iter().zip(&sb) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.lng, y.lng);
            assert_eq!(x.lat, y.lat);
        }
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let catalog = Catalog::new();
        ensure_catalog(&catalog, 1000.0);
        ensure_catalog(&catalog, 2000.0);
        assert_eq!(catalog.len(), (GEO_COUNT + LEO_COUNT) as usize);
    }

    #[test]
    fn step_advances_by_elapsed_time() {
        let catalog = Catalog::new();
        ensure_catalog(&catalog, 0.0);

        // One hour later a GEO object has drifted 15 degrees east.
        step(&catalog, 3600.0);
        let geo = catalog.get(GEO_ID_BASE).unwrap();
        assert!((geo.lng.unwrap() - 15.0).abs() < 1e-9);
        assert_eq!(geo.lat, Some(0.0));
        assert_eq!(geo.last_update, 3600.0);

        // Stepping twice in the same instant moves nothing further.
        let before = catalog.get(LEO_ID_BASE).unwrap().lng;
        step(&catalog, 3600.0);
        assert_eq!(catalog.get(LEO_ID_BASE).unwrap().lng, before);
    }

    #[test]
    fn leo_latitude_stays_within_oscillation_band() {
        let catalog = Catalog::new();
        ensure_catalog(&catalog, 0.0);
        for t in [60.0, 600.0, 3000.0, 6000.0] {
            step(&catalog, t);
            let leo = catalog.get(LEO_ID_BASE).unwrap();
            assert!(leo.lat.unwrap().abs() <= 30.0 + 1e-9);
        }
    }
}
