use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;
use tokio::sync::oneshot;
use tokio::time::sleep;

use super::{LastError, WorkerHandle};
use crate::catalog::{now_epoch, Catalog, Category, SatUpdate};
use crate::fetch::{CategoryFilter, FetchError, FetchSource, RegionRecord};

/// Fixed seed point for a regional sweep query.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Region {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub regions: Vec<Region>,
    pub radius_km: u32,
    pub interval: Duration,
    /// Cap on fetches in flight at once against the upstream source.
    pub max_parallel: usize,
    /// Pause between fetch groups, to stay under the upstream rate limit.
    pub group_pause: Duration,
    /// Records from the unfiltered fetch below this altitude are labeled
    /// low-orbit; the rest are discarded (the filtered fetch covers them).
    pub leo_max_alt_km: f64,
}

/// Wide-area sweep cycle: every interval, query each seed region for
/// geosynchronous objects and for everything below the low-orbit ceiling,
/// and merge the sightings into the catalog. Runs until stopped.
pub fn spawn_sweep_loop(
    source: Arc<dyn FetchSource>,
    catalog: Arc<Catalog>,
    config: SweepConfig,
    last_error: LastError,
) -> WorkerHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        loop {
            sweep_pass(source.as_ref(), &catalog, &config, &last_error).await;
            tokio::select! {
                _ = sleep(config.interval) => {}
                _ = &mut stop_rx => break,
            }
        }
    });
    WorkerHandle::new(stop_tx, join)
}

/// One full sweep over the region list. Regions are processed in groups of
/// `max_parallel`; within a group the geosynchronous fetches run
/// concurrently, then the unfiltered fetches. A failed fetch is recorded
/// and skipped; a rate-limit signal abandons the rest of the pass so the
/// next scheduled pass retries without compounding the throttle.
pub(crate) async fn sweep_pass(
    source: &dyn FetchSource,
    catalog: &Catalog,
    config: &SweepConfig,
    last_error: &LastError,
) {
    last_error.clear();
    let now = now_epoch();
    let group_size = config.max_parallel.max(1);
    let groups = config.regions.chunks(group_size).count();

    'pass: for (i, group) in config.regions.chunks(group_size).enumerate() {
        let geo = join_all(group.iter().map(|r| {
            source.fetch_region(r.lat, r.lng, config.radius_km, CategoryFilter::Geosynchronous)
        }))
        .await;
        if apply_results(geo, catalog, Category::Geo, None, now, last_error) {
            break 'pass;
        }

        let all = join_all(
            group
                .iter()
                .map(|r| source.fetch_region(r.lat, r.lng, config.radius_km, CategoryFilter::Any)),
        )
        .await;
        if apply_results(
            all,
            catalog,
            Category::Leo,
            Some(config.leo_max_alt_km),
            now,
            last_error,
        ) {
            break 'pass;
        }

        if i + 1 < groups {
            sleep(config.group_pause).await;
        }
    }

    log::info!(
        "regional sweep done: tracked={} last_error={:?}",
        catalog.len(),
        last_error.get()
    );
}

/// Merge one fetch family's group results. Returns true if a rate-limit
/// signal was seen, which ends the current pass.
fn apply_results(
    results: Vec<Result<Vec<RegionRecord>, FetchError>>,
    catalog: &Catalog,
    category: Category,
    max_alt_km: Option<f64>,
    now: f64,
    last_error: &LastError,
) -> bool {
    let mut rate_limited = false;
    for result in results {
        match result {
            Ok(records) => {
                for record in records {
                    if let Some(ceiling) = max_alt_km {
                        if record.alt_km >= ceiling {
                            continue;
                        }
                    }
                    catalog.merge(
                        record.id,
                        SatUpdate {
                            name: record.name,
                            lat: record.lat,
                            lng: record.lng,
                            alt_km: Some(record.alt_km),
                            category: Some(category),
                        },
                        now,
                    );
                }
            }
            Err(e) => {
                last_error.record(e.to_string());
                if e.is_rate_limited() {
                    log::warn!("rate limit hit, abandoning rest of sweep pass: {e}");
                    rate_limited = true;
                } else {
                    log::warn!("region fetch failed: {e}");
                }
            }
        }
    }
    rate_limited
}
