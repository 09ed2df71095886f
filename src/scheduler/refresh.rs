use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::oneshot;
use tokio::time::sleep;

use super::{LastError, WorkerHandle};
use crate::catalog::{now_epoch, Catalog, SatUpdate};
use crate::fetch::FetchSource;

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub max_parallel: usize,
    pub group_pause: Duration,
    /// Seconds of predicted positions to request; the first entry is the
    /// most recent and the only one applied.
    pub window_seconds: u32,
}

/// Fine-grained refresh cycle: every interval, re-query the position of
/// every object currently in the catalog, in fixed-size concurrent groups.
/// Runs until stopped.
pub fn spawn_refresh_loop(
    source: Arc<dyn FetchSource>,
    catalog: Arc<Catalog>,
    config: RefreshConfig,
    last_error: LastError,
) -> WorkerHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sleep(config.interval) => {}
                _ = &mut stop_rx => break,
            }
            refresh_pass(source.as_ref(), &catalog, &config, &last_error).await;
        }
    });
    WorkerHandle::new(stop_tx, join)
}

/// One refresh over a snapshot of the known ids. A failed fetch for one id
/// is recorded and skipped without blocking its group siblings; a
/// rate-limit signal abandons the rest of the pass. Only position fields
/// are merged, so names and categories from the sweep survive.
pub(crate) async fn refresh_pass(
    source: &dyn FetchSource,
    catalog: &Catalog,
    config: &RefreshConfig,
    last_error: &LastError,
) {
    let ids = catalog.ids();
    let now = now_epoch();
    let group_size = config.max_parallel.max(1);
    let groups = ids.chunks(group_size).count();

    'pass: for (i, group) in ids.chunks(group_size).enumerate() {
        let results = join_all(group.iter().map(|&id| async move {
            (id, source.fetch_position(id, config.window_seconds).await)
        }))
        .await;

        for (id, result) in results {
            match result {
                Ok(positions) => {
                    if let Some(pos) = positions.first() {
                        catalog.merge(
                            id,
                            SatUpdate {
                                lat: pos.lat,
                                lng: pos.lng,
                                alt_km: Some(pos.alt_km),
                                ..Default::default()
                            },
                            now,
                        );
                    }
                }
                Err(e) => {
                    last_error.record(e.to_string());
                    if e.is_rate_limited() {
                        log::warn!("rate limit hit, abandoning rest of refresh pass: {e}");
                        break 'pass;
                    }
                    log::debug!("position fetch failed for {id}: {e}");
                }
            }
        }

        if i + 1 < groups {
            sleep(config.group_pause).await;
        }
    }
}
