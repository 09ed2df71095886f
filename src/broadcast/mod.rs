mod hub;
mod snapshot;

pub use hub::{SubscriberHub, SubscriberId};
pub use snapshot::{build_snapshot, AlertPair, SnapshotCounts, SnapshotPayload};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::catalog::Catalog;
use crate::scheduler::WorkerHandle;

/// Broadcast cycle: at a fixed short cadence, snapshot the catalog, run the
/// proximity screen, and push the result to every live subscriber. Fully
/// independent of the fetch cadence; runs until stopped.
pub fn spawn_broadcast_loop(
    catalog: Arc<Catalog>,
    hub: Arc<SubscriberHub>,
    threshold_km: f64,
    interval: Duration,
) -> WorkerHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        loop {
            let payload = build_snapshot(&catalog, threshold_km);
            let delivered = hub.broadcast(&payload);
            log::debug!(
                "broadcast tick: sats={} alerts={} delivered={}",
                payload.counts.total,
                payload.counts.alerts,
                delivered
            );
            tokio::select! {
                _ = sleep(interval) => {}
                _ = &mut stop_rx => break,
            }
        }
    });
    WorkerHandle::new(stop_tx, join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SatUpdate;

    #[tokio::test]
    async fn broadcast_loop_delivers_ticks_to_subscribers() {
        let catalog = Arc::new(Catalog::new());
        catalog.merge(1, SatUpdate::default(), 0.0);
        let hub = Arc::new(SubscriberHub::new());
        let (_id, mut rx) = hub.subscribe();

        let handle = spawn_broadcast_loop(
            catalog.clone(),
            hub.clone(),
            5.0,
            Duration::from_millis(10),
        );

        let payload = rx.recv().await.unwrap();
        assert_eq!(payload.counts.total, 1);
        handle.stop().await;
    }
}
