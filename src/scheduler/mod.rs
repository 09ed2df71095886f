mod refresh;
mod sweep;

pub use refresh::{spawn_refresh_loop, RefreshConfig};
pub use sweep::{spawn_sweep_loop, Region, SweepConfig};

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A spawned forever-loop that can be stopped deterministically. Dropping
/// the handle without calling [`stop`](WorkerHandle::stop) leaves the loop
/// running until the process exits.
pub struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn new(stop_tx: oneshot::Sender<()>, join: JoinHandle<()>) -> Self {
        Self { stop_tx, join }
    }

    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.join.await;
    }
}

/// Last-observed-error slot shared by both fetch cycles and read by the
/// health surface. Errors are contained at the smallest scope; this is the
/// only trace an individual fetch failure leaves behind.
#[derive(Clone, Default)]
pub struct LastError(Arc<StdMutex<Option<String>>>);

impl LastError {
    pub fn record(&self, msg: impl Into<String>) {
        *self.0.lock().unwrap() = Some(msg.into());
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}
