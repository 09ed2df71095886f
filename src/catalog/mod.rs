mod catalog;
mod types;

pub use catalog::Catalog;
pub use types::{Category, SatId, SatUpdate, Satellite};

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock epoch seconds, the timestamp unit carried by catalog entries.
pub fn now_epoch() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
