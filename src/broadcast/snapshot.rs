use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{Catalog, Category, Satellite};
use crate::proximity::find_close_pairs;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SnapshotPayload {
    pub ts: DateTime<Utc>,
    pub sats: Vec<Satellite>,
    pub counts: SnapshotCounts,
    pub alerts: Vec<AlertPair>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SnapshotCounts {
    pub total: usize,
    pub leo: usize,
    pub geo: usize,
    pub alerts: usize,
}

/// One proximity alert as delivered to clients: the two display names and
/// the screened distance.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AlertPair {
    pub a: Option<String>,
    pub b: Option<String>,
    pub dist_km: f64,
}

/// Assemble the broadcast/query payload from the current catalog state:
/// snapshot, proximity screen, per-category counts.
pub fn build_snapshot(catalog: &Catalog, threshold_km: f64) -> SnapshotPayload {
    let sats = catalog.snapshot();
    let pairs = find_close_pairs(&sats, threshold_km);
    let alerts: Vec<AlertPair> = pairs
        .iter()
        .map(|p| AlertPair {
            a: p.a.name.clone(),
            b: p.b.name.clone(),
            dist_km: p.distance_km,
        })
        .collect();

    let leo = sats
        .iter()
        .filter(|s| s.category == Some(Category::Leo))
        .count();
    let geo = sats
        .iter()
        .filter(|s| s.category == Some(Category::Geo))
        .count();

    SnapshotPayload {
        ts: Utc::now(),
        counts: SnapshotCounts {
            total: sats.len(),
            leo,
            geo,
            alerts: alerts.len(),
        },
        sats,
        alerts,
    }
}
