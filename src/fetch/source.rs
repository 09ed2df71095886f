use async_trait::async_trait;

use super::error::FetchError;
use crate::catalog::SatId;

/// Category filter for a regional sweep fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Everything above the seed point; callers filter by altitude locally.
    Any,
    /// Only geosynchronous objects.
    Geosynchronous,
}

/// One object sighted by a regional sweep fetch.
#[derive(Debug, Clone)]
pub struct RegionRecord {
    pub id: SatId,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt_km: f64,
}

/// One reported position from a per-object refresh fetch. The first entry
/// of the returned window is the most recent.
#[derive(Debug, Clone)]
pub struct ObjectPosition {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt_km: f64,
}

/// The upstream tracking source as the scheduler sees it: an opaque pair of
/// fetch operations returning structured records or a tagged error.
#[async_trait]
pub trait FetchSource: Send + Sync {
    /// Everything within `radius_km` of the seed point, optionally
    /// restricted by category.
    async fn fetch_region(
        &self,
        lat: f64,
        lng: f64,
        radius_km: u32,
        filter: CategoryFilter,
    ) -> Result<Vec<RegionRecord>, FetchError>;

    /// Fine position refresh for one object over a short window.
    async fn fetch_position(
        &self,
        id: SatId,
        window_seconds: u32,
    ) -> Result<Vec<ObjectPosition>, FetchError>;
}
