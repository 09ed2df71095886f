use serde::Serialize;
use strum_macros::Display;

pub type SatId = u32;

/// Orbit class label. Assigned by whichever fetch family last touched the
/// record: the category-filtered sweep marks Geo, the altitude-filtered
/// sweep marks Leo. An object near the altitude boundary (or present in
/// both sweep results) can flip label between passes, last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Category {
    Leo,
    Geo,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Satellite {
    pub id: SatId,
    pub name: Option<String>,
    /// Degrees, -90..90. Absent until some source reports a position.
    pub lat: Option<f64>,
    /// Degrees, 0..360.
    pub lng: Option<f64>,
    /// Km above mean radius; 0 when unknown.
    pub alt_km: f64,
    pub category: Option<Category>,
    /// Wall-clock epoch seconds of the last merged update.
    pub last_update: f64,
}

/// Partial update applied through [`Catalog::merge`](super::Catalog::merge).
/// Fields left `None` keep whatever the catalog already knows.
#[derive(Debug, Clone, Default)]
pub struct SatUpdate {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt_km: Option<f64>,
    pub category: Option<Category>,
}
