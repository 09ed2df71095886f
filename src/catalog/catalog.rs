use std::collections::HashMap;
use std::sync::RwLock;

use super::types::{SatId, SatUpdate, Satellite};

/// Shared map of tracked objects. Written concurrently by both fetch
/// cycles, read by the broadcaster and the on-demand query path. The lock
/// is held only for the duration of a single merge or snapshot, never
/// across an await point.
///
/// Entries are never evicted; the region list is a fixed, finite universe
/// and the catalog settles at a bounded size.
pub struct Catalog {
    entries: RwLock<HashMap<SatId, Satellite>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert-or-update. Only the fields present in `update` are applied;
    /// an update that carries just a position does not erase a previously
    /// known name or category. `last_update` is always refreshed to `now`.
    pub fn merge(&self, id: SatId, update: SatUpdate, now: f64) {
        let mut entries = self.entries.write().unwrap();
        let sat = entries.entry(id).or_insert_with(|| Satellite {
            id,
            name: None,
            lat: None,
            lng: None,
            alt_km: 0.0,
            category: None,
            last_update: now,
        });

        if let Some(name) = update.name {
            sat.name = Some(name);
        }
        if let Some(lat) = update.lat {
            sat.lat = Some(lat);
        }
        if let Some(lng) = update.lng {
            sat.lng = Some(lng);
        }
        if let Some(alt_km) = update.alt_km {
            sat.alt_km = alt_km;
        }
        if let Some(category) = update.category {
            sat.category = Some(category);
        }
        sat.last_update = now;
    }

    /// Point-in-time-ish copy of every entry. Writers may continue merging
    /// while the caller iterates; each returned entry is internally
    /// consistent.
    pub fn snapshot(&self) -> Vec<Satellite> {
        self.entries.read().unwrap().values().cloned().collect()
    }

    pub fn get(&self, id: SatId) -> Option<Satellite> {
        self.entries.read().unwrap().get(&id).cloned()
    }

    pub fn ids(&self) -> Vec<SatId> {
        self.entries.read().unwrap().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::Category;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn merge_unseen_creates_entry_with_supplied_fields() {
        let catalog = Catalog::new();
        catalog.merge(
            25544,
            SatUpdate {
                name: Some("ISS (ZARYA)".into()),
                lat: Some(51.6),
                ..Default::default()
            },
            100.0,
        );

        let sat = catalog.get(25544).unwrap();
        assert_eq!(sat.name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(sat.lat, Some(51.6));
        assert_eq!(sat.lng, None);
        assert_eq!(sat.alt_km, 0.0);
        assert_eq!(sat.category, None);
        assert_eq!(sat.last_update, 100.0);
    }

    #[test]
    fn disjoint_merges_union_fields_and_keep_latest_timestamp() {
        let catalog = Catalog::new();
        catalog.merge(
            1,
            SatUpdate {
                name: Some("SAT-1".into()),
                category: Some(Category::Geo),
                ..Default::default()
            },
            10.0,
        );
        catalog.merge(
            1,
            SatUpdate {
                lat: Some(0.0),
                lng: Some(120.0),
                alt_km: Some(35786.0),
                ..Default::default()
            },
            20.0,
        );

        let sat = catalog.get(1).unwrap();
        assert_eq!(sat.name.as_deref(), Some("SAT-1"));
        assert_eq!(sat.category, Some(Category::Geo));
        assert_eq!(sat.lat, Some(0.0));
        assert_eq!(sat.lng, Some(120.0));
        assert_eq!(sat.alt_km, 35786.0);
        assert_eq!(sat.last_update, 20.0);
    }

    #[test]
    fn later_fields_overwrite_earlier_ones() {
        let catalog = Catalog::new();
        catalog.merge(
            2,
            SatUpdate {
                lat: Some(1.0),
                category: Some(Category::Leo),
                ..Default::default()
            },
            1.0,
        );
        catalog.merge(
            2,
            SatUpdate {
                lat: Some(2.0),
                category: Some(Category::Geo),
                ..Default::default()
            },
            2.0,
        );

        let sat = catalog.get(2).unwrap();
        assert_eq!(sat.lat, Some(2.0));
        assert_eq!(sat.category, Some(Category::Geo));
    }

    #[test]
    fn concurrent_merges_from_multiple_threads() {
        let catalog = Arc::new(Catalog::new());
        let mut handles = Vec::new();
        for t in 0..8u32 {
            let catalog = catalog.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..100u32 {
                    catalog.merge(
                        t * 1000 + i,
                        SatUpdate {
                            lat: Some(f64::from(i)),
                            ..Default::default()
                        },
                        f64::from(i),
                    );
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(catalog.len(), 800);
    }

    #[test]
    fn snapshot_returns_copies() {
        let catalog = Catalog::new();
        catalog.merge(7, SatUpdate::default(), 0.0);
        let snap = catalog.snapshot();
        assert_eq!(snap.len(), 1);

        catalog.merge(
            7,
            SatUpdate {
                lat: Some(9.0),
                ..Default::default()
            },
            1.0,
        );
        // The earlier snapshot is unaffected by later merges.
        assert_eq!(snap[0].lat, None);
    }
}
