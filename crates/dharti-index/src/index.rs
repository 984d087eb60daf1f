use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use dharti_core::error::{Error, Result};
use dharti_core::{LatLng, Parcel, ParcelId};

use crate::geometry::path_contains;

/// Id and shape of a parcel, as drawn on the map overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelOutline {
    pub id: ParcelId,
    pub path: Vec<LatLng>,
}

/// Read-only parcel collection.
///
/// Parcels are kept sorted by id, so every lookup that can match several
/// parcels resolves ties toward the lexicographically smallest id, independent
/// of the order the data source returned them in.
#[derive(Debug, Clone, Default)]
pub struct ParcelIndex {
    parcels: Vec<Parcel>,
}

impl ParcelIndex {
    /// Validates every parcel and rejects ids that collide case-insensitively.
    pub fn new(parcels: impl IntoIterator<Item = Parcel>) -> Result<Self> {
        let mut parcels: Vec<Parcel> = parcels.into_iter().collect();
        let mut seen = HashSet::new();
        for p in &parcels {
            p.validate()?;
            if !seen.insert(p.id.to_lowercase()) {
                return Err(Error::InvalidParcel(format!("duplicate id {}", p.id)));
            }
        }
        parcels.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = parcels.len(), "parcel index built");
        Ok(Self { parcels })
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.iter()
    }

    /// Exact, case-sensitive id lookup.
    pub fn get(&self, id: &str) -> Option<&Parcel> {
        self.parcels
            .binary_search_by(|p| p.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.parcels[i])
    }

    /// Case-insensitive id lookup. An exact match wins; otherwise the first
    /// parcel (by id) whose id contains `query`.
    pub fn find_by_id(&self, query: &str) -> Option<&Parcel> {
        let needle = normalized(query)?;
        self.parcels
            .iter()
            .find(|p| p.id.to_lowercase() == needle)
            .or_else(|| self.parcels.iter().find(|p| p.id.to_lowercase().contains(&needle)))
    }

    /// First parcel (by id) whose owner contains `query`, case-insensitively.
    pub fn find_by_owner(&self, query: &str) -> Option<&Parcel> {
        let needle = normalized(query)?;
        self.parcels.iter().find(|p| p.owner.to_lowercase().contains(&needle))
    }

    /// First parcel (by id) whose bounding path contains `point`.
    pub fn find_containing(&self, point: LatLng) -> Option<&Parcel> {
        self.parcels
            .iter()
            .filter(|p| p.bounds().is_some_and(|b| b.contains(point)))
            .find(|p| path_contains(&p.bounding_path, point))
    }

    pub fn outlines(&self) -> Vec<ParcelOutline> {
        self.parcels
            .iter()
            .map(|p| ParcelOutline { id: p.id.clone(), path: p.bounding_path.clone() })
            .collect()
    }
}

fn normalized(query: &str) -> Option<String> {
    let q = query.trim();
    if q.is_empty() {
        None
    } else {
        Some(q.to_lowercase())
    }
}
