//! Domain types shared by the index, locator and verification crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};

pub type ParcelId = String;

/// A WGS84 point. Latitude first, unlike GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside `[-90, 90] x [-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Vertex average of a path. `None` for an empty path.
    pub fn centroid(path: &[LatLng]) -> Option<LatLng> {
        if path.is_empty() {
            return None;
        }
        let n = path.len() as f64;
        let (lat, lng) = path.iter().fold((0.0, 0.0), |(a, b), p| (a + p.lat, b + p.lng));
        Some(LatLng::new(lat / n, lng / n))
    }
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Smallest box enclosing every vertex of `path`.
    pub fn enclosing(path: &[LatLng]) -> Option<Bounds> {
        let first = path.first()?;
        let init = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        Some(path.iter().skip(1).fold(init, |b, p| Bounds {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lng: b.min_lng.min(p.lng),
            max_lng: b.max_lng.max(p.lng),
        }))
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }

    pub fn contains(&self, p: LatLng) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lng..=self.max_lng).contains(&p.lng)
    }
}

/// A land parcel as held by the in-memory index.
///
/// `bounding_path` is an open ring of at least three vertices; consumers close
/// it when drawing. Metadata fields are descriptive only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub owner: String,
    pub bounding_path: Vec<LatLng>,
    #[serde(default)]
    pub area_sq_m: f64,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub encumbrances: BTreeSet<String>,
    #[serde(default)]
    pub chain_asset_id: String,
    #[serde(default)]
    pub doc_digest: String,
}

impl Parcel {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        bounding_path: Vec<LatLng>,
    ) -> Result<Self> {
        let parcel = Self {
            id: id.into(),
            owner: owner.into(),
            bounding_path,
            area_sq_m: 0.0,
            jurisdiction: String::new(),
            encumbrances: BTreeSet::new(),
            chain_asset_id: String::new(),
            doc_digest: String::new(),
        };
        parcel.validate()?;
        Ok(parcel)
    }

    pub fn with_area(mut self, area_sq_m: f64) -> Self {
        self.area_sq_m = area_sq_m;
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    pub fn with_encumbrance(mut self, encumbrance: impl Into<String>) -> Self {
        self.encumbrances.insert(encumbrance.into());
        self
    }

    pub fn with_chain_asset_id(mut self, chain_asset_id: impl Into<String>) -> Self {
        self.chain_asset_id = chain_asset_id.into();
        self
    }

    pub fn with_doc_digest(mut self, doc_digest: impl Into<String>) -> Self {
        self.doc_digest = doc_digest.into();
        self
    }

    /// Checks the id and path invariants. Deserialized parcels bypass `new`,
    /// so the index calls this again on insert.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidParcel("empty id".to_string()));
        }
        if self.bounding_path.len() < 3 {
            return Err(Error::InvalidParcel(format!(
                "{}: bounding path needs at least 3 vertices, got {}",
                self.id,
                self.bounding_path.len()
            )));
        }
        if let Some(bad) = self.bounding_path.iter().find(|p| !p.is_valid()) {
            return Err(Error::InvalidParcel(format!(
                "{}: vertex out of range ({}, {})",
                self.id, bad.lat, bad.lng
            )));
        }
        Ok(())
    }

    pub fn centroid(&self) -> LatLng {
        // validate() guarantees a non-empty path; the fallback is unreachable in practice.
        LatLng::centroid(&self.bounding_path).unwrap_or(LatLng::new(0.0, 0.0))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.bounding_path)
    }
}

/// Key for the external record store, tried in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKey {
    Id(String),
    Owner(String),
    Location(String),
}

impl RecordKey {
    pub fn text(&self) -> &str {
        match self {
            Self::Id(s) | Self::Owner(s) | Self::Location(s) => s,
        }
    }
}

/// A row returned by the external record store. `coordinates` is kept raw;
/// the decoder decides what it means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "seller_name")]
    pub owner: Option<String>,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn bounds_of_unit_square_are_exact() {
        let b = Bounds::enclosing(&unit_square()).expect("bounds");
        assert_eq!(b, Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 });
        assert_eq!(b.center(), LatLng::new(0.5, 0.5));
        assert!(Bounds::enclosing(&[]).is_none());
    }

    #[test]
    fn parcel_rejects_degenerate_paths() {
        let two = vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
        assert!(matches!(Parcel::new("P-1", "A", two), Err(Error::InvalidParcel(_))));
        let bad = vec![LatLng::new(0.0, 0.0), LatLng::new(91.0, 1.0), LatLng::new(1.0, 0.0)];
        assert!(Parcel::new("P-1", "A", bad).is_err());
        assert!(Parcel::new("  ", "A", unit_square()).is_err());
    }

    #[test]
    fn parcel_centroid_is_vertex_average() {
        let p = Parcel::new("P-1", "A", unit_square()).expect("parcel").with_encumbrance("Lien");
        assert_eq!(p.centroid(), LatLng::new(0.5, 0.5));
        assert!(p.encumbrances.contains("Lien"));
    }

    #[test]
    fn record_row_accepts_seller_name() {
        let row: RecordRow = serde_json::from_value(serde_json::json!({
            "id": "7", "seller_name": "Rahul Singh", "coordinates": [77.59, 12.97]
        }))
        .expect("row");
        assert_eq!(row.owner.as_deref(), Some("Rahul Singh"));
        assert!(row.title.is_none());
    }
}
