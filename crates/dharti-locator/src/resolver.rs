use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use dharti_core::traits::{Geocoder, RecordSource};
use dharti_core::{decode_coordinate, LatLng, LocateError, Parcel, ParcelId, RecordKey};
use dharti_index::ParcelIndex;

/// Search input. Blank fields count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocateQuery {
    pub parcel: Option<String>,
    pub owner: Option<String>,
    pub address: Option<String>,
    /// A point the caller already resolved (e.g. a picked autocomplete place).
    pub place: Option<LatLng>,
}

impl LocateQuery {
    pub fn parcel(mut self, text: impl Into<String>) -> Self {
        self.parcel = Some(text.into());
        self
    }

    pub fn owner(mut self, text: impl Into<String>) -> Self {
        self.owner = Some(text.into());
        self
    }

    pub fn address(mut self, text: impl Into<String>) -> Self {
        self.address = Some(text.into());
        self
    }

    pub fn place(mut self, point: LatLng) -> Self {
        self.place = Some(point);
        self
    }

    pub fn parcel_text(&self) -> Option<&str> {
        non_blank(self.parcel.as_deref())
    }

    pub fn owner_text(&self) -> Option<&str> {
        non_blank(self.owner.as_deref())
    }

    pub fn address_text(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }

    /// Record-store keys for the supplied fields, id first.
    pub fn record_keys(&self) -> Vec<RecordKey> {
        let mut keys = Vec::new();
        if let Some(t) = self.parcel_text() {
            keys.push(RecordKey::Id(t.to_string()));
        }
        if let Some(t) = self.owner_text() {
            keys.push(RecordKey::Owner(t.to_string()));
        }
        if let Some(t) = self.address_text() {
            keys.push(RecordKey::Location(t.to_string()));
        }
        keys
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Which step produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionSource {
    ParcelId,
    Owner,
    Record,
    Place,
    Geocoder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Index parcel id, or record id for store hits. `None` for bare points.
    pub parcel_id: Option<ParcelId>,
    pub point: LatLng,
    pub source: ResolutionSource,
}

impl Resolution {
    fn from_parcel(parcel: &Parcel, source: ResolutionSource) -> Self {
        Self { parcel_id: Some(parcel.id.clone()), point: parcel.centroid(), source }
    }
}

/// Ordered search over the parcel index and the external collaborators.
///
/// Steps, first hit wins:
/// 1. parcel text against index ids
/// 2. owner text against index owners
/// 3. record store, keyed by parcel, owner, then address text
/// 4. a caller-supplied place point, if in range
/// 5. address text through the geocoder
pub struct Resolver {
    index: Arc<ParcelIndex>,
    records: Option<Box<dyn RecordSource>>,
    geocoder: Option<Box<dyn Geocoder>>,
    reconcile_geocoded_points: bool,
}

impl Resolver {
    pub fn new(index: Arc<ParcelIndex>) -> Self {
        Self { index, records: None, geocoder: None, reconcile_geocoded_points: false }
    }

    pub fn with_records(mut self, records: Box<dyn RecordSource>) -> Self {
        self.records = Some(records);
        self
    }

    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// When set, place and geocoded points inside a parcel carry its id.
    pub fn reconcile_geocoded_points(mut self, enabled: bool) -> Self {
        self.reconcile_geocoded_points = enabled;
        self
    }

    pub fn index(&self) -> &Arc<ParcelIndex> {
        &self.index
    }

    pub async fn resolve(&self, query: &LocateQuery) -> Result<Resolution, LocateError> {
        let resolution = self.resolve_inner(query).await?;
        info!(
            parcel_id = ?resolution.parcel_id,
            source = ?resolution.source,
            lat = resolution.point.lat,
            lng = resolution.point.lng,
            "search resolved"
        );
        Ok(resolution)
    }

    async fn resolve_inner(&self, query: &LocateQuery) -> Result<Resolution, LocateError> {
        if let Some(text) = query.parcel_text() {
            if let Some(parcel) = self.index.find_by_id(text) {
                return Ok(Resolution::from_parcel(parcel, ResolutionSource::ParcelId));
            }
            debug!(query = text, "no parcel id match");
        }

        if let Some(text) = query.owner_text() {
            if let Some(parcel) = self.index.find_by_owner(text) {
                return Ok(Resolution::from_parcel(parcel, ResolutionSource::Owner));
            }
            debug!(query = text, "no owner match");
        }

        if let Some(records) = &self.records {
            for key in query.record_keys() {
                let Some(row) = records.find(&key).await? else {
                    debug!(?key, "no record");
                    continue;
                };
                return match decode_coordinate(&row.coordinates) {
                    Ok(point) => Ok(Resolution {
                        parcel_id: Some(row.id),
                        point,
                        source: ResolutionSource::Record,
                    }),
                    Err(source) => {
                        warn!(
                            record_id = %row.id,
                            error = %source,
                            "record has undecodable coordinates"
                        );
                        Err(LocateError::CoordinatesInvalid { record_id: row.id, source })
                    }
                };
            }
        }

        match query.place {
            Some(point) if point.is_valid() => {
                return Ok(self.point_resolution(point, ResolutionSource::Place));
            }
            Some(point) => warn!(lat = point.lat, lng = point.lng, "ignoring out-of-range place"),
            None => {}
        }

        if let (Some(address), Some(geocoder)) = (query.address_text(), &self.geocoder) {
            if let Some(point) = geocoder.geocode(address).await? {
                return Ok(self.point_resolution(point, ResolutionSource::Geocoder));
            }
            debug!(address, "geocoder found no candidate");
        }

        Err(LocateError::NoMatch)
    }

    fn point_resolution(&self, point: LatLng, source: ResolutionSource) -> Resolution {
        let parcel_id = if self.reconcile_geocoded_points {
            self.index.find_containing(point).map(|p| p.id.clone())
        } else {
            None
        };
        Resolution { parcel_id, point, source }
    }
}
