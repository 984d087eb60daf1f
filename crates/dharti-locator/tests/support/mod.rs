#![allow(dead_code)]

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use dharti_core::traits::{Geocoder, RecordSource, ServiceResult};
use dharti_core::{ExternalServiceError, LatLng, Parcel, RecordKey, RecordRow};
use dharti_index::ParcelIndex;

pub fn square(id: &str, owner: &str, lat: f64, lng: f64) -> Parcel {
    let path = vec![
        LatLng::new(lat, lng),
        LatLng::new(lat, lng + 0.002),
        LatLng::new(lat + 0.002, lng + 0.002),
        LatLng::new(lat + 0.002, lng),
    ];
    Parcel::new(id, owner, path).expect("parcel")
}

pub fn index(parcels: Vec<Parcel>) -> Arc<ParcelIndex> {
    Arc::new(ParcelIndex::new(parcels).expect("index"))
}

/// Address -> point table; counts calls.
#[derive(Default)]
pub struct StubGeocoder {
    pub points: HashMap<String, LatLng>,
    pub calls: Arc<AtomicUsize>,
}

impl StubGeocoder {
    pub fn with(address: &str, point: LatLng) -> Self {
        let mut points = HashMap::new();
        points.insert(address.to_string(), point);
        Self { points, calls: Arc::default() }
    }
}

impl Geocoder for StubGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.points.get(address).copied())
        })
    }
}

pub struct FailingGeocoder;

impl Geocoder for FailingGeocoder {
    fn geocode<'a>(&'a self, _address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>> {
        Box::pin(async {
            Err(ExternalServiceError::Rejected {
                service: "geocoder",
                status: "OVER_QUERY_LIMIT".into(),
            })
        })
    }
}

/// Geocoder whose answer for `slow` waits until `gate` is notified. Every
/// other address answers `point` at once.
pub struct GatedGeocoder {
    pub slow: String,
    pub slow_point: LatLng,
    pub gate: Arc<Notify>,
    pub point: LatLng,
}

impl Geocoder for GatedGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>> {
        Box::pin(async move {
            if address == self.slow {
                self.gate.notified().await;
                return Ok(Some(self.slow_point));
            }
            Ok(Some(self.point))
        })
    }
}

/// Rows keyed by record key; remembers the keys it was asked for.
#[derive(Default)]
pub struct StubRecords {
    pub rows: Vec<(RecordKey, RecordRow)>,
    pub asked: Arc<Mutex<Vec<RecordKey>>>,
}

impl StubRecords {
    pub fn with(key: RecordKey, row: RecordRow) -> Self {
        Self { rows: vec![(key, row)], asked: Arc::default() }
    }
}

impl RecordSource for StubRecords {
    fn find<'a>(&'a self, key: &'a RecordKey) -> BoxFuture<'a, ServiceResult<Option<RecordRow>>> {
        Box::pin(async move {
            self.asked.lock().expect("lock").push(key.clone());
            Ok(self.rows.iter().find(|(k, _)| k == key).map(|(_, row)| row.clone()))
        })
    }
}

pub fn row(id: &str, coordinates: serde_json::Value) -> RecordRow {
    RecordRow { id: id.to_string(), title: None, location: None, owner: None, coordinates }
}
