use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use dharti_core::config::ServiceSettings;
use dharti_core::traits::{Geocoder, ServiceResult};
use dharti_core::{decode_coordinate, ExternalServiceError, LatLng};

use crate::http::{malformed, read_json, required, trim_base, unavailable};

const SERVICE: &str = "geocoder";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Client for a Google Geocoding compatible endpoint.
pub struct HttpGeocoder {
    base_url: String,
    api_key: String,
    http: Client,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: serde_json::Value,
}

impl HttpGeocoder {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self { base_url: trim_base(base_url), api_key: api_key.into(), http: Client::new() }
    }

    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, ExternalServiceError> {
        let api_key = required(SERVICE, &settings.api_key)?;
        Ok(Self::new(settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL), api_key))
    }

    async fn lookup(&self, address: &str) -> ServiceResult<Option<LatLng>> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| unavailable(SERVICE, e))?;
        let body: GeocodeResponse = read_json(SERVICE, resp).await?;
        debug!(status = %body.status, results = body.results.len(), "geocode response");

        match body.status.as_str() {
            "OK" => {
                let Some(first) = body.results.first() else {
                    return Ok(None);
                };
                decode_coordinate(&first.geometry.location)
                    .map(Some)
                    .map_err(|e| malformed(SERVICE, e))
            }
            "ZERO_RESULTS" => Ok(None),
            other => {
                Err(ExternalServiceError::Rejected { service: SERVICE, status: other.to_string() })
            }
        }
    }
}

impl Geocoder for HttpGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>> {
        Box::pin(self.lookup(address))
    }
}
