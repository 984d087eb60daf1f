//! Wiring shared by the command line tools: logging, service clients built
//! from configuration, and a view surface that prints navigation commands.

use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dharti_core::config::{MapSettings, Settings};
use dharti_core::traits::{Geocoder, ServiceResult, TextCompleter};
use dharti_core::{ExternalServiceError, LatLng};
use dharti_index::demo::demo_parcels;
use dharti_index::ParcelIndex;
use dharti_locator::{NavCommand, ProviderCache, Resolver, ViewSurface};
use dharti_remote::{ChatCompletionClient, HttpGeocoder, PostgrestRecordSource};
use dharti_verify::{VerificationLedger, VerificationService};

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Stands in for a collaborator whose credentials are missing, so the
/// search still reports the configuration problem when it gets that far.
struct Unconfigured {
    service: &'static str,
}

impl Unconfigured {
    fn error(&self) -> ExternalServiceError {
        ExternalServiceError::MissingCredential { service: self.service }
    }
}

impl Geocoder for Unconfigured {
    fn geocode<'a>(&'a self, _address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>> {
        Box::pin(async move { Err(self.error()) })
    }
}

impl TextCompleter for Unconfigured {
    fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, ServiceResult<String>> {
        Box::pin(async move { Err(self.error()) })
    }
}

/// Demo registry plus whichever hosted services are configured.
pub fn build_resolver(settings: &Settings) -> anyhow::Result<Resolver> {
    let index = Arc::new(ParcelIndex::new(demo_parcels())?);
    info!(parcels = index.len(), "parcel index ready");

    let mut resolver = Resolver::new(index)
        .reconcile_geocoded_points(settings.locator.reconcile_geocoded_points);
    match PostgrestRecordSource::from_settings(&settings.records) {
        Ok(source) => resolver = resolver.with_records(Box::new(source)),
        Err(e) => debug!(error = %e, "record lookups disabled"),
    }
    resolver = match HttpGeocoder::from_settings(&settings.geocoder) {
        Ok(geocoder) => resolver.with_geocoder(Box::new(geocoder)),
        Err(ExternalServiceError::MissingCredential { service }) => {
            resolver.with_geocoder(Box::new(Unconfigured { service }))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(resolver)
}

pub fn build_verifier(settings: &Settings) -> VerificationService {
    let ledger_path = dharti_core::config::expand_path(&settings.verify.ledger_path);
    let ledger = VerificationLedger::new(ledger_path);
    let service = VerificationService::new(ledger);
    match ChatCompletionClient::from_settings(&settings.completion) {
        Ok(client) => service.with_completer(Box::new(client)),
        Err(e) => {
            debug!(error = %e, "completion fallback disabled");
            service.with_completer(Box::new(Unconfigured { service: "completion" }))
        }
    }
}

/// A loaded map provider. Holds the key it was loaded with.
#[derive(Debug)]
pub struct MapProvider {
    pub api_key: String,
}

/// Prints navigation commands instead of drawing them.
pub struct ConsoleSurface {
    settings: MapSettings,
    provider: ProviderCache<MapProvider>,
}

impl ConsoleSurface {
    pub fn new(settings: MapSettings) -> Self {
        Self { settings, provider: ProviderCache::new() }
    }

    pub fn provider(&self) -> &ProviderCache<MapProvider> {
        &self.provider
    }
}

impl ViewSurface for ConsoleSurface {
    fn load_map(&self) -> BoxFuture<'_, Result<(), ExternalServiceError>> {
        Box::pin(async move {
            let key = self.settings.api_key.clone().filter(|k| !k.trim().is_empty());
            self.provider
                .get_or_load(|| async move {
                    key.map(|api_key| MapProvider { api_key })
                        .ok_or(ExternalServiceError::MissingCredential { service: "map" })
                })
                .await
                .map(|_| ())
        })
    }

    fn execute<'a>(&'a self, command: &'a NavCommand) -> BoxFuture<'a, ()> {
        Box::pin(async move { println!("{}", describe(command)) })
    }
}

pub fn describe(command: &NavCommand) -> String {
    match command {
        NavCommand::FlyTo { target, duration_ms } => {
            format!("🌍 globe → ({:.5}, {:.5}) over {} ms", target.lat, target.lng, duration_ms)
        }
        NavCommand::ShowMap => "🗺️  map view".to_string(),
        NavCommand::ShowGlobe => "🌍 globe view".to_string(),
        NavCommand::OverlayParcels(outlines) => format!("🧩 overlay {} parcels", outlines.len()),
        NavCommand::FitBounds { bounds, padding_px } => format!(
            "📐 fit [{:.5}, {:.5}] – [{:.5}, {:.5}] padding {} px",
            bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng, padding_px
        ),
        NavCommand::TiltHeading { tilt_deg, heading_deg, after_ms } => {
            format!("🎥 tilt {tilt_deg}° heading {heading_deg}° after {after_ms} ms")
        }
        NavCommand::CenterOn { point, zoom } => {
            format!("🎯 center ({:.5}, {:.5}) zoom {}", point.lat, point.lng, zoom)
        }
        NavCommand::Pulse { at } => format!("📍 pulse ({:.5}, {:.5})", at.lat, at.lng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn map_without_key_is_not_configured_and_retries() {
        let surface = ConsoleSurface::new(MapSettings::default());
        let err = surface.load_map().await.unwrap_err();
        assert_eq!(err, ExternalServiceError::MissingCredential { service: "map" });
        assert!(surface.load_map().await.is_err());
        assert_eq!(surface.provider().load_attempts(), 2);
    }

    #[tokio::test]
    async fn map_loads_once() {
        let surface = ConsoleSurface::new(MapSettings { api_key: Some("pk.test".into()) });
        surface.load_map().await.unwrap();
        surface.load_map().await.unwrap();
        assert_eq!(surface.provider().load_attempts(), 1);
        assert_eq!(surface.provider().get().unwrap().api_key, "pk.test");
    }

    #[tokio::test]
    async fn unconfigured_geocoder_reports_missing_key() {
        let resolver = build_resolver(&Settings::default()).unwrap();
        let query = dharti_locator::LocateQuery::default().address("MG Road");
        let err = resolver.resolve(&query).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "The geocoder service is not configured. Please configure your API key."
        );
    }

    #[tokio::test]
    async fn demo_parcel_resolves_without_services() {
        let resolver = build_resolver(&Settings::default()).unwrap();
        let query = dharti_locator::LocateQuery::default().parcel("ka-blr-1002");
        let res = resolver.resolve(&query).await.unwrap();
        assert_eq!(res.parcel_id.as_deref(), Some("KA-BLR-1002"));
    }
}
