//! Seams to the services the locator consumes but does not own.

use futures::future::BoxFuture;

use crate::error::ExternalServiceError;
use crate::types::{LatLng, RecordKey, RecordRow};

pub type ServiceResult<T> = std::result::Result<T, ExternalServiceError>;

/// External record store (listings table).
pub trait RecordSource: Send + Sync {
    /// First row matching `key`, or `None`.
    fn find<'a>(&'a self, key: &'a RecordKey) -> BoxFuture<'a, ServiceResult<Option<RecordRow>>>;
}

/// Free-text address to point. Zero or one candidate.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, ServiceResult<Option<LatLng>>>;
}

/// Single-turn text completion used by document verification.
pub trait TextCompleter: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, ServiceResult<String>>;
}
