//! dharti-core
//!
//! Shared vocabulary for the parcel locator: geographic types, the coordinate
//! decoder, the error taxonomy, collaborator traits and configuration.

pub mod config;
pub mod coords;
pub mod error;
pub mod traits;
pub mod types;

pub use coords::{decode_coordinate, CoordinateValue};
pub use error::{DecodeError, Error, ExternalServiceError, LocateError, Result};
pub use types::{Bounds, LatLng, Parcel, ParcelId, RecordKey, RecordRow};
