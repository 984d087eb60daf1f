use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid parcel: {0}")]
    InvalidParcel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A stored coordinate value could not be turned into a `(lat, lng)` pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unrecognized coordinate encoding ({0})")]
    Unrecognized(&'static str),

    #[error("malformed geography literal: {0}")]
    MalformedGeography(String),

    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    OutOfRange { lat: f64, lng: f64 },
}

/// Failure of a collaborator this crate does not own (record store,
/// geocoder, completion API, map provider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: &'static str, reason: String },

    #[error("{service} credential is not configured")]
    MissingCredential { service: &'static str },

    #[error("{service} rejected the request (status {status})")]
    Rejected { service: &'static str, status: String },

    #[error("{service} returned an unexpected response: {reason}")]
    Malformed { service: &'static str, reason: String },
}

impl ExternalServiceError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. }
            | Self::MissingCredential { service }
            | Self::Rejected { service, .. }
            | Self::Malformed { service, .. } => service,
        }
    }
}

/// Outcome of a search that did not produce a location.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no match")]
    NoMatch,

    #[error("coordinates missing or invalid")]
    CoordinatesInvalid {
        record_id: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    External(#[from] ExternalServiceError),
}

impl LocateError {
    /// Text shown to the person who ran the search.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoMatch => {
                "Enter at least Parcel ID, Owner name, or a valid Address.".to_string()
            }
            Self::CoordinatesInvalid { .. } => {
                "The matched record has missing or invalid coordinates.".to_string()
            }
            Self::External(ExternalServiceError::MissingCredential { service }) => {
                format!("The {service} service is not configured. Please configure your API key.")
            }
            Self::External(_) => "Search failed. Please try again.".to_string(),
        }
    }
}
