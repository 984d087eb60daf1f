use reqwest::Response;
use serde::de::DeserializeOwned;
use std::fmt::Display;

use dharti_core::ExternalServiceError;

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

pub(crate) fn required(
    service: &'static str,
    value: &Option<String>,
) -> Result<String, ExternalServiceError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ExternalServiceError::MissingCredential { service })
}

pub(crate) fn unavailable(service: &'static str, e: reqwest::Error) -> ExternalServiceError {
    ExternalServiceError::Unavailable { service, reason: e.to_string() }
}

pub(crate) fn malformed(service: &'static str, reason: impl Display) -> ExternalServiceError {
    ExternalServiceError::Malformed { service, reason: reason.to_string() }
}

/// Non-2xx becomes `Rejected`; a body that does not parse becomes `Malformed`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    resp: Response,
) -> Result<T, ExternalServiceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(200).collect();
        tracing::warn!(service, %status, body = %excerpt, "request rejected");
        return Err(ExternalServiceError::Rejected { service, status: status.as_u16().to_string() });
    }
    resp.json::<T>().await.map_err(|e| malformed(service, e))
}
