use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use dharti_core::traits::TextCompleter;

use crate::extract::{extract_text, scan_coordinates, LatLon};
use crate::ledger::{LedgerEntry, VerificationLedger};
use crate::token::mint_token;

/// Reply the completion model gives when the text has no location.
pub const NO_COORDINATES_SENTINEL: &str = "NO_COORDINATES_FOUND";

/// Document text sent to the completion model is capped at this many chars.
const PROMPT_TEXT_LIMIT: usize = 6000;

const VERIFIED: &str = "Document verified successfully";
const MISSING_INPUT: &str = "Missing filename or content";
const BAD_BASE64: &str = "Content is not valid base64";
const INTERNAL: &str = "Internal server error during verification";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64 of the uploaded bytes.
    #[serde(default)]
    pub content: Option<String>,
}

impl VerifyRequest {
    pub fn new(filename: impl Into<String>, content_b64: impl Into<String>) -> Self {
        Self { filename: Some(filename.into()), content: Some(content_b64.into()) }
    }

    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(filename, STANDARD.encode(bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Absent on failure, `null` when a verified document had no location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Option<LatLon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl VerifyResponse {
    fn failed(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_string(),
            token: None,
            coordinates: None,
            filename: None,
        }
    }

    pub fn location(&self) -> Option<LatLon> {
        self.coordinates.flatten()
    }
}

pub struct VerificationService {
    completer: Option<Box<dyn TextCompleter>>,
    ledger: VerificationLedger,
}

impl VerificationService {
    pub fn new(ledger: VerificationLedger) -> Self {
        Self { completer: None, ledger }
    }

    /// Model consulted when the text has no recognisable coordinate pair.
    pub fn with_completer(mut self, completer: Box<dyn TextCompleter>) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn ledger(&self) -> &VerificationLedger {
        &self.ledger
    }

    pub async fn verify(&self, request: &VerifyRequest) -> VerifyResponse {
        let (Some(filename), Some(content)) =
            (non_blank(&request.filename), non_blank(&request.content))
        else {
            return VerifyResponse::failed(MISSING_INPUT);
        };
        let bytes = match STANDARD.decode(content.trim()) {
            Ok(b) => b,
            Err(e) => {
                warn!(filename, error = %e, "rejecting upload");
                return VerifyResponse::failed(BAD_BASE64);
            }
        };
        info!(filename, bytes = bytes.len(), "verifying document");

        let text = extract_text(&bytes);
        let coordinates = match scan_coordinates(&text) {
            Some(found) => Some(found),
            None => self.ask_completer(&text).await,
        };

        let now = Utc::now();
        let entry = LedgerEntry {
            token: mint_token(now),
            filename: filename.to_string(),
            digest: blake3::hash(&bytes).to_hex().to_string(),
            coordinates,
            verified_at: now.to_rfc3339(),
        };
        if let Err(e) = self.ledger.append(&entry) {
            let path = self.ledger.path().display();
            error!(path = %path, error = %e, "could not record verification");
            return VerifyResponse::failed(INTERNAL);
        }
        info!(token = %entry.token, located = coordinates.is_some(), "document verified");

        VerifyResponse {
            ok: true,
            message: VERIFIED.to_string(),
            token: Some(entry.token),
            coordinates: Some(coordinates),
            filename: Some(entry.filename),
        }
    }

    async fn ask_completer(&self, text: &str) -> Option<LatLon> {
        let completer = self.completer.as_ref()?;
        match completer.complete(&completion_prompt(text)).await {
            Ok(reply) if reply.contains(NO_COORDINATES_SENTINEL) => None,
            Ok(reply) => scan_coordinates(&reply),
            Err(e) => {
                warn!(error = %e, "coordinate completion failed");
                None
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn completion_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(PROMPT_TEXT_LIMIT).collect();
    format!(
        "The following text was extracted from a land record. Reply with the parcel's \
         location as decimal degrees in the form `lat, lon` and nothing else. If the text \
         does not contain enough information, reply exactly {NO_COORDINATES_SENTINEL}.\n\n{excerpt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_sentinel_and_caps_text() {
        let long = "x".repeat(PROMPT_TEXT_LIMIT + 100);
        let prompt = completion_prompt(&long);
        assert!(prompt.contains(NO_COORDINATES_SENTINEL));
        assert!(prompt.ends_with(&"x".repeat(PROMPT_TEXT_LIMIT)));
        assert!(!prompt.contains(&"x".repeat(PROMPT_TEXT_LIMIT + 1)));
    }

    #[test]
    fn failed_response_omits_token_and_coordinates() {
        let json = serde_json::to_value(VerifyResponse::failed(MISSING_INPUT)).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "message": MISSING_INPUT}));
    }
}
