//! Land document verification: decode an upload, look for a coordinate pair,
//! mint a token and record the result in an append-only ledger.

pub mod extract;
pub mod ledger;
pub mod service;
pub mod token;

pub use extract::{extract_text, scan_coordinates, LatLon, NO_TEXT_PLACEHOLDER};
pub use ledger::{LedgerEntry, LedgerError, VerificationLedger};
pub use service::{VerificationService, VerifyRequest, VerifyResponse, NO_COORDINATES_SENTINEL};
pub use token::mint_token;
