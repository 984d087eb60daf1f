use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::extract::LatLon;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger entry encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// One verified upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub token: String,
    pub filename: String,
    /// blake3 of the decoded upload, hex.
    pub digest: String,
    pub coordinates: Option<LatLon>,
    /// RFC 3339, UTC.
    pub verified_at: String,
}

/// Append-only JSON-lines file.
#[derive(Debug, Clone)]
pub struct VerificationLedger {
    path: PathBuf,
}

impl VerificationLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// All entries in write order. A missing file is an empty ledger.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line)?);
        }
        Ok(out)
    }
}
