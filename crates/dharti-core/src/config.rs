//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_GEOCODER__API_KEY`). Provides helpers
//! to expand `~` and `${VAR}` and to resolve relative paths against a known
//! base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The full settings tree; absent sections take their defaults.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.camera.point_zoom > 22 {
            return Err(crate::Error::InvalidConfig(format!(
                "camera.point_zoom must be <= 22, got {}",
                settings.camera.point_zoom
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locator: LocatorSettings,
    pub camera: CameraSettings,
    pub geocoder: ServiceSettings,
    pub records: RecordSettings,
    pub completion: CompletionSettings,
    pub verify: VerifySettings,
    pub map: MapSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSettings {
    /// Attach a parcel id to geocoded points that fall inside a parcel.
    pub reconcile_geocoded_points: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fit_padding_px: u32,
    pub point_zoom: u8,
    pub fly_duration_ms: u64,
    pub tilt_delay_ms: u64,
    pub tilt_deg: f64,
    pub heading_deg: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fit_padding_px: 48,
            point_zoom: 16,
            fly_duration_ms: 1400,
            tilt_delay_ms: 450,
            tilt_deg: 67.5,
            heading_deg: 35.0,
        }
    }
}

/// Base URL plus optional key for an HTTP collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self { base_url: None, api_key: None, table: "property_listings".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self { base_url: None, api_key: None, model: "gpt-4o-mini".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifySettings {
    pub ledger_path: String,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self { ledger_path: "data/verifications.jsonl".to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub api_key: Option<String>,
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
