//! Dashboard configuration

use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Serialize, Deserialize};
use sv_core::FilterState;
use sv_data::SourceConfig;
use sv_geo::GeocoderConfig;

pub const ENV_DATA_PATH: &str = "SV_DATA_PATH";
pub const ENV_GEOCODER_URL: &str = "SV_GEOCODER_URL";
pub const ENV_GEOCODER_TIMEOUT_MS: &str = "SV_GEOCODER_TIMEOUT_MS";

/// Everything needed to assemble a dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub geocoder: GeocoderConfig,
    /// Control values before the user touches anything
    pub initial_state: FilterState,
}

impl DashboardConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid dashboard configuration")
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Apply `SV_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparsable values are
    /// ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH) {
            self.source.path = PathBuf::from(path);
        }
        if let Some(url) = lookup(ENV_GEOCODER_URL) {
            self.geocoder.endpoint = url;
        }
        if let Some(timeout) = lookup(ENV_GEOCODER_TIMEOUT_MS) {
            match timeout.parse() {
                Ok(ms) => self.geocoder.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring {}={:?}: not a number of milliseconds", ENV_GEOCODER_TIMEOUT_MS, timeout),
            }
        }
        self
    }
}
