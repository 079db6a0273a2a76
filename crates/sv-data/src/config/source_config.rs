//! Configuration for the sightings table

use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use sv_geo::Crs;

use super::null_handling::NullConfig;
use crate::DataError;

/// Column names the loader requires
pub mod columns {
    pub const ORDER: &str = "order";
    pub const FAMILY: &str = "family";
    pub const SPECIES: &str = "species";
    pub const LATITUDE: &str = "decimallatitude";
    pub const LONGITUDE: &str = "decimallongitude";
    pub const EVENT_DATE: &str = "eventdate";

    pub const REQUIRED: [&str; 6] = [ORDER, FAMILY, SPECIES, LATITUDE, LONGITUDE, EVENT_DATE];
}

/// How to read and interpret the sightings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the table
    pub path: PathBuf,

    /// Field delimiter, a single ASCII character
    pub delimiter: char,

    /// chrono format of the `eventdate` column
    pub date_format: String,

    /// Reference system of the latitude/longitude columns
    pub source_crs: Crs,

    /// Null handling configuration
    pub null_config: NullConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: '\t',
            date_format: "%Y-%m-%dT%H:%MZ".to_string(),
            source_crs: Crs::Wgs84,
            null_config: NullConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Create a configuration for a file with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// The delimiter as the byte the TSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, DataError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DataError::Config(format!(
                "delimiter {:?} is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}
