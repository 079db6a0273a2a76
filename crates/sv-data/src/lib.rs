//! Sighting record loading and normalization

pub mod config;
pub mod sources;
pub mod store;
pub mod taxonomy;

use sv_geo::ProjectionError;
use thiserror::Error;

// Re-exports
pub use config::{NullConfig, SourceConfig};
pub use sources::TsvSource;
pub use store::RecordStore;
pub use taxonomy::TaxonomyError;

/// Errors that can occur while loading the record store.
///
/// Every variant is fatal: a load either yields a fully normalized store or
/// nothing. `row` is the 1-based data row, header excluded.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV parsing error: {0}")]
    Csv(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid {column} '{value}': {reason}")]
    DataFormat {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("row {row}: {source}")]
    UnmappedTaxonomy {
        row: usize,
        #[source]
        source: TaxonomyError,
    },

    #[error("row {row}: {source}")]
    Projection {
        row: usize,
        #[source]
        source: ProjectionError,
    },

    #[error("invalid source configuration: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
