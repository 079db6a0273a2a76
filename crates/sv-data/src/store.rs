//! Immutable, normalized record store

use std::sync::Arc;
use sv_core::{ControlOptions, SightingRecord};

/// Records produced by one load, shared read-only by every view
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[SightingRecord]>,
    source_name: String,
    dropped_rows: usize,
}

impl RecordStore {
    pub fn new(records: Vec<SightingRecord>, source_name: impl Into<String>, dropped_rows: usize) -> Self {
        Self {
            records: records.into(),
            source_name: source_name.into(),
            dropped_rows,
        }
    }

    pub fn records(&self) -> &[SightingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows skipped at load because they carried no event date
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Options for the year, family and radius controls
    pub fn control_options(&self) -> ControlOptions {
        ControlOptions::from_records(&self.records)
    }
}
