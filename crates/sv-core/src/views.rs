//! Datasets published to the rendering layer

use serde::{Serialize, Deserialize};

use crate::record::SightingRecord;

/// A point in the display CRS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One scatter point on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewRow {
    pub x: f64,
    pub y: f64,
    pub event_date_text: String,
    pub common_name: String,
    pub species: Option<String>,
    pub color_tag: String,
    pub detail_link: String,
}

impl From<&SightingRecord> for MapViewRow {
    fn from(record: &SightingRecord) -> Self {
        Self {
            x: record.projected_x,
            y: record.projected_y,
            event_date_text: record.event_date_text(),
            common_name: record.common_name.clone(),
            species: record.species.clone(),
            color_tag: record.color_tag.as_str().to_string(),
            detail_link: record.detail_link.clone(),
        }
    }
}

/// Map scatter dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapViewDataset {
    pub rows: Vec<MapViewRow>,
    /// Resolved search origin in the display CRS, used to center the map
    pub center: Option<ProjectedPoint>,
}

impl MapViewDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One point of the sightings-per-year line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartViewRow {
    pub year: String,
    pub count: u64,
}

/// Line chart dataset, ordered by ascending year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartViewDataset {
    pub rows: Vec<ChartViewRow>,
}

impl ChartViewDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}
