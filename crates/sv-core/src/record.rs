//! Normalized sighting records

use std::fmt;
use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

/// Display color assigned to a taxonomic family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Blue,
    Yellow,
    Red,
    Purple,
    Green,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Blue => "blue",
            ColorTag::Yellow => "yellow",
            ColorTag::Red => "red",
            ColorTag::Purple => "purple",
            ColorTag::Green => "green",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence observation, normalized once at load time
#[derive(Debug, Clone, PartialEq)]
pub struct SightingRecord {
    pub order: String,
    pub family: String,
    /// Scientific name, absent when no species was recorded
    pub species: Option<String>,
    /// Empty when `species` is absent
    pub common_name: String,
    /// Geographic latitude, degrees
    pub latitude: f64,
    /// Geographic longitude, degrees
    pub longitude: f64,
    /// Display CRS easting
    pub projected_x: f64,
    /// Display CRS northing
    pub projected_y: f64,
    pub event_date: NaiveDateTime,
    pub day_of_week: String,
    pub month: String,
    pub year: i32,
    pub day_of_month: u32,
    pub color_tag: ColorTag,
    pub detail_link: String,
}

impl SightingRecord {
    /// ISO date of the sighting (`YYYY-MM-DD`)
    pub fn event_date_text(&self) -> String {
        self.event_date.format("%Y-%m-%d").to_string()
    }
}

/// Geographic coordinate bound to the location name it was resolved from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOrigin {
    pub location_name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl ResolvedOrigin {
    pub fn new(location_name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            location_name: location_name.into(),
            longitude,
            latitude,
        }
    }
}
