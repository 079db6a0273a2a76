use std::collections::BTreeSet;
use indexmap::IndexSet;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::record::SightingRecord;

/// The four independent control values driving both views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Inclusive lower bound on the sighting year
    pub since_year: i32,

    /// Selected families; empty means nothing is selected
    pub families: BTreeSet<String>,

    /// Search radius around the resolved location
    pub radius_miles: f64,

    /// Free-text place name to center the search on
    pub location_name: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            since_year: 1990,
            families: BTreeSet::from(["Balaenopteridae".to_string()]),
            radius_miles: 150.0,
            location_name: "Sydney".to_string(),
        }
    }
}

/// A single control edit
#[derive(Debug, Clone, PartialEq)]
pub enum ControlChange {
    SinceYear(i32),
    Families(BTreeSet<String>),
    RadiusMiles(f64),
    LocationName(String),
}

/// Rejected control values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("search radius must be a positive number of miles, got {0}")]
    InvalidRadius(f64),
}

impl FilterState {
    /// Apply a control edit.
    ///
    /// Returns `Ok(true)` when the value actually changed. Invalid values
    /// leave the state untouched.
    pub fn apply(&mut self, change: ControlChange) -> Result<bool, ControlError> {
        match change {
            ControlChange::SinceYear(year) => Ok(replace_if_changed(&mut self.since_year, year)),
            ControlChange::Families(families) => Ok(replace_if_changed(&mut self.families, families)),
            ControlChange::RadiusMiles(radius) => {
                validate_radius(radius)?;
                Ok(replace_if_changed(&mut self.radius_miles, radius))
            }
            ControlChange::LocationName(name) => Ok(replace_if_changed(&mut self.location_name, name)),
        }
    }

    /// Check every field, used when a state is loaded from configuration
    pub fn validate(&self) -> Result<(), ControlError> {
        validate_radius(self.radius_miles)
    }
}

fn validate_radius(radius: f64) -> Result<(), ControlError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ControlError::InvalidRadius(radius))
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Bounds of the search radius slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusSlider {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for RadiusSlider {
    fn default() -> Self {
        Self {
            start: 50.0,
            end: 1000.0,
            step: 50.0,
        }
    }
}

/// Values offered by the controls for a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOptions {
    /// Distinct sighting years, ascending
    pub years: Vec<i32>,

    /// Distinct families in first-seen order
    pub families: Vec<String>,

    pub radius: RadiusSlider,
}

impl ControlOptions {
    pub fn from_records(records: &[SightingRecord]) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let families: IndexSet<&str> = records.iter().map(|r| r.family.as_str()).collect();

        Self {
            years: years.into_iter().collect(),
            families: families.into_iter().map(str::to_string).collect(),
            radius: RadiusSlider::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reports_change() {
        let mut state = FilterState::default();

        assert_eq!(state.apply(ControlChange::SinceYear(1990)), Ok(false));
        assert_eq!(state.apply(ControlChange::SinceYear(2001)), Ok(true));
        assert_eq!(state.since_year, 2001);

        let families = BTreeSet::from(["Delphinidae".to_string()]);
        assert_eq!(state.apply(ControlChange::Families(families.clone())), Ok(true));
        assert_eq!(state.families, families);

        assert_eq!(state.apply(ControlChange::LocationName("Perth".into())), Ok(true));
        assert_eq!(state.location_name, "Perth");
    }

    #[test]
    fn test_invalid_radius_leaves_state_untouched() {
        let mut state = FilterState::default();

        assert_eq!(
            state.apply(ControlChange::RadiusMiles(0.0)),
            Err(ControlError::InvalidRadius(0.0))
        );
        assert!(state.apply(ControlChange::RadiusMiles(f64::NAN)).is_err());
        assert!(state.apply(ControlChange::RadiusMiles(-50.0)).is_err());
        assert_eq!(state.radius_miles, 150.0);

        assert_eq!(state.apply(ControlChange::RadiusMiles(300.0)), Ok(true));
        assert_eq!(state.radius_miles, 300.0);
    }

    #[test]
    fn test_filter_state_partial_json_uses_defaults() {
        let state: FilterState = serde_json::from_str(r#"{"since_year": 2005}"#).unwrap();
        assert_eq!(state.since_year, 2005);
        assert_eq!(state.location_name, "Sydney");
        assert!(state.families.contains("Balaenopteridae"));
        assert!(state.validate().is_ok());
    }
}
