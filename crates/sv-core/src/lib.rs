//! Core functionality for the sightings dashboard
//!
//! This crate provides the record and view data model, the control state
//! shared by the filter pipeline, and the publication channel that hands
//! recomputed views to the rendering layer.

pub mod events;
pub mod record;
pub mod state;
pub mod subscriber;
pub mod sync;
pub mod views;

// Re-export commonly used types
pub use record::{ColorTag, ResolvedOrigin, SightingRecord};
pub use state::{ControlChange, ControlError, ControlOptions, FilterState, RadiusSlider};
pub use subscriber::ViewSubscriber;
pub use sync::{UpdateCondition, ViewPublisher, ViewReader, ViewSnapshot};
pub use views::{ChartViewDataset, ChartViewRow, MapViewDataset, MapViewRow, ProjectedPoint};
