//! Derived views for the sightings dashboard
//!
//! The [`UpdateOrchestrator`] owns the control state and turns every change
//! into one recomputation of the map scatter ([`map_view`]) and the yearly
//! line chart ([`chart_view`]), published together through
//! [`sv_core::ViewPublisher`].

pub mod chart_view;
pub mod config;
pub mod export;
pub mod map_view;
pub mod orchestrator;

pub use chart_view::FamilyYearCount;
pub use config::DashboardConfig;
pub use export::ToRecordBatch;
pub use map_view::Selection;
pub use orchestrator::{UpdateOrchestrator, UpdateOutcome, UpdatePhase};

use std::sync::Arc;
use anyhow::Context;
use sv_core::events::{EventBus, RecordsLoaded};
use sv_data::TsvSource;
use sv_geo::{LocationResolver, NominatimResolver};

/// Open a dashboard backed by the Nominatim geocoder
pub fn open_dashboard(config: &DashboardConfig) -> anyhow::Result<UpdateOrchestrator<NominatimResolver>> {
    let resolver = NominatimResolver::from_config(config.geocoder.clone())
        .context("failed to build geocoding client")?;
    open_dashboard_with(config, resolver)
}

/// Load the record store and publish the initial views using `resolver`
pub fn open_dashboard_with<R: LocationResolver>(
    config: &DashboardConfig,
    resolver: R,
) -> anyhow::Result<UpdateOrchestrator<R>> {
    open_dashboard_on(config, resolver, Arc::new(EventBus::new()))
}

/// Like [`open_dashboard_with`], publishing events on `event_bus` from the
/// initial load onward
pub fn open_dashboard_on<R: LocationResolver>(
    config: &DashboardConfig,
    resolver: R,
    event_bus: Arc<EventBus>,
) -> anyhow::Result<UpdateOrchestrator<R>> {
    config
        .initial_state
        .validate()
        .context("invalid initial control state")?;

    let store = TsvSource::new(config.source.clone())
        .load()
        .with_context(|| format!("failed to load sightings from {}", config.source.path.display()))?;

    let loaded = RecordsLoaded {
        source_name: store.source_name().to_string(),
        record_count: store.len(),
        dropped_rows: store.dropped_rows(),
    };

    let mut orchestrator =
        UpdateOrchestrator::new(store, resolver, config.initial_state.clone()).with_event_bus(event_bus);
    orchestrator.event_bus().publish(loaded);
    orchestrator.refresh();
    Ok(orchestrator)
}
