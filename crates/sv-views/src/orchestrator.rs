//! Reacts to control changes by re-deriving and republishing both views

use std::collections::BTreeSet;
use std::sync::Arc;
use sv_core::events::{EventBus, LocationUnresolved, ViewsPublished};
use sv_core::{
    ControlChange, ControlError, FilterState, MapViewDataset, UpdateCondition, ViewPublisher,
    ViewReader,
};
use sv_data::RecordStore;
use sv_geo::{CachedResolver, LocationResolver};

use crate::{chart_view, map_view};

/// Whether a recomputation is in progress.
///
/// Recomputation runs to completion inside one `&mut self` call, so callers
/// only ever read [`UpdatePhase::Idle`] between calls. `Recomputing` lasts
/// exactly as long as the `recompute` tracing span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Recomputing,
}

/// Summary of one recomputation
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub generation: u64,
    pub map_rows: usize,
    pub chart_rows: usize,
    /// Set when the map view had to be degraded
    pub condition: Option<UpdateCondition>,
}

/// Owns the control state and is the only writer of the published views.
///
/// Every effective control change runs one recomputation that derives the
/// map and chart views from the same [`FilterState`] snapshot and publishes
/// them together. When the location cannot be resolved the map view is
/// published empty and the condition travels with the snapshot; the chart
/// view does not depend on the location and is published as usual.
pub struct UpdateOrchestrator<R> {
    store: RecordStore,
    state: FilterState,
    resolver: CachedResolver<R>,
    publisher: ViewPublisher,
    event_bus: Arc<EventBus>,
    phase: UpdatePhase,
}

impl<R: LocationResolver> UpdateOrchestrator<R> {
    /// Create an orchestrator. Nothing is published until the first
    /// [`refresh`](Self::refresh) or control change.
    pub fn new(store: RecordStore, resolver: R, initial_state: FilterState) -> Self {
        Self {
            store,
            state: initial_state,
            resolver: CachedResolver::new(resolver),
            publisher: ViewPublisher::new(),
            event_bus: Arc::new(EventBus::new()),
            phase: UpdatePhase::Idle,
        }
    }

    /// Publish events on a shared bus instead of a private one
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    /// Always `Idle` once a control call has returned
    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    /// Read handle for the rendering layer
    pub fn views(&self) -> ViewReader {
        self.publisher.reader()
    }

    /// The publisher, for registering subscribers
    pub fn publisher(&self) -> &ViewPublisher {
        &self.publisher
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn resolver(&self) -> &CachedResolver<R> {
        &self.resolver
    }

    /// Recompute and publish both views for the current controls
    pub fn refresh(&mut self) -> UpdateOutcome {
        self.recompute()
    }

    /// Apply a control change.
    ///
    /// Returns `Ok(None)` when the value did not change and nothing was
    /// recomputed. Rejected values leave state and views untouched.
    pub fn apply(&mut self, change: ControlChange) -> Result<Option<UpdateOutcome>, ControlError> {
        tracing::debug!("Control change: {:?}", change);
        if self.state.apply(change)? {
            Ok(Some(self.recompute()))
        } else {
            Ok(None)
        }
    }

    pub fn set_since_year(&mut self, year: i32) -> Result<Option<UpdateOutcome>, ControlError> {
        self.apply(ControlChange::SinceYear(year))
    }

    pub fn set_families(&mut self, families: BTreeSet<String>) -> Result<Option<UpdateOutcome>, ControlError> {
        self.apply(ControlChange::Families(families))
    }

    pub fn set_radius_miles(&mut self, radius_miles: f64) -> Result<Option<UpdateOutcome>, ControlError> {
        self.apply(ControlChange::RadiusMiles(radius_miles))
    }

    pub fn set_location_name(&mut self, name: impl Into<String>) -> Result<Option<UpdateOutcome>, ControlError> {
        self.apply(ControlChange::LocationName(name.into()))
    }

    fn recompute(&mut self) -> UpdateOutcome {
        self.phase = UpdatePhase::Recomputing;

        let span = tracing::info_span!(
            "recompute",
            since_year = self.state.since_year,
            families = self.state.families.len(),
            radius_miles = self.state.radius_miles,
            location = %self.state.location_name
        );
        let _guard = span.enter();

        let records = self.store.records();
        let (map, condition) = match map_view::select(records, &self.state, &self.resolver) {
            Ok(map) => (map, None),
            Err(err) => {
                tracing::warn!("Map view published empty: {}", err);
                (MapViewDataset::empty(), Some(UpdateCondition::from(err)))
            }
        };
        let chart = chart_view::aggregate(records, &self.state.families);

        let map_rows = map.len();
        let chart_rows = chart.len();
        let generation = self.publisher.publish(map, chart, condition.clone());

        tracing::info!(
            "Published generation {}: {} map points, {} chart years",
            generation,
            map_rows,
            chart_rows
        );

        self.event_bus.publish(ViewsPublished { generation, map_rows, chart_rows });
        if let Some(condition) = &condition {
            self.event_bus.publish(LocationUnresolved {
                generation,
                condition: condition.clone(),
            });
        }

        self.phase = UpdatePhase::Idle;
        UpdateOutcome {
            generation,
            map_rows,
            chart_rows,
            condition,
        }
    }
}
