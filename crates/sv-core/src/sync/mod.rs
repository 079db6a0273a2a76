use std::fmt;
use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use serde::{Serialize, Deserialize};

use crate::subscriber::ViewSubscriber;
use crate::views::{ChartViewDataset, MapViewDataset};

/// Recoverable condition raised while deriving a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateCondition {
    /// The geocoder found no match for the location name
    LocationNotFound { location_name: String },

    /// The geocoder could not be reached or answered with garbage
    GeocodingUnavailable { location_name: String, reason: String },
}

impl fmt::Display for UpdateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateCondition::LocationNotFound { location_name } => {
                write!(f, "location '{}' not found", location_name)
            }
            UpdateCondition::GeocodingUnavailable { location_name, reason } => {
                write!(f, "geocoding unavailable for '{}': {}", location_name, reason)
            }
        }
    }
}

/// Both views as published by one recomputation
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// Incremented on every publication; zero before the first
    pub generation: u64,
    pub map: Arc<MapViewDataset>,
    pub chart: Arc<ChartViewDataset>,
    pub condition: Option<UpdateCondition>,
}

/// Read handle on the published views
#[derive(Clone)]
pub struct ViewReader {
    snapshot: Arc<RwLock<ViewSnapshot>>,
}

impl ViewReader {
    /// Get the current snapshot
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot.read().generation
    }

    pub fn map(&self) -> Arc<MapViewDataset> {
        self.snapshot.read().map.clone()
    }

    pub fn chart(&self) -> Arc<ChartViewDataset> {
        self.snapshot.read().chart.clone()
    }

    pub fn condition(&self) -> Option<UpdateCondition> {
        self.snapshot.read().condition.clone()
    }
}

/// The single writer of the published views.
///
/// Not `Clone`: whoever owns the publisher is the only component that
/// replaces the views.
pub struct ViewPublisher {
    snapshot: Arc<RwLock<ViewSnapshot>>,
    subscribers: RwLock<Vec<Weak<dyn ViewSubscriber>>>,
}

impl ViewPublisher {
    /// Create a publisher holding empty views at generation zero
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(ViewSnapshot::default())),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn reader(&self) -> ViewReader {
        ViewReader {
            snapshot: self.snapshot.clone(),
        }
    }

    /// Replace both views in one step and notify subscribers.
    ///
    /// Returns the new generation.
    pub fn publish(
        &self,
        map: MapViewDataset,
        chart: ChartViewDataset,
        condition: Option<UpdateCondition>,
    ) -> u64 {
        let published = {
            let mut snapshot = self.snapshot.write();
            let generation = snapshot.generation + 1;
            *snapshot = ViewSnapshot {
                generation,
                map: Arc::new(map),
                chart: Arc::new(chart),
                condition,
            };
            snapshot.clone()
        };

        tracing::debug!(
            "Published views generation {} ({} map rows, {} chart rows)",
            published.generation,
            published.map.len(),
            published.chart.len()
        );
        self.notify_subscribers(&published);
        published.generation
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn ViewSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self, snapshot: &ViewSnapshot) {
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_views_published(snapshot);
            }
        }
    }
}

impl Default for ViewPublisher {
    fn default() -> Self {
        Self::new()
    }
}
