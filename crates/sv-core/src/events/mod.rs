//! Pipeline events and the bus that delivers them

use std::any::{Any, TypeId};
use parking_lot::Mutex;
use ahash::AHashMap;

use crate::sync::UpdateCondition;

/// Marker for values that can travel on the [`EventBus`]
pub trait Event: Any + Send + Sync {}

type ErasedHandler = Box<dyn FnMut(&dyn Any) + Send>;

/// Dashboard-wide event bus, keyed by event type
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<AHashMap<TypeId, Vec<ErasedHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every published event of type `E`
    pub fn subscribe<E, F>(&self, mut handler: F)
    where
        E: Event,
        F: FnMut(&E) + Send + 'static,
    {
        let erased: ErasedHandler = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.handlers.lock().entry(TypeId::of::<E>()).or_default().push(erased);
    }

    /// Publish an event.
    ///
    /// Handlers run while the bus is locked and must not publish themselves.
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();
        if let Some(handlers) = handlers.get_mut(&TypeId::of::<E>()) {
            for handler in handlers.iter_mut() {
                handler(&event);
            }
        }
    }

    /// Number of handlers listening for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers.lock().get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }
}

/// Record store loaded
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsLoaded {
    pub source_name: String,
    pub record_count: usize,
    pub dropped_rows: usize,
}

/// A recomputation replaced both views
#[derive(Debug, Clone, PartialEq)]
pub struct ViewsPublished {
    pub generation: u64,
    pub map_rows: usize,
    pub chart_rows: usize,
}

/// The location control could not be turned into an origin
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUnresolved {
    pub generation: u64,
    pub condition: UpdateCondition,
}

impl Event for RecordsLoaded {}
impl Event for ViewsPublished {}
impl Event for LocationUnresolved {}
