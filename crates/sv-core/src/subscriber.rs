//! View subscriber trait

use crate::sync::ViewSnapshot;

/// Trait for components that redraw when new views are published
pub trait ViewSubscriber: Send + Sync {
    /// Called after a snapshot has replaced the previous one
    fn on_views_published(&self, snapshot: &ViewSnapshot);
}
