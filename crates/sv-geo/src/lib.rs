//! Geographic primitives for the sightings pipeline
//!
//! - [`projection`]: geographic to Web Mercator transform and its inverse
//! - [`distance`]: great-circle distances and radius filtering
//! - [`resolver`]: place name geocoding behind the [`LocationResolver`] trait

pub mod distance;
pub mod projection;
pub mod resolver;

pub use distance::{distance_to, great_circle_miles, within_radius, EARTH_RADIUS_KM, KM_PER_MILE};
pub use projection::{project, project_all, unproject, Crs, MapExtent, ProjectionError};
pub use resolver::{
    CachedResolver, GeocoderConfig, LocationResolver, NominatimResolver, ResolveError,
};
