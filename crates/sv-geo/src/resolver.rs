//! Place name resolution through an external geocoding service

use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use serde::{Serialize, Deserialize};
use sv_core::{ResolvedOrigin, UpdateCondition};
use thiserror::Error;

/// Errors surfaced by a location lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("location '{0}' not found")]
    LocationNotFound(String),

    #[error("geocoding service unavailable for '{name}': {reason}")]
    Unavailable { name: String, reason: String },
}

impl From<ResolveError> for UpdateCondition {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::LocationNotFound(location_name) => {
                UpdateCondition::LocationNotFound { location_name }
            }
            ResolveError::Unavailable { name, reason } => {
                UpdateCondition::GeocodingUnavailable { location_name: name, reason }
            }
        }
    }
}

/// Turns a free-text place name into a coordinate.
///
/// Implementations perform at most one lookup per call; there is no retry.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<ResolvedOrigin, ResolveError>;
}

impl<R: LocationResolver + ?Sized> LocationResolver for Box<R> {
    fn resolve(&self, name: &str) -> Result<ResolvedOrigin, ResolveError> {
        (**self).resolve(name)
    }
}

impl<R: LocationResolver + ?Sized> LocationResolver for Arc<R> {
    fn resolve(&self, name: &str) -> Result<ResolvedOrigin, ResolveError> {
        (**self).resolve(name)
    }
}

/// Geocoding service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim-compatible search endpoint
    pub endpoint: String,

    /// Appended to every query to disambiguate same-named places
    pub country_qualifier: String,

    pub user_agent: String,

    /// Upper bound on one lookup, connection included
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            country_qualifier: "Australia".to_string(),
            user_agent: concat!("sightings-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl GeocoderConfig {
    /// Free-text query sent for a place name
    pub fn query_for(&self, name: &str) -> String {
        let name = name.trim();
        if self.country_qualifier.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, self.country_qualifier)
        }
    }
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Parse a Nominatim `format=json` search body into `(longitude, latitude)`.
///
/// An empty result array is `Ok(None)`.
pub fn parse_search_response(body: &str) -> Result<Option<(f64, f64)>, String> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|e| format!("invalid search response: {}", e))?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let longitude = hit.lon.parse::<f64>().map_err(|e| format!("invalid longitude '{}': {}", hit.lon, e))?;
    let latitude = hit.lat.parse::<f64>().map_err(|e| format!("invalid latitude '{}': {}", hit.lat, e))?;
    Ok(Some((longitude, latitude)))
}

/// Resolver backed by a Nominatim search endpoint
pub struct NominatimResolver {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimResolver {
    pub fn from_config(config: GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }
}

impl LocationResolver for NominatimResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedOrigin, ResolveError> {
        if name.trim().is_empty() {
            return Err(ResolveError::LocationNotFound(name.to_string()));
        }

        let unavailable = |reason: String| ResolveError::Unavailable {
            name: name.to_string(),
            reason,
        };

        let query = self.config.query_for(name);
        tracing::debug!("Geocoding '{}' via {}", query, self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().map_err(|e| unavailable(e.to_string()))?;
        match parse_search_response(&body).map_err(unavailable)? {
            Some((longitude, latitude)) => Ok(ResolvedOrigin::new(name, longitude, latitude)),
            None => Err(ResolveError::LocationNotFound(name.to_string())),
        }
    }
}

/// Cache-of-one in front of another resolver, keyed by location name.
///
/// Hits and misses are remembered; `Unavailable` is transient and is retried
/// on the next call.
pub struct CachedResolver<R> {
    inner: R,
    last: Mutex<Option<(String, Result<ResolvedOrigin, ResolveError>)>>,
}

impl<R: LocationResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }

    /// Forget the remembered outcome
    pub fn invalidate(&self) {
        *self.last.lock() = None;
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: LocationResolver> LocationResolver for CachedResolver<R> {
    fn resolve(&self, name: &str) -> Result<ResolvedOrigin, ResolveError> {
        let mut last = self.last.lock();
        if let Some((cached_name, outcome)) = last.as_ref() {
            if cached_name == name {
                tracing::debug!("Geocode cache hit for '{}'", name);
                return outcome.clone();
            }
        }

        let outcome = self.inner.resolve(name);
        *last = match &outcome {
            Err(ResolveError::Unavailable { .. }) => None,
            _ => Some((name.to_string(), outcome.clone())),
        };
        outcome
    }
}
