//! Map scatter selection: year, family and radius filters

use sv_core::{FilterState, MapViewDataset, MapViewRow, ResolvedOrigin, SightingRecord};
use sv_geo::{project, within_radius, Crs, LocationResolver, ResolveError};

/// Records passing every map filter, plus the origin used for the radius
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub records: Vec<&'a SightingRecord>,
    /// `None` when no record survived the year and family filters, in which
    /// case the resolver was never consulted
    pub origin: Option<ResolvedOrigin>,
}

/// Apply `year >= since_year`, `family in families` and the radius filter.
///
/// The resolver is only called when at least one record survives the first
/// two predicates. A failed resolution is returned as-is; nothing is filtered
/// against a missing origin.
pub fn select_records<'a>(
    records: &'a [SightingRecord],
    state: &FilterState,
    resolver: &dyn LocationResolver,
) -> Result<Selection<'a>, ResolveError> {
    let candidates: Vec<&SightingRecord> = records
        .iter()
        .filter(|r| r.year >= state.since_year && state.families.contains(&r.family))
        .collect();

    if candidates.is_empty() {
        return Ok(Selection { records: Vec::new(), origin: None });
    }

    let origin = resolver.resolve(&state.location_name)?;
    let selected = within_radius(candidates, &origin, state.radius_miles);

    tracing::debug!(
        "{} of {} sightings within {} miles of {}",
        selected.len(),
        records.len(),
        state.radius_miles,
        origin.location_name
    );

    Ok(Selection { records: selected, origin: Some(origin) })
}

/// Build the published map dataset for the current controls
pub fn select(
    records: &[SightingRecord],
    state: &FilterState,
    resolver: &dyn LocationResolver,
) -> Result<MapViewDataset, ResolveError> {
    let selection = select_records(records, state, resolver)?;

    let center = selection.origin.as_ref().and_then(|origin| {
        project(origin.longitude, origin.latitude, Crs::Wgs84)
            .map_err(|e| tracing::warn!("Cannot center map on {}: {}", origin.location_name, e))
            .ok()
    });

    Ok(MapViewDataset {
        rows: selection.records.into_iter().map(MapViewRow::from).collect(),
        center,
    })
}
