//! Great-circle distances on unprojected coordinates

use sv_core::{ResolvedOrigin, SightingRecord};

/// Mean earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.009;

pub const KM_PER_MILE: f64 = 1.609344;

/// Great-circle distance in miles between two `(latitude, longitude)` pairs in degrees
pub fn great_circle_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let delta_lon = lon2 - lon1;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_lat2, cos_lat2) = lat2.sin_cos();
    let (sin_delta, cos_delta) = delta_lon.sin_cos();

    // atan2 form stays accurate for both tiny and antipodal separations
    let y = ((cos_lat2 * sin_delta).powi(2)
        + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta).powi(2))
    .sqrt();
    let x = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta;

    EARTH_RADIUS_KM * y.atan2(x) / KM_PER_MILE
}

/// Distance from `origin` to a record's source coordinates
pub fn distance_to(origin: &ResolvedOrigin, record: &SightingRecord) -> f64 {
    great_circle_miles(
        (origin.latitude, origin.longitude),
        (record.latitude, record.longitude),
    )
}

/// Keep the records no farther than `radius_miles` from `origin`
pub fn within_radius<'a, I>(records: I, origin: &ResolvedOrigin, radius_miles: f64) -> Vec<&'a SightingRecord>
where
    I: IntoIterator<Item = &'a SightingRecord>,
{
    records
        .into_iter()
        .filter(|record| distance_to(origin, record) <= radius_miles)
        .collect()
}
