//! Map projection between the source CRS and the display CRS (EPSG:3857)

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use sv_core::ProjectedPoint;
use thiserror::Error;

/// Spherical radius used by Web Mercator, in meters
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Half the width of the Web Mercator plane, in meters
pub const WEB_MERCATOR_MAX: f64 = 20_037_508.342_789_244;

/// Coordinate reference systems accepted as projection input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// Geographic longitude/latitude in degrees (EPSG:4326)
    Wgs84,
    /// Spherical Web Mercator meters (EPSG:3857)
    WebMercator,
}

impl Crs {
    pub fn epsg_code(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epsg:{}", self.epsg_code())
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let code = lower.strip_prefix("epsg:").unwrap_or(&lower);
        match code {
            "4326" => Ok(Crs::Wgs84),
            "3857" | "900913" => Ok(Crs::WebMercator),
            _ => Err(ProjectionError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl TryFrom<String> for Crs {
    type Error = ProjectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

/// Errors that can occur while projecting coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("coordinate ({x}, {y}) is outside the domain of {crs}")]
    OutOfDomain { x: f64, y: f64, crs: Crs },

    #[error("unsupported coordinate reference system '{0}'")]
    UnsupportedCrs(String),
}

/// Project a single coordinate into the display CRS.
///
/// For [`Crs::Wgs84`] input `x` is longitude and `y` latitude in degrees.
pub fn project(x: f64, y: f64, source: Crs) -> Result<ProjectedPoint, ProjectionError> {
    let out_of_domain = || ProjectionError::OutOfDomain { x, y, crs: source };
    if !x.is_finite() || !y.is_finite() {
        return Err(out_of_domain());
    }

    match source {
        Crs::Wgs84 => {
            // Mercator northing diverges at the poles
            if x.abs() > 180.0 || y.abs() >= 90.0 {
                return Err(out_of_domain());
            }
            Ok(mercator(x, y))
        }
        Crs::WebMercator => {
            if x.abs() > WEB_MERCATOR_MAX || y.abs() > WEB_MERCATOR_MAX {
                return Err(out_of_domain());
            }
            Ok(ProjectedPoint::new(x, y))
        }
    }
}

fn mercator(longitude: f64, latitude: f64) -> ProjectedPoint {
    let easting = WEB_MERCATOR_RADIUS * longitude.to_radians();
    let northing = WEB_MERCATOR_RADIUS * (PI / 4.0 + latitude.to_radians() / 2.0).tan().ln();
    ProjectedPoint::new(easting, northing)
}

/// Project a sequence of `(x, y)` pairs, stopping at the first failure
pub fn project_all<I>(coords: I, source: Crs) -> Result<Vec<ProjectedPoint>, ProjectionError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    coords.into_iter().map(|(x, y)| project(x, y, source)).collect()
}

/// Inverse of [`project`] for geographic input: returns `(longitude, latitude)`
pub fn unproject(point: ProjectedPoint) -> Result<(f64, f64), ProjectionError> {
    if !point.x.is_finite()
        || !point.y.is_finite()
        || point.x.abs() > WEB_MERCATOR_MAX
    {
        return Err(ProjectionError::OutOfDomain { x: point.x, y: point.y, crs: Crs::WebMercator });
    }

    let longitude = (point.x / WEB_MERCATOR_RADIUS).to_degrees();
    let latitude = (2.0 * (point.y / WEB_MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Ok((longitude, latitude))
}

/// Rectangular map extent in the display CRS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub min: ProjectedPoint,
    pub max: ProjectedPoint,
}

impl MapExtent {
    /// Project a geographic bounding box
    pub fn from_bounds(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ProjectionError> {
        Ok(Self {
            min: project(west, south, Crs::Wgs84)?,
            max: project(east, north, Crs::Wgs84)?,
        })
    }

    /// Initial extent of the sightings map: Australian waters
    pub fn australia() -> Self {
        Self {
            min: mercator(75.0, -55.0),
            max: mercator(175.0, -5.0),
        }
    }

    pub fn contains(&self, point: ProjectedPoint) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_origin() {
        let point = project(0.0, 0.0, Crs::Wgs84).unwrap();
        assert!(point.x.abs() < 1e-9);
        assert!(point.y.abs() < 1e-9);
    }

    #[test]
    fn test_known_value_sydney() {
        // Sydney Opera House
        let point = project(151.2153, -33.8568, Crs::Wgs84).unwrap();
        assert!((point.x - 16_833_210.196).abs() < 0.01, "x = {}", point.x);
        assert!((point.y - -4_009_589.934).abs() < 0.01, "y = {}", point.y);
    }

    #[test]
    fn test_round_trip_recovers_coordinates() {
        let coords = [(151.2093, -33.8688), (-122.4194, 37.7749), (179.9, -84.0), (0.5, 60.0)];
        for (lon, lat) in coords {
            let point = project(lon, lat, Crs::Wgs84).unwrap();
            let (back_lon, back_lat) = unproject(point).unwrap();
            assert!((back_lon - lon).abs() < 1e-9, "{} vs {}", back_lon, lon);
            assert!((back_lat - lat).abs() < 1e-9, "{} vs {}", back_lat, lat);
        }
    }

    #[test]
    fn test_out_of_domain_is_an_error() {
        assert!(matches!(project(0.0, 90.0, Crs::Wgs84), Err(ProjectionError::OutOfDomain { .. })));
        assert!(project(0.0, -91.0, Crs::Wgs84).is_err());
        assert!(project(180.5, 0.0, Crs::Wgs84).is_err());
        assert!(project(f64::NAN, 0.0, Crs::Wgs84).is_err());
        assert!(project(WEB_MERCATOR_MAX * 2.0, 0.0, Crs::WebMercator).is_err());
    }

    #[test]
    fn test_bulk_and_single_projection_agree() {
        let coords = vec![(151.2093, -33.8688), (115.8605, -31.9505)];
        let bulk = project_all(coords.clone(), Crs::Wgs84).unwrap();
        for ((lon, lat), projected) in coords.into_iter().zip(bulk) {
            assert_eq!(project(lon, lat, Crs::Wgs84).unwrap(), projected);
        }
    }

    #[test]
    fn test_crs_parsing() {
        assert_eq!("epsg:4326".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert_eq!("EPSG:3857".parse::<Crs>().unwrap(), Crs::WebMercator);
        assert_eq!("4326".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert!(matches!("epsg:28356".parse::<Crs>(), Err(ProjectionError::UnsupportedCrs(_))));
        assert_eq!(Crs::Wgs84.to_string(), "epsg:4326");
    }

    #[test]
    fn test_crs_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Crs::WebMercator).unwrap(), "\"epsg:3857\"");
        let crs: Crs = serde_json::from_str("\"EPSG:4326\"").unwrap();
        assert_eq!(crs, Crs::Wgs84);
        assert!(serde_json::from_str::<Crs>("\"epsg:1\"").is_err());
    }

    #[test]
    fn test_australia_extent() {
        let extent = MapExtent::australia();
        assert!(extent.min.x < extent.max.x);
        assert!(extent.min.y < extent.max.y);
        assert!(extent.contains(project(151.2093, -33.8688, Crs::Wgs84).unwrap()));
        assert!(!extent.contains(project(-0.1276, 51.5072, Crs::Wgs84).unwrap()));
    }
}
