//! Spherical Web Mercator to WGS84 reprojection.
//!
//! Fence boundaries authored against tiled basemaps arrive in Web Mercator
//! meters. The inverse projection here converts densified boundary vertices
//! to the geographic degrees the classifier works in.

use super::types::{GeometryError, LatLon, SpatialReference};

/// Spherical Web Mercator earth radius in meters (EPSG:3857).
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Half the extent of the Web Mercator plane in meters (π × radius).
pub const MERCATOR_MAX_M: f64 = std::f64::consts::PI * MERCATOR_RADIUS_M;

/// Latitude bound of the Web Mercator projection, degrees.
pub const MAX_LAT: f64 = 85.051_128_78;

/// Tolerance for vertices sitting exactly on the projection edge, meters.
const EDGE_TOLERANCE_M: f64 = 1.0;

/// Convert a Web Mercator vertex (meters) to geographic WGS84 degrees.
///
/// Vertices outside the projectable plane fail with
/// [`GeometryError::ProjectionFailure`]; a boundary containing such a
/// vertex was not authored in Web Mercator to begin with.
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> Result<LatLon, GeometryError> {
    if x.abs() > MERCATOR_MAX_M + EDGE_TOLERANCE_M || y.abs() > MERCATOR_MAX_M + EDGE_TOLERANCE_M {
        return Err(GeometryError::ProjectionFailure {
            x,
            y,
            reference: SpatialReference::WebMercator,
        });
    }

    let lon = (x / MERCATOR_RADIUS_M).to_degrees();
    let lat = (y / MERCATOR_RADIUS_M).sinh().atan().to_degrees();

    Ok(LatLon::new(lat, lon))
}
