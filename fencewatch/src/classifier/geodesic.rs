//! Great-circle distance primitives.
//!
//! Fixes and fence boundaries are geographic coordinates, so all distances
//! here are geodesic (spherical great-circle), never planar Euclidean.
//! Boundary segments are short compared to the earth radius (densification
//! guarantees that for reprojected fences), which keeps the cross-track
//! formulation well conditioned.

use crate::geometry::LatLon;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Distances below this are treated as coincident points, meters.
const COINCIDENT_M: f64 = 1e-6;

/// Haversine great-circle distance between two points, meters.
pub fn haversine_distance_m(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().clamp(-1.0, 1.0).asin() * EARTH_RADIUS_M
}

/// Initial bearing from `a` to `b`, radians from north.
fn initial_bearing_rad(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x)
}

/// Great-circle distance from `p` to the segment `a → b`, meters.
///
/// Uses the cross-track distance where the perpendicular foot falls within
/// the segment, and the nearer endpoint distance otherwise.
pub fn point_to_segment_distance_m(p: LatLon, a: LatLon, b: LatLon) -> f64 {
    let d_ab = haversine_distance_m(a, b);
    let d_ap = haversine_distance_m(a, p);

    if d_ab < COINCIDENT_M || d_ap < COINCIDENT_M {
        return d_ap;
    }

    let delta = initial_bearing_rad(a, p) - initial_bearing_rad(a, b);
    if delta.cos() < 0.0 {
        // Foot of the perpendicular falls behind `a`.
        return d_ap;
    }

    let angular_ap = d_ap / EARTH_RADIUS_M;
    let cross = (angular_ap.sin() * delta.sin()).clamp(-1.0, 1.0).asin();
    let along = (angular_ap.cos() / cross.cos()).clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M;

    if along > d_ab {
        // Foot falls beyond `b`.
        return haversine_distance_m(b, p);
    }

    (cross * EARTH_RADIUS_M).abs()
}

/// Distance from `p` to the nearest point on the boundary ring, meters.
pub fn distance_to_ring_m(p: LatLon, ring: &[LatLon]) -> f64 {
    let mut nearest = f64::INFINITY;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        nearest = nearest.min(point_to_segment_distance_m(p, a, b));
    }
    nearest
}
