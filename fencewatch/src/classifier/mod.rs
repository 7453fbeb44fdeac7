//! Proximity classification.
//!
//! Maps a single location fix to a three-band [`Status`] relative to a
//! prepared fence:
//!
//! ```text
//! containment test ──► Inside
//!        │ (not contained)
//!        ▼
//! geodesic distance to boundary < close distance ──► Close
//!        │ (otherwise)
//!        ▼
//!     Outside
//! ```
//!
//! Classification is a pure function of the fence and the fix; it holds no
//! state and cannot fail.

mod geodesic;

pub use geodesic::EARTH_RADIUS_M;

use crate::fix::LocationFix;
use crate::geometry::{FenceGeometry, LatLon};

use geodesic::distance_to_ring_m;

/// Collinearity tolerance for the boundary test, degrees².
const ON_BOUNDARY_EPS: f64 = 1e-12;

/// A fix's relationship to the monitored fence.
///
/// Alert-worthiness grows Outside → Close → Inside, but nothing in the
/// engine compares statuses by order; transitions are derived from explicit
/// (previous, new) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// More than the close distance away from the fence boundary.
    Outside,
    /// Outside the fence but within the close distance of its boundary.
    Close,
    /// Within the fence, boundary included.
    Inside,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Outside => write!(f, "outside"),
            Status::Close => write!(f, "close"),
            Status::Inside => write!(f, "inside"),
        }
    }
}

/// Classify a fix against a prepared fence.
///
/// Containment takes precedence: a fix inside or exactly on the boundary is
/// `Inside` without any distance computation. Otherwise the great-circle
/// distance to the nearest boundary point decides `Close` (strictly less
/// than the fence's close distance) versus `Outside`.
pub fn classify(fence: &FenceGeometry, fix: &LocationFix) -> Status {
    let p = LatLon::new(fix.latitude, fix.longitude);

    if point_in_ring(p, fence.boundary()) {
        return Status::Inside;
    }

    let distance_m = distance_to_ring_m(p, fence.boundary());
    tracing::debug!(distance_m, fence = fence.name(), "distance to fence boundary");

    if distance_m < fence.close_distance_m() {
        Status::Close
    } else {
        Status::Outside
    }
}

/// Ray-casting containment test, boundary counted as inside.
fn point_in_ring(p: LatLon, ring: &[LatLon]) -> bool {
    let mut inside = false;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];

        if on_segment(p, a, b) {
            return true;
        }

        // Edge straddles the horizontal through p: does the eastward ray
        // cross it?
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let t = (p.lat - a.lat) / (b.lat - a.lat);
            let lon_cross = a.lon + t * (b.lon - a.lon);
            if lon_cross > p.lon {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether `p` lies on the segment `a → b` (within collinearity tolerance).
fn on_segment(p: LatLon, a: LatLon, b: LatLon) -> bool {
    let cross = (b.lon - a.lon) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lon - a.lon);
    if cross.abs() > ON_BOUNDARY_EPS {
        return false;
    }
    p.lon >= a.lon.min(b.lon) - ON_BOUNDARY_EPS
        && p.lon <= a.lon.max(b.lon) + ON_BOUNDARY_EPS
        && p.lat >= a.lat.min(b.lat) - ON_BOUNDARY_EPS
        && p.lat <= a.lat.max(b.lat) + ON_BOUNDARY_EPS
}
