//! Spatial reference and geometry error types.

use thiserror::Error;

/// Spatial references the engine understands.
///
/// Location fixes always arrive in geographic WGS84, so WGS84 is the
/// canonical reference every fence boundary is normalized to. Fences
/// authored in Web Mercator (the reference most tiled basemaps and
/// feature services use) are densified and reprojected at preparation
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialReference {
    /// Geographic coordinates, degrees (EPSG:4326).
    #[default]
    Wgs84,
    /// Spherical Web Mercator, meters (EPSG:3857).
    WebMercator,
}

impl SpatialReference {
    /// Whether coordinates in this reference are geographic degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(self, SpatialReference::Wgs84)
    }
}

impl std::fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpatialReference::Wgs84 => write!(f, "WGS84"),
            SpatialReference::WebMercator => write!(f, "Web Mercator"),
        }
    }
}

/// A vertex in geographic WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    /// Create a new geographic vertex.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Errors raised while preparing a fence boundary.
///
/// All of these are fatal to the fence selection that produced them;
/// the steady-state pipeline cannot fail once a boundary is prepared.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Ring has too few distinct vertices to enclose an area.
    #[error("fence ring has {0} distinct vertices, need at least 3")]
    TooFewVertices(usize),

    /// Ring encloses no area (collinear or repeated vertices).
    #[error("fence ring encloses zero area")]
    ZeroArea,

    /// Ring edges properly cross each other.
    ///
    /// Only transversal crossings are detected; rings that merely touch
    /// at a shared non-adjacent vertex or overlap collinearly pass
    /// validation.
    #[error("fence ring is self-intersecting")]
    SelfIntersecting,

    /// The densification tolerance is not a positive finite number.
    #[error("densify tolerance {0} must be positive and finite")]
    InvalidTolerance(f64),

    /// A vertex coordinate is NaN or infinite.
    #[error("fence ring vertex ({x}, {y}) is not finite")]
    NonFiniteVertex { x: f64, y: f64 },

    /// A vertex could not be reprojected to WGS84.
    #[error("cannot reproject ({x}, {y}) from {reference} to WGS84")]
    ProjectionFailure {
        x: f64,
        y: f64,
        reference: SpatialReference,
    },
}
