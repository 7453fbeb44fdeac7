//! Fence boundary preparation.
//!
//! A [`FenceGeometry`] is the immutable, pre-processed representation of the
//! monitored region. It is built once when a fence is selected and replaced
//! wholesale when the selection changes; nothing in the steady-state pipeline
//! mutates it.
//!
//! # Preparation
//!
//! ```text
//! authored ring ──► validate ──► densify (if projected) ──► reproject ──► WGS84 boundary
//! ```
//!
//! Location fixes arrive in geographic WGS84, so the boundary is normalized
//! to WGS84 up front. Reprojecting a sparse polygon directly would let the
//! straight projected edges drift away from the geodesic edges they stand
//! for; densifying first bounds that drift to the configured tolerance.

mod project;
mod types;

pub use project::{MAX_LAT, MERCATOR_MAX_M, MERCATOR_RADIUS_M};
pub use types::{GeometryError, LatLon, SpatialReference};

use project::web_mercator_to_wgs84;

/// Default maximum projected segment length before reprojection, meters.
pub const DEFAULT_DENSIFY_TOLERANCE_M: f64 = 20.0;

/// Default close-band width outside the fence boundary, meters.
pub const DEFAULT_CLOSE_DISTANCE_M: f64 = 400.0;

/// Tuning knobs for fence preparation and classification.
#[derive(Debug, Clone)]
pub struct GeometryConfig {
    /// Maximum segment length to allow before reprojection, meters.
    pub densify_tolerance_m: f64,
    /// Distance from the boundary considered "close", meters.
    pub close_distance_m: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            densify_tolerance_m: DEFAULT_DENSIFY_TOLERANCE_M,
            close_distance_m: DEFAULT_CLOSE_DISTANCE_M,
        }
    }
}

/// An immutable fence boundary in canonical WGS84.
#[derive(Debug, Clone)]
pub struct FenceGeometry {
    /// Human-readable fence name, used in notifications and logs.
    name: String,
    /// Boundary ring in WGS84, open (no closing duplicate vertex).
    boundary: Vec<LatLon>,
    /// Reference the ring was originally authored in.
    source_reference: SpatialReference,
    /// Close-band width, meters.
    close_distance_m: f64,
}

impl FenceGeometry {
    /// Prepare a fence boundary from an authored ring.
    ///
    /// `ring` vertices are `(x, y)` pairs in `source_reference` coordinates:
    /// `(longitude, latitude)` degrees for WGS84, meters for Web Mercator.
    /// A closing duplicate of the first vertex is tolerated and dropped.
    ///
    /// Rings already authored in WGS84 are used unchanged; projected rings
    /// are densified so no segment exceeds the configured tolerance, then
    /// reprojected vertex by vertex.
    pub fn prepare(
        ring: &[(f64, f64)],
        source_reference: SpatialReference,
        config: &GeometryConfig,
    ) -> Result<Self, GeometryError> {
        // A zero or negative tolerance would make densification unbounded.
        if !config.densify_tolerance_m.is_finite() || config.densify_tolerance_m <= 0.0 {
            return Err(GeometryError::InvalidTolerance(config.densify_tolerance_m));
        }

        for &(x, y) in ring {
            if !x.is_finite() || !y.is_finite() {
                return Err(GeometryError::NonFiniteVertex { x, y });
            }
        }

        let distinct = drop_duplicate_vertices(ring);
        if distinct.len() < 3 {
            return Err(GeometryError::TooFewVertices(distinct.len()));
        }
        if shoelace_area(&distinct).abs() <= f64::EPSILON {
            return Err(GeometryError::ZeroArea);
        }
        if ring_self_intersects(&distinct) {
            return Err(GeometryError::SelfIntersecting);
        }

        let boundary = match source_reference {
            SpatialReference::Wgs84 => distinct
                .iter()
                .map(|&(lon, lat)| LatLon::new(lat, lon))
                .collect(),
            SpatialReference::WebMercator => {
                let densified = densify(&distinct, config.densify_tolerance_m);
                densified
                    .iter()
                    .map(|&(x, y)| web_mercator_to_wgs84(x, y))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        tracing::debug!(
            authored_vertices = distinct.len(),
            boundary_vertices = boundary.len(),
            reference = %source_reference,
            "prepared fence boundary"
        );

        Ok(Self {
            name: String::from("fence"),
            boundary,
            source_reference,
            close_distance_m: config.close_distance_m,
        })
    }

    /// Attach a human-readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The fence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical WGS84 boundary ring (open, no closing duplicate).
    pub fn boundary(&self) -> &[LatLon] {
        &self.boundary
    }

    /// The reference the boundary was authored in.
    pub fn source_reference(&self) -> SpatialReference {
        self.source_reference
    }

    /// The close-band width in meters.
    pub fn close_distance_m(&self) -> f64 {
        self.close_distance_m
    }
}

/// Drop the closing duplicate and any consecutive duplicate vertices.
fn drop_duplicate_vertices(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    for &v in ring {
        if distinct.last() != Some(&v) {
            distinct.push(v);
        }
    }
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    distinct
}

/// Signed shoelace area of an open ring, in source units squared.
fn shoelace_area(ring: &[(f64, f64)]) -> f64 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

/// Whether any two non-adjacent edges of the ring properly cross.
///
/// Proper crossings only: rings that touch at a shared non-adjacent
/// vertex or overlap collinearly are not flagged. Such rings still
/// enclose an area and classify consistently, so rejecting them is not
/// worth an exact-arithmetic predicate here.
fn ring_self_intersects(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Adjacent edges share a vertex and cannot properly cross.
            if (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            if segments_properly_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Strict segment crossing test (shared endpoints do not count).
fn segments_properly_cross(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}

/// Cross product orientation of point `c` relative to segment `a → b`.
fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Insert vertices along each edge so no segment exceeds `tolerance_m`.
///
/// `tolerance_m` must be positive and finite; `prepare` rejects anything
/// else before calling this. Operates in projected meters. Mercator meters
/// shrink on the ground away from the equator, so splitting by plane
/// length can only over-densify, never under-densify.
fn densify(ring: &[(f64, f64)], tolerance_m: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(ring.len());
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        let pieces = (length / tolerance_m).ceil().max(1.0) as usize;

        out.push((x1, y1));
        for k in 1..pieces {
            let t = k as f64 / pieces as f64;
            out.push((x1 + t * (x2 - x1), y1 + t * (y2 - y1)));
        }
        // The end vertex opens the next edge.
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square ring in WGS84 degrees, closed.
    fn unit_square_deg() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]
    }

    #[test]
    fn test_wgs84_ring_used_unchanged() {
        let fence = FenceGeometry::prepare(
            &unit_square_deg(),
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        )
        .unwrap();

        // Closing duplicate dropped, no densification.
        assert_eq!(fence.boundary().len(), 4);
        assert_eq!(fence.boundary()[0], LatLon::new(0.0, 0.0));
        assert_eq!(fence.boundary()[2], LatLon::new(1.0, 1.0));
        assert_eq!(fence.source_reference(), SpatialReference::Wgs84);
    }

    #[test]
    fn test_defaults_carried_onto_fence() {
        let fence = FenceGeometry::prepare(
            &unit_square_deg(),
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        )
        .unwrap();
        assert_eq!(fence.close_distance_m(), 400.0);
        assert_eq!(fence.name(), "fence");

        let fence = fence.with_name("Campus");
        assert_eq!(fence.name(), "Campus");
    }

    #[test]
    fn test_mercator_ring_densified_and_reprojected() {
        // 1km square at the equator, Web Mercator meters.
        let ring = vec![
            (0.0, 0.0),
            (1000.0, 0.0),
            (1000.0, 1000.0),
            (0.0, 1000.0),
        ];
        let fence = FenceGeometry::prepare(
            &ring,
            SpatialReference::WebMercator,
            &GeometryConfig::default(),
        )
        .unwrap();

        // 1000m edges at 20m tolerance: 50 pieces per edge, 200 vertices.
        assert_eq!(fence.boundary().len(), 200);

        // All vertices land inside the expected geographic bbox.
        for v in fence.boundary() {
            assert!(v.lat >= -1e-9 && v.lat <= 0.01, "lat {}", v.lat);
            assert!(v.lon >= -1e-9 && v.lon <= 0.01, "lon {}", v.lon);
        }
    }

    #[test]
    fn test_densify_respects_tolerance() {
        let ring = vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
        let densified = densify(&ring, 30.0);

        for i in 0..densified.len() {
            let (x1, y1) = densified[i];
            let (x2, y2) = densified[(i + 1) % densified.len()];
            let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            assert!(length <= 30.0 + 1e-9, "segment length {}", length);
        }
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        let result = FenceGeometry::prepare(
            &[(0.0, 0.0), (1.0, 1.0)],
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::TooFewVertices(2))));
    }

    #[test]
    fn test_closing_duplicate_does_not_count_as_vertex() {
        // Two distinct vertices plus the closing duplicate.
        let result = FenceGeometry::prepare(
            &[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::TooFewVertices(2))));
    }

    #[test]
    fn test_rejects_zero_area_ring() {
        // Collinear vertices.
        let result = FenceGeometry::prepare(
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::ZeroArea)));
    }

    #[test]
    fn test_rejects_self_intersecting_ring() {
        // Bowtie: edges (0,0)-(1,1) and (1,0)-(0,1) cross.
        let result = FenceGeometry::prepare(
            &[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)],
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::SelfIntersecting)));
    }

    #[test]
    fn test_rejects_non_positive_densify_tolerance() {
        // A 1km Web Mercator square with tolerance 0 would otherwise try
        // to densify every edge into usize::MAX pieces.
        let ring = vec![
            (0.0, 0.0),
            (1000.0, 0.0),
            (1000.0, 1000.0),
            (0.0, 1000.0),
        ];
        for tolerance in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = GeometryConfig {
                densify_tolerance_m: tolerance,
                ..GeometryConfig::default()
            };
            let result =
                FenceGeometry::prepare(&ring, SpatialReference::WebMercator, &config);
            assert!(
                matches!(result, Err(GeometryError::InvalidTolerance(_))),
                "tolerance {} was accepted",
                tolerance
            );
        }
    }

    #[test]
    fn test_tolerance_rejected_for_wgs84_rings_too() {
        // WGS84 rings skip densification, but the config is still invalid.
        let config = GeometryConfig {
            densify_tolerance_m: 0.0,
            ..GeometryConfig::default()
        };
        let result =
            FenceGeometry::prepare(&unit_square_deg(), SpatialReference::Wgs84, &config);
        assert!(matches!(result, Err(GeometryError::InvalidTolerance(_))));
    }

    #[test]
    fn test_pinched_ring_passes_crossing_check() {
        // Two triangular lobes touching at (1, 1): non-adjacent edges share
        // a vertex without properly crossing, which the validation accepts.
        let ring = vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (1.0, 1.0),
        ];
        let fence = FenceGeometry::prepare(
            &ring,
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        )
        .unwrap();
        assert_eq!(fence.boundary().len(), 6);
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let result = FenceGeometry::prepare(
            &[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)],
            SpatialReference::Wgs84,
            &GeometryConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::NonFiniteVertex { .. })));
    }

    #[test]
    fn test_rejects_unprojectable_mercator_vertex() {
        let ring = vec![
            (0.0, 0.0),
            (1.0e9, 0.0),
            (1.0e9, 1.0e9),
            (0.0, 1.0e9),
        ];
        // Coarse tolerance keeps densification cheap; the projection still
        // rejects the out-of-range vertices.
        let config = GeometryConfig {
            densify_tolerance_m: 1.0e9,
            ..GeometryConfig::default()
        };
        let result = FenceGeometry::prepare(&ring, SpatialReference::WebMercator, &config);
        assert!(matches!(
            result,
            Err(GeometryError::ProjectionFailure { .. })
        ));
    }

    #[test]
    fn test_shoelace_area_square() {
        let ring = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        assert!((shoelace_area(&ring).abs() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_consecutive_duplicates_dropped() {
        let ring = vec![
            (0.0, 0.0),
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (1.0, 1.0),
            (0.0, 1.0),
        ];
        assert_eq!(drop_duplicate_vertices(&ring).len(), 4);
    }
}
