//! Common types and utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use fencewatch::{FenceGeometry, GeometryConfig, SpatialReference, Status};

use crate::error::CliError;

/// Spatial reference selection in fence files.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FenceReference {
    /// Geographic degrees, `[lon, lat]` vertex order.
    #[default]
    Wgs84,
    /// Web Mercator meters.
    WebMercator,
}

impl From<FenceReference> for SpatialReference {
    fn from(reference: FenceReference) -> Self {
        match reference {
            FenceReference::Wgs84 => SpatialReference::Wgs84,
            FenceReference::WebMercator => SpatialReference::WebMercator,
        }
    }
}

/// On-disk fence description.
///
/// ```json
/// {
///   "name": "Campus",
///   "reference": "wgs84",
///   "ring": [[10.0, 53.5], [10.01, 53.5], [10.01, 53.51], [10.0, 53.51]]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct FenceFile {
    /// Human-readable fence name.
    pub name: Option<String>,
    /// Reference the ring is authored in; defaults to WGS84.
    #[serde(default)]
    pub reference: FenceReference,
    /// Boundary ring, `[x, y]` vertex pairs.
    pub ring: Vec<[f64; 2]>,
}

/// Load and prepare a fence from a JSON description file.
pub fn load_fence(path: &Path, config: &GeometryConfig) -> Result<FenceGeometry, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: FenceFile = serde_json::from_str(&text)?;

    let ring: Vec<(f64, f64)> = file.ring.iter().map(|&[x, y]| (x, y)).collect();
    let fence = FenceGeometry::prepare(&ring, file.reference.into(), config)?;

    Ok(match file.name {
        Some(name) => fence.with_name(name),
        None => fence,
    })
}

/// Tracker baseline selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum BaselineStatus {
    /// Previously outside the fence.
    Outside,
    /// Previously in the close band.
    Close,
    /// Previously inside the fence.
    Inside,
}

impl From<BaselineStatus> for Status {
    fn from(baseline: BaselineStatus) -> Self {
        match baseline {
            BaselineStatus::Outside => Status::Outside,
            BaselineStatus::Close => Status::Close,
            BaselineStatus::Inside => Status::Inside,
        }
    }
}

/// Build a geometry config from the shared CLI overrides.
pub fn geometry_config(
    close_distance_m: Option<f64>,
    densify_tolerance_m: Option<f64>,
) -> GeometryConfig {
    let mut config = GeometryConfig::default();
    if let Some(close) = close_distance_m {
        config.close_distance_m = close;
    }
    if let Some(tolerance) = densify_tolerance_m {
        config.densify_tolerance_m = tolerance;
    }
    config
}
