//! Location fix types.
//!
//! A [`LocationFix`] is a single geographic position sample as delivered by
//! an external location source. Fixes are consumed one at a time, in arrival
//! order, by the classifier; the engine trusts their coordinates by contract
//! and does not re-validate them. Sources that cannot guarantee finite
//! coordinates should gate samples through [`LocationFix::has_finite_coordinates`]
//! before handing them to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single geographic location sample (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// When the fix was measured.
    pub timestamp: DateTime<Utc>,
    /// Estimated horizontal accuracy in meters, if the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_accuracy_m: Option<f64>,
}

impl LocationFix {
    /// Create a fix measured now.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Utc::now(),
            horizontal_accuracy_m: None,
        }
    }

    /// Create a fix with an explicit timestamp.
    pub fn at(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            horizontal_accuracy_m: None,
        }
    }

    /// Attach a reported horizontal accuracy.
    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.horizontal_accuracy_m = Some(accuracy_m);
        self
    }

    /// Whether both coordinates are finite numbers.
    ///
    /// This is the check a location source should apply at its boundary;
    /// the engine itself assumes it holds.
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for LocationFix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
