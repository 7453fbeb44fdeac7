//! Fencewatch - fence proximity monitoring with adaptive location sampling.
//!
//! This library classifies a stream of geographic location fixes against a
//! single monitored fence region, detects meaningful transitions (entering,
//! exiting, close approach), and drives an adaptive sampling-rate controller
//! that trades fix frequency against power cost.
//!
//! # Pipeline
//!
//! ```text
//! LocationSource ──► FenceGeometry + fix ──► classify ──► TransitionTracker
//!       ▲                                                        │
//!       └──── StartFast / StartNormal ◄── SamplingController ◄───┘
//!                                                                │
//!                                 NotificationSink ◄── Entered / Exited
//! ```
//!
//! The engine fetches nothing and renders nothing: it consumes fixes and a
//! prepared fence, and produces classifications, transitions and sampling
//! commands. Requesting OS location updates, persisting fences and
//! delivering user notifications belong to the caller, behind the
//! [`sampling::LocationSource`] and [`monitor::NotificationSink`] traits.
//!
//! # Example
//!
//! ```ignore
//! use fencewatch::{FenceGeometry, FenceMonitor, GeometryConfig, SpatialReference};
//!
//! let fence = FenceGeometry::prepare(&ring, SpatialReference::Wgs84, &GeometryConfig::default())?
//!     .with_name("Campus");
//! let mut monitor = FenceMonitor::new(fence);
//!
//! for fix in fixes {
//!     let observation = monitor.process_fix(&fix, &mut source, &mut sink);
//!     println!("{:?}", observation.transition);
//! }
//! ```
//!
//! All operations are synchronous and bounded; the monitor expects a single
//! logical writer feeding fixes in arrival order.

pub mod classifier;
pub mod fix;
pub mod geometry;
pub mod monitor;
pub mod sampling;
pub mod tracker;

pub use classifier::{classify, Status};
pub use fix::LocationFix;
pub use geometry::{FenceGeometry, GeometryConfig, GeometryError, SpatialReference};
pub use monitor::{FenceEvent, FenceEventKind, FenceMonitor, FenceObservation, NotificationSink};
pub use sampling::{
    LocationSource, RateProfile, SamplingCommand, SamplingController, SamplingMode,
    SamplingProfile,
};
pub use tracker::{Observation, SamplingDirective, Transition, TransitionTracker};
