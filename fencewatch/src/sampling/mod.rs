//! Adaptive sampling-rate control.
//!
//! Translates [`SamplingDirective`] hints from the tracker into start
//! commands against an external [`LocationSource`]. The controller keeps a
//! single piece of state, the current [`SamplingMode`], and is idempotent:
//! a directive matching the current mode issues nothing, so the external
//! registration is never churned with an identical configuration.
//!
//! A single controller with a mode flag replaces the alternative of two
//! independent polling services that would each own their own registration.

use std::time::Duration;

use crate::tracker::SamplingDirective;

/// Sampling cadence presets.
///
/// The defaults are demo-friendly values; tune for production use.
#[derive(Debug, Clone, PartialEq)]
pub struct RateProfile {
    /// Preferred interval between fixes.
    pub interval: Duration,
    /// Fastest interval the consumer will accept.
    pub fastest_interval: Duration,
    /// Smallest displacement that should trigger a fix, meters.
    pub min_displacement_m: f64,
}

/// The pair of rate profiles the controller switches between.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingProfile {
    /// High-frequency, high-accuracy cadence while near or inside the fence.
    pub fast: RateProfile,
    /// Relaxed, power-saving cadence while well away from the fence.
    pub normal: RateProfile,
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self {
            fast: RateProfile {
                interval: Duration::from_secs(15),
                fastest_interval: Duration::from_secs(5),
                min_displacement_m: 25.0,
            },
            normal: RateProfile {
                interval: Duration::from_secs(30 * 60),
                fastest_interval: Duration::from_secs(25),
                min_displacement_m: 150.0,
            },
        }
    }
}

/// The controller's current registration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// High-frequency registration active.
    Fast,
    /// Normal-frequency registration active.
    Normal,
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMode::Fast => write!(f, "fast"),
            SamplingMode::Normal => write!(f, "normal"),
        }
    }
}

/// Command issued against the external location source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingCommand {
    /// Replace the current registration with the high-frequency profile.
    StartFast,
    /// Replace the current registration with the normal profile.
    StartNormal,
    /// Leave the current registration untouched.
    NoOp,
}

/// External location-fix source, out of scope for the engine.
///
/// By contract each start call cancels any previously active registration
/// before installing the new one; no overlapping registrations are ever
/// active.
pub trait LocationSource {
    /// Register for high-frequency, high-accuracy fixes.
    fn start_high_frequency(&mut self, profile: &RateProfile);

    /// Register for normal, power-saving fixes.
    fn start_normal_frequency(&mut self, profile: &RateProfile);
}

/// Translates rate directives into location-source commands.
///
/// Starts in [`SamplingMode::Normal`]; the caller is expected to have
/// registered the normal-rate subscription when it started feeding fixes.
#[derive(Debug, Clone)]
pub struct SamplingController {
    /// Current mode; set only by `apply`.
    mode: SamplingMode,
    /// Rate profiles handed to the location source on mode changes.
    profile: SamplingProfile,
}

impl Default for SamplingController {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingController {
    /// Create a controller in normal mode with default profiles.
    pub fn new() -> Self {
        Self::with_profile(SamplingProfile::default())
    }

    /// Create a controller in normal mode with custom profiles.
    pub fn with_profile(profile: SamplingProfile) -> Self {
        Self {
            mode: SamplingMode::Normal,
            profile,
        }
    }

    /// The current registration mode.
    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// The configured rate profiles.
    pub fn profile(&self) -> &SamplingProfile {
        &self.profile
    }

    /// Decide the command for a directive and commit the mode change.
    ///
    /// Idempotent: directives matching the current mode, and `NoChange`,
    /// yield [`SamplingCommand::NoOp`].
    pub fn apply(&mut self, directive: SamplingDirective) -> SamplingCommand {
        let command = match directive {
            SamplingDirective::Faster if self.mode != SamplingMode::Fast => {
                SamplingCommand::StartFast
            }
            SamplingDirective::Slower if self.mode != SamplingMode::Normal => {
                SamplingCommand::StartNormal
            }
            _ => SamplingCommand::NoOp,
        };

        match command {
            SamplingCommand::StartFast => {
                self.mode = SamplingMode::Fast;
                tracing::info!(mode = %self.mode, "raising sampling rate");
            }
            SamplingCommand::StartNormal => {
                self.mode = SamplingMode::Normal;
                tracing::info!(mode = %self.mode, "relaxing sampling rate");
            }
            SamplingCommand::NoOp => {}
        }

        command
    }

    /// Apply a directive and issue the resulting command to the source.
    pub fn drive(
        &mut self,
        directive: SamplingDirective,
        source: &mut dyn LocationSource,
    ) -> SamplingCommand {
        let command = self.apply(directive);
        match command {
            SamplingCommand::StartFast => source.start_high_frequency(&self.profile.fast),
            SamplingCommand::StartNormal => source.start_normal_frequency(&self.profile.normal),
            SamplingCommand::NoOp => {}
        }
        command
    }
}
