//! Fence monitor pipeline.
//!
//! Composes the engine components into the single-writer fix path:
//!
//! ```text
//! location source ──► classify ──► observe ──► drive ──► commands back
//!                                     │                  to the source
//!                                     └──► Entered/Exited events to the
//!                                          notification sink
//! ```
//!
//! One [`FenceMonitor`] owns one fence, one tracker and one controller.
//! [`FenceMonitor::process_fix`] is the only entry point and must be called
//! once per fix in arrival order; fixes arriving from multiple paths must
//! be serialized by the caller first. Replaying the same fix sequence
//! against a fresh monitor reproduces the same observations.

use crate::classifier::{classify, Status};
use crate::fix::LocationFix;
use crate::geometry::FenceGeometry;
use crate::sampling::{LocationSource, SamplingCommand, SamplingController, SamplingMode};
use crate::tracker::{SamplingDirective, Transition, TransitionTracker};

/// Which fence boundary crossing a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceEventKind {
    /// The device entered the fence.
    Entered,
    /// The device left the fence.
    Exited,
}

/// A boundary-crossing notification.
#[derive(Debug, Clone, PartialEq)]
pub struct FenceEvent {
    /// Whether the fence was entered or exited.
    pub kind: FenceEventKind,
    /// Name of the fence that was crossed.
    pub fence: String,
    /// The fix that triggered the crossing.
    pub fix: LocationFix,
    /// The status observed for that fix.
    pub status: Status,
}

impl FenceEvent {
    /// A one-line notification title, e.g. `Alert! Entered Campus`.
    pub fn headline(&self) -> String {
        match self.kind {
            FenceEventKind::Entered => format!("Alert! Entered {}", self.fence),
            FenceEventKind::Exited => format!("Exited {}", self.fence),
        }
    }
}

/// External presentation layer for boundary-crossing events.
///
/// Entered and exited are the only transitions delivered; everything else
/// is silent.
pub trait NotificationSink {
    /// Deliver one boundary-crossing event.
    fn notify(&mut self, event: FenceEvent);
}

/// Everything one processed fix produced, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceObservation {
    /// Classified status of the fix.
    pub status: Status,
    /// How the fence relationship changed.
    pub transition: Transition,
    /// Sampling-rate hint derived from the change.
    pub directive: SamplingDirective,
    /// Command actually issued against the location source.
    pub command: SamplingCommand,
}

/// Single-fence proximity monitor.
#[derive(Debug)]
pub struct FenceMonitor {
    fence: FenceGeometry,
    tracker: TransitionTracker,
    controller: SamplingController,
}

impl FenceMonitor {
    /// Create a monitor for a prepared fence with an unknown baseline and
    /// default sampling profiles.
    pub fn new(fence: FenceGeometry) -> Self {
        Self {
            fence,
            tracker: TransitionTracker::new(),
            controller: SamplingController::new(),
        }
    }

    /// Create a monitor from explicit parts, e.g. a tracker restored from a
    /// persisted baseline or a controller with custom rate profiles.
    pub fn with_parts(
        fence: FenceGeometry,
        tracker: TransitionTracker,
        controller: SamplingController,
    ) -> Self {
        Self {
            fence,
            tracker,
            controller,
        }
    }

    /// The monitored fence.
    pub fn fence(&self) -> &FenceGeometry {
        &self.fence
    }

    /// The controller's current sampling mode.
    pub fn sampling_mode(&self) -> SamplingMode {
        self.controller.mode()
    }

    /// The tracker's last committed status, if any.
    pub fn last_status(&self) -> Option<Status> {
        self.tracker.last_status()
    }

    /// Replace the monitored fence wholesale.
    ///
    /// The previous baseline belongs to the previous fence, so the tracker
    /// resets to an unknown baseline; the sampling mode is left as is until
    /// the next fix decides it.
    pub fn replace_fence(&mut self, fence: FenceGeometry) {
        tracing::info!(fence = fence.name(), "fence replaced");
        self.fence = fence;
        self.tracker = TransitionTracker::new();
    }

    /// Process one location fix through the whole pipeline.
    pub fn process_fix(
        &mut self,
        fix: &LocationFix,
        source: &mut dyn LocationSource,
        sink: &mut dyn NotificationSink,
    ) -> FenceObservation {
        let status = classify(&self.fence, fix);
        let observed = self.tracker.observe(status);
        let command = self.controller.drive(observed.directive, source);

        tracing::info!(
            fence = self.fence.name(),
            %status,
            transition = %observed.transition,
            directive = %observed.directive,
            "processed fix"
        );

        match observed.transition {
            Transition::Entered => sink.notify(FenceEvent {
                kind: FenceEventKind::Entered,
                fence: self.fence.name().to_string(),
                fix: *fix,
                status,
            }),
            Transition::Exited => sink.notify(FenceEvent {
                kind: FenceEventKind::Exited,
                fence: self.fence.name().to_string(),
                fix: *fix,
                status,
            }),
            Transition::RemainedIn | Transition::RemainedOut => {}
        }

        FenceObservation {
            status,
            transition: observed.transition,
            directive: observed.directive,
            command,
        }
    }
}
