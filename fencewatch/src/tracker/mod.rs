//! Transition tracking.
//!
//! The [`TransitionTracker`] holds the previously observed [`Status`] and
//! derives, for each new classification, how the device's relationship to
//! the fence changed and whether the sampling rate should move. `observe`
//! is the only state-mutating operation in the whole engine; called once
//! per fix in arrival order it makes the output sequence a deterministic
//! function of the fix sequence.
//!
//! # Transition table
//!
//! | previous      | new           | transition  |
//! |---------------|---------------|-------------|
//! | Inside        | Inside        | RemainedIn  |
//! | Outside/Close | Inside        | Entered     |
//! | Inside        | Outside/Close | Exited      |
//! | Outside/Close | Outside/Close | RemainedOut |
//!
//! # Directive table
//!
//! Only crossing the outer band edge moves the rate; Inside ⇄ Close churn
//! near the boundary never does (hysteresis):
//!
//! | previous     | new          | directive |
//! |--------------|--------------|-----------|
//! | Outside      | Close/Inside | Faster    |
//! | Close/Inside | Outside      | Slower    |
//! | anything else             | | NoChange  |

use chrono::{DateTime, Utc};

use crate::classifier::Status;

/// How the fence relationship changed between two consecutive fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Crossed into the fence.
    Entered,
    /// Was inside, still inside.
    RemainedIn,
    /// Crossed out of the fence.
    Exited,
    /// Was outside (or close), still outside (or close).
    RemainedOut,
}

impl Transition {
    /// Whether this transition crossed the fence boundary.
    pub fn is_boundary_crossing(&self) -> bool {
        matches!(self, Transition::Entered | Transition::Exited)
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Entered => write!(f, "entered"),
            Transition::RemainedIn => write!(f, "remained in"),
            Transition::Exited => write!(f, "exited"),
            Transition::RemainedOut => write!(f, "remained out"),
        }
    }
}

/// A hint about the desired sampling rate.
///
/// A hint, not a command: the sampling controller decides whether to act
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingDirective {
    /// Approaching or entering the fence; raise the fix frequency.
    Faster,
    /// Moved well away; relax the fix frequency to save power.
    Slower,
    /// Keep the current rate.
    NoChange,
}

impl std::fmt::Display for SamplingDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingDirective::Faster => write!(f, "faster"),
            SamplingDirective::Slower => write!(f, "slower"),
            SamplingDirective::NoChange => write!(f, "no change"),
        }
    }
}

/// The outcome of observing one classified fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The status that was observed.
    pub status: Status,
    /// How the relationship changed from the previous observation.
    pub transition: Transition,
    /// Sampling-rate hint derived from the status change.
    pub directive: SamplingDirective,
}

/// Stateful tracker over consecutive status observations.
///
/// Owned by exactly one fix-processing path; concurrent observers must
/// serialize fixes through a single queue before reaching the tracker.
#[derive(Debug, Clone)]
pub struct TransitionTracker {
    /// Last committed status; `None` until the first observation.
    last_status: Option<Status>,
    /// When the last observation was committed.
    last_observed_at: Option<DateTime<Utc>>,
}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionTracker {
    /// Create a tracker with an unknown baseline.
    ///
    /// The first observation derives its transition against an assumed
    /// `Outside` baseline (so a monitor started inside the fence still
    /// reports `Entered`) but never emits a rate directive: there is no
    /// established sampling posture to adjust yet.
    pub fn new() -> Self {
        Self {
            last_status: None,
            last_observed_at: None,
        }
    }

    /// Create a tracker with a known baseline, e.g. restored from a
    /// previous session. Both tables apply unmodified from the first call.
    pub fn with_last_status(status: Status) -> Self {
        Self {
            last_status: Some(status),
            last_observed_at: None,
        }
    }

    /// The last committed status, if any observation happened yet.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    /// When the last observation was committed.
    pub fn last_observed_at(&self) -> Option<DateTime<Utc>> {
        self.last_observed_at
    }

    /// Observe a newly classified status.
    ///
    /// Total over all status pairs; commits `new` as the baseline for the
    /// next call after deriving the outputs.
    pub fn observe(&mut self, new: Status) -> Observation {
        let transition = derive_transition(self.last_status.unwrap_or(Status::Outside), new);
        let directive = match self.last_status {
            Some(previous) => derive_directive(previous, new),
            None => SamplingDirective::NoChange,
        };

        tracing::debug!(
            previous = ?self.last_status,
            new = %new,
            transition = %transition,
            directive = %directive,
            "observed status"
        );

        self.last_status = Some(new);
        self.last_observed_at = Some(Utc::now());

        Observation {
            status: new,
            transition,
            directive,
        }
    }
}

fn derive_transition(previous: Status, new: Status) -> Transition {
    match (previous, new) {
        (Status::Inside, Status::Inside) => Transition::RemainedIn,
        (_, Status::Inside) => Transition::Entered,
        (Status::Inside, _) => Transition::Exited,
        _ => Transition::RemainedOut,
    }
}

fn derive_directive(previous: Status, new: Status) -> SamplingDirective {
    match (previous, new) {
        (Status::Outside, Status::Close | Status::Inside) => SamplingDirective::Faster,
        (Status::Close | Status::Inside, Status::Outside) => SamplingDirective::Slower,
        _ => SamplingDirective::NoChange,
    }
}
