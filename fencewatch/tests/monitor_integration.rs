//! Integration tests for the fence monitor pipeline.
//!
//! These tests verify the complete flow:
//! - fix → classification → transition → sampling command
//! - notification delivery on boundary crossings
//! - sampling-rate hysteresis across realistic movement sequences
//! - replay determinism
//!
//! Run with: `cargo test --test monitor_integration`

use fencewatch::{
    classifier::EARTH_RADIUS_M, FenceEvent, FenceEventKind, FenceGeometry, FenceMonitor,
    FenceObservation, GeometryConfig, LocationFix, LocationSource, NotificationSink, RateProfile,
    SamplingCommand, SamplingDirective, SamplingMode, Status, SpatialReference, Transition,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Degrees of arc corresponding to `m` meters along a great circle.
fn meters_to_deg(m: f64) -> f64 {
    m / (EARTH_RADIUS_M * std::f64::consts::PI / 180.0)
}

/// 1km square fence centered on (0, 0), close distance 400m.
fn square_fence() -> FenceGeometry {
    let h = meters_to_deg(500.0);
    FenceGeometry::prepare(
        &[(-h, -h), (h, -h), (h, h), (-h, h)],
        SpatialReference::Wgs84,
        &GeometryConfig::default(),
    )
    .expect("square ring is valid")
    .with_name("Test Square")
}

/// A fix on the equator, `m` meters east of the square's east edge
/// (negative values are inside the fence).
fn fix_east_of_edge(m: f64) -> LocationFix {
    LocationFix::new(0.0, meters_to_deg(500.0 + m))
}

/// Records every registration the controller issues.
#[derive(Default)]
struct RecordingSource {
    commands: Vec<SamplingCommand>,
}

impl LocationSource for RecordingSource {
    fn start_high_frequency(&mut self, _profile: &RateProfile) {
        self.commands.push(SamplingCommand::StartFast);
    }

    fn start_normal_frequency(&mut self, _profile: &RateProfile) {
        self.commands.push(SamplingCommand::StartNormal);
    }
}

/// Collects boundary-crossing notifications.
#[derive(Default)]
struct CollectingSink {
    events: Vec<FenceEvent>,
}

impl NotificationSink for CollectingSink {
    fn notify(&mut self, event: FenceEvent) {
        self.events.push(event);
    }
}

fn run_sequence(monitor: &mut FenceMonitor, fixes: &[LocationFix]) -> (Vec<FenceObservation>, RecordingSource, CollectingSink) {
    let mut source = RecordingSource::default();
    let mut sink = CollectingSink::default();
    let observations = fixes
        .iter()
        .map(|fix| monitor.process_fix(fix, &mut source, &mut sink))
        .collect();
    (observations, source, sink)
}

// ============================================================================
// Integration Tests
// ============================================================================

/// The canonical scenario: fence = 1km square centered at (0,0), close
/// distance 400m. Fix A at the center, fix B 600m outside the nearest
/// edge, fix C 200m outside.
#[test]
fn test_square_fence_scenario() {
    let mut monitor = FenceMonitor::new(square_fence());

    let fix_a = LocationFix::new(0.0, 0.0);
    let fix_b = fix_east_of_edge(600.0);
    let fix_c = fix_east_of_edge(200.0);

    let (observations, source, sink) =
        run_sequence(&mut monitor, &[fix_a, fix_b, fix_c]);

    assert_eq!(observations[0].status, Status::Inside);
    assert_eq!(observations[1].status, Status::Outside);
    assert_eq!(observations[2].status, Status::Close);

    assert_eq!(observations[0].transition, Transition::Entered);
    assert_eq!(observations[1].transition, Transition::Exited);
    assert_eq!(observations[2].transition, Transition::RemainedOut);

    // First observation establishes the baseline without a directive;
    // leaving the close band relaxes the rate; re-entering it raises it.
    assert_eq!(observations[0].directive, SamplingDirective::NoChange);
    assert_eq!(observations[1].directive, SamplingDirective::Slower);
    assert_eq!(observations[2].directive, SamplingDirective::Faster);

    // The controller starts in normal mode, so only the Faster directive
    // actually reconfigures the source.
    assert_eq!(observations[0].command, SamplingCommand::NoOp);
    assert_eq!(observations[1].command, SamplingCommand::NoOp);
    assert_eq!(observations[2].command, SamplingCommand::StartFast);
    assert_eq!(source.commands, vec![SamplingCommand::StartFast]);

    // Entered and Exited were notified; RemainedOut was silent.
    assert_eq!(sink.events.len(), 2);
    assert_eq!(sink.events[0].kind, FenceEventKind::Entered);
    assert_eq!(sink.events[0].fence, "Test Square");
    assert_eq!(sink.events[1].kind, FenceEventKind::Exited);
}

/// A full commute: approach from far away, enter, dwell near the boundary,
/// leave again. The rate must go fast exactly once on approach and drop
/// back exactly once after leaving, regardless of Close ⇄ Inside churn.
#[test]
fn test_commute_with_boundary_churn() {
    let mut monitor = FenceMonitor::new(square_fence());

    let fixes = [
        fix_east_of_edge(2_000.0), // far outside
        fix_east_of_edge(900.0),   // still outside
        fix_east_of_edge(300.0),   // close band
        fix_east_of_edge(-100.0),  // inside
        fix_east_of_edge(100.0),   // back in the close band
        fix_east_of_edge(-200.0),  // inside again
        fix_east_of_edge(350.0),   // close band
        fix_east_of_edge(1_500.0), // gone
    ];

    let (observations, source, sink) = run_sequence(&mut monitor, &fixes);

    // One StartFast on entering the close band, one StartNormal on leaving
    // it; the churn in between issues nothing.
    assert_eq!(
        source.commands,
        vec![SamplingCommand::StartFast, SamplingCommand::StartNormal]
    );
    assert_eq!(monitor.sampling_mode(), SamplingMode::Normal);

    // Two fence entries, two fence exits.
    let entered: Vec<_> = sink
        .events
        .iter()
        .filter(|e| e.kind == FenceEventKind::Entered)
        .collect();
    let exited: Vec<_> = sink
        .events
        .iter()
        .filter(|e| e.kind == FenceEventKind::Exited)
        .collect();
    assert_eq!(entered.len(), 2);
    assert_eq!(exited.len(), 2);

    // Inside ⇄ Close movement is Exited/Entered but never a rate change.
    assert_eq!(observations[4].transition, Transition::Exited);
    assert_eq!(observations[4].directive, SamplingDirective::NoChange);
    assert_eq!(observations[5].transition, Transition::Entered);
    assert_eq!(observations[5].directive, SamplingDirective::NoChange);
}

/// Feeding the same ordered fix sequence into two freshly constructed
/// monitors yields identical output sequences.
#[test]
fn test_replay_determinism() {
    let fixes: Vec<LocationFix> = [
        1_800.0, 450.0, 120.0, -50.0, -400.0, 80.0, -10.0, 500.0, 2_500.0, 390.0,
    ]
    .iter()
    .map(|&m| fix_east_of_edge(m))
    .collect();

    let mut first = FenceMonitor::new(square_fence());
    let mut second = FenceMonitor::new(square_fence());

    let (obs_first, source_first, sink_first) = run_sequence(&mut first, &fixes);
    let (obs_second, source_second, sink_second) = run_sequence(&mut second, &fixes);

    assert_eq!(obs_first, obs_second);
    assert_eq!(source_first.commands, source_second.commands);
    assert_eq!(sink_first.events, sink_second.events);
}

/// A fence authored in Web Mercator behaves like the same fence authored
/// in WGS84 once prepared.
#[test]
fn test_mercator_fence_end_to_end() {
    let fence = FenceGeometry::prepare(
        &[
            (-500.0, -500.0),
            (500.0, -500.0),
            (500.0, 500.0),
            (-500.0, 500.0),
        ],
        SpatialReference::WebMercator,
        &GeometryConfig::default(),
    )
    .expect("mercator square is valid")
    .with_name("Mercator Square");

    let mut monitor = FenceMonitor::new(fence);
    let fixes = [
        LocationFix::new(0.0, 0.0),
        fix_east_of_edge(600.0),
        fix_east_of_edge(200.0),
    ];

    let (observations, _, sink) = run_sequence(&mut monitor, &fixes);

    assert_eq!(observations[0].status, Status::Inside);
    assert_eq!(observations[1].status, Status::Outside);
    assert_eq!(observations[2].status, Status::Close);
    assert_eq!(sink.events.len(), 2);
}

/// A monitor restored with a persisted Inside baseline does not report a
/// spurious entry for the first fix inside the fence.
#[test]
fn test_restored_baseline_suppresses_spurious_entry() {
    use fencewatch::{SamplingController, TransitionTracker};

    let mut monitor = FenceMonitor::with_parts(
        square_fence(),
        TransitionTracker::with_last_status(Status::Inside),
        SamplingController::new(),
    );

    let (observations, _, sink) =
        run_sequence(&mut monitor, &[LocationFix::new(0.0, 0.0)]);

    assert_eq!(observations[0].transition, Transition::RemainedIn);
    assert!(sink.events.is_empty());
}

/// Dwelling in the close band never re-issues the fast registration.
#[test]
fn test_no_duplicate_registrations_while_dwelling() {
    let mut monitor = FenceMonitor::new(square_fence());

    let fixes = [
        fix_east_of_edge(1_000.0),
        fix_east_of_edge(350.0),
        fix_east_of_edge(320.0),
        fix_east_of_edge(290.0),
        fix_east_of_edge(260.0),
    ];

    let (_, source, _) = run_sequence(&mut monitor, &fixes);
    assert_eq!(source.commands, vec![SamplingCommand::StartFast]);
}
