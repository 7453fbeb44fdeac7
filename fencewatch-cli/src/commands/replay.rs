//! Replay command - feed an ordered fix stream through a fence monitor.
//!
//! Reads newline-delimited JSON fixes from a file or stdin and processes
//! them in arrival order, standing in for the OS location source and the
//! notification service of a device deployment. Output goes to stdout;
//! structured logs go to stderr via `tracing`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Args;

use fencewatch::{
    FenceEvent, FenceMonitor, LocationFix, LocationSource, NotificationSink, RateProfile,
    SamplingCommand, SamplingController, TransitionTracker,
};

use super::common::{geometry_config, load_fence, BaselineStatus};
use crate::error::CliError;

/// Arguments for the replay command.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Path to the fence description JSON file
    #[arg(long)]
    pub fence: PathBuf,

    /// Path to the NDJSON fix stream; stdin when omitted
    #[arg(long)]
    pub fixes: Option<PathBuf>,

    /// Close-band width in meters (default 400)
    #[arg(long)]
    pub close_distance: Option<f64>,

    /// Densification tolerance in meters (default 20)
    #[arg(long)]
    pub densify_tolerance: Option<f64>,

    /// Resume from a persisted baseline instead of an unknown one
    #[arg(long, value_enum)]
    pub last_status: Option<BaselineStatus>,
}

/// Stand-in location source that reports registration changes on stdout.
#[derive(Default)]
struct ConsoleSource {
    reconfigurations: usize,
}

impl LocationSource for ConsoleSource {
    fn start_high_frequency(&mut self, profile: &RateProfile) {
        self.reconfigurations += 1;
        println!(
            ">> sampling fast: every {:?} (fastest {:?}, min displacement {}m)",
            profile.interval, profile.fastest_interval, profile.min_displacement_m
        );
    }

    fn start_normal_frequency(&mut self, profile: &RateProfile) {
        self.reconfigurations += 1;
        println!(
            ">> sampling normal: every {:?} (fastest {:?}, min displacement {}m)",
            profile.interval, profile.fastest_interval, profile.min_displacement_m
        );
    }
}

/// Stand-in notification service that prints event headlines.
#[derive(Default)]
struct ConsoleSink {
    delivered: usize,
}

impl NotificationSink for ConsoleSink {
    fn notify(&mut self, event: FenceEvent) {
        self.delivered += 1;
        println!("!! {}", event.headline());
    }
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let config = geometry_config(args.close_distance, args.densify_tolerance);
    let fence = load_fence(&args.fence, &config)?;

    let tracker = match args.last_status {
        Some(baseline) => TransitionTracker::with_last_status(baseline.into()),
        None => TransitionTracker::new(),
    };
    let mut monitor = FenceMonitor::with_parts(fence, tracker, SamplingController::new());

    let reader: Box<dyn BufRead> = match &args.fixes {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|source| {
            CliError::Io {
                path: path.clone(),
                source,
            }
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut source = ConsoleSource::default();
    let mut sink = ConsoleSink::default();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| CliError::Io {
            path: args.fixes.clone().unwrap_or_else(|| PathBuf::from("<stdin>")),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let fix: LocationFix =
            serde_json::from_str(&line).map_err(|e| CliError::FixFormat {
                line: line_number,
                message: e.to_string(),
            })?;

        // Source-boundary validation: the engine trusts its input, so
        // malformed coordinates never reach it.
        if !fix.has_finite_coordinates() {
            tracing::warn!(line = line_number, "skipping fix with non-finite coordinates");
            skipped += 1;
            continue;
        }

        let observation = monitor.process_fix(&fix, &mut source, &mut sink);
        processed += 1;

        println!(
            "{} {} [{}, {}]",
            fix, observation.status, observation.transition, observation.directive
        );
        if observation.command != SamplingCommand::NoOp {
            tracing::debug!(command = ?observation.command, "sampling reconfigured");
        }
    }

    println!(
        "-- {} fixes processed, {} skipped, {} notifications, {} sampling reconfigurations, final mode {}",
        processed,
        skipped,
        sink.delivered,
        source.reconfigurations,
        monitor.sampling_mode()
    );
    Ok(())
}
