//! Check command - one-shot classification of a point against a fence.

use std::path::PathBuf;

use clap::Args;

use fencewatch::{classify, LocationFix};

use super::common::{geometry_config, load_fence};
use crate::error::CliError;

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the fence description JSON file
    #[arg(long)]
    pub fence: PathBuf,

    /// Latitude of the point to classify, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the point to classify, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Close-band width in meters (default 400)
    #[arg(long)]
    pub close_distance: Option<f64>,

    /// Densification tolerance in meters (default 20)
    #[arg(long)]
    pub densify_tolerance: Option<f64>,
}

/// Run the check command.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let config = geometry_config(args.close_distance, args.densify_tolerance);
    let fence = load_fence(&args.fence, &config)?;

    let fix = LocationFix::new(args.lat, args.lon);
    let status = classify(&fence, &fix);

    println!("{}: {} is {}", fence.name(), fix, status);
    Ok(())
}
