use clap::Parser;
use std::path::PathBuf;

/// vilert — IoT telemetry ingestion and alerting service
///
/// Consumes sensor readings from an MQTT broker, stores them, tracks
/// device liveness, and fans out threshold-breach alerts.
#[derive(Parser, Debug)]
#[command(name = "vilert")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
