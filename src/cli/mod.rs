pub mod analyze;
pub mod history;
pub mod schema;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loadbalance")]
#[command(
    author,
    version,
    about = "Measure how work is shared across a group and plan how to rebalance it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a group and write reports
    Analyze(AnalyzeArgs),

    /// Show stored analyses for a group
    History(HistoryArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct AnalyzeArgs {
    /// Group to analyze
    #[arg(short, long)]
    pub group: String,

    /// YAML or JSON file with rosters and activity
    #[arg(short, long, env = "LOADBALANCE_DATA")]
    pub data: PathBuf,

    /// Path to config file
    #[arg(short, long, default_value = "loadbalance.yaml")]
    pub config: PathBuf,

    /// Window start (YYYY-MM-DD or RFC 3339); defaults to the current week
    #[arg(long, value_parser = parse_instant)]
    pub from: Option<DateTime<Utc>>,

    /// Window end, exclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub to: Option<DateTime<Utc>>,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Do not store a snapshot of this analysis
    #[arg(long)]
    pub no_snapshot: bool,

    /// Exit 1 if the imbalance is severe (CI mode)
    #[arg(long)]
    pub fail_on_severe: bool,
}

#[derive(Parser, Clone)]
pub struct HistoryArgs {
    /// Group to show
    #[arg(short, long)]
    pub group: String,

    /// Config file (for the snapshot directory)
    #[arg(short, long, default_value = "loadbalance.yaml")]
    pub config: PathBuf,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Accept a calendar date (midnight UTC) or a full RFC 3339 timestamp
fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected YYYY-MM-DD or RFC 3339 timestamp: {}", e))
}
