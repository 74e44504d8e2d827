//! Command-line parsing for the travel insights dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline; `app` turns these structs into `FilterCriteria` and dispatches.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ALL, NavigationState};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "travel", version, about = "Travel Pattern Analysis Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(FilterArgs),
    /// Print one view as text with ASCII charts.
    View(ViewArgs),
    /// Write the filtered records to CSV.
    Export(ExportArgs),
    /// List the filter values available in the dataset.
    Options(OptionsArgs),
}

/// Dataset location and filter selections shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Dataset CSV (defaults to $TRAVEL_DATA_PATH, then "Travel details dataset.csv").
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// First start year to include (defaults to the earliest in the dataset).
    #[arg(long = "from", value_name = "YEAR")]
    pub year_from: Option<i32>,

    /// Last start year to include (defaults to the latest in the dataset).
    #[arg(long = "to", value_name = "YEAR")]
    pub year_to: Option<i32>,

    /// Destination to keep, or "All".
    #[arg(short = 'd', long, default_value = ALL)]
    pub destination: String,

    /// Transportation type to keep (repeatable), or "All".
    #[arg(short = 't', long = "transport", value_name = "TYPE", default_value = ALL)]
    pub transport: Vec<String>,

    /// Log progress to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Which page to render.
    #[arg(value_enum)]
    pub view: NavigationState,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Print tables only, without ASCII charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Also write the evaluated view to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct OptionsArgs {
    /// Dataset CSV (defaults to $TRAVEL_DATA_PATH, then "Travel details dataset.csv").
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Log progress to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
