//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - initializes logging
//! - loads the (cached) dataset
//! - runs the filter/aggregate pipeline
//! - prints reports/plots, writes exports, or starts the dashboard

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ExportArgs, FilterArgs, OptionsArgs, ViewArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::report::PlotSize;

pub mod pipeline;

use pipeline::FilterInput;

/// Entry point for the `travel` binary.
pub fn run() -> Result<(), AppError> {
    // `travel` and `travel -d Paris` behave like `travel tui ...`.
    //
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env();

    match cli.command {
        Command::Tui(args) => handle_tui(args, &settings),
        Command::View(args) => handle_view(args, &settings),
        Command::Export(args) => handle_export(args, &settings),
        Command::Options(args) => handle_options(args, &settings),
    }
}

fn handle_view(args: ViewArgs, settings: &Settings) -> Result<(), AppError> {
    crate::logging::init_cli(args.filters.verbose);
    let dataset = pipeline::load(&settings.data_path_or(args.filters.file.as_ref()))?;
    let criteria = pipeline::build_criteria(dataset, &FilterInput::from(&args.filters))?;
    let run = pipeline::run_view(dataset, criteria, args.view);

    let plot = (!args.no_plot).then_some(PlotSize {
        width: args.width,
        height: args.height,
    });
    println!("{}", crate::report::format_view(&run.report, &run.criteria, plot));

    if let Some(path) = &args.export_json {
        crate::io::export::write_report_json(path, &run.report, &run.criteria)?;
    }
    Ok(())
}

fn handle_export(args: ExportArgs, settings: &Settings) -> Result<(), AppError> {
    crate::logging::init_cli(args.filters.verbose);
    let dataset = pipeline::load(&settings.data_path_or(args.filters.file.as_ref()))?;
    let criteria = pipeline::build_criteria(dataset, &FilterInput::from(&args.filters))?;
    let view = crate::filter::apply(dataset, &criteria);

    crate::io::export::write_records_csv(&args.out, &view)?;
    println!("Wrote {} records to {}", view.len(), args.out.display());
    Ok(())
}

fn handle_options(args: OptionsArgs, settings: &Settings) -> Result<(), AppError> {
    crate::logging::init_cli(args.verbose);
    let dataset = pipeline::load(&settings.data_path_or(args.file.as_ref()))?;
    print!("{}", crate::report::format_options(dataset));
    Ok(())
}

fn handle_tui(args: FilterArgs, settings: &Settings) -> Result<(), AppError> {
    let _log_guard = crate::logging::init_file(&settings.log_dir);
    let dataset = pipeline::load(&settings.data_path_or(args.file.as_ref()))?;

    // Validate CLI-provided filters before entering the alternate screen.
    let criteria = pipeline::build_criteria(dataset, &FilterInput::from(&args))?;
    let filters = crate::tui::FilterState::from_criteria(dataset, &criteria);

    info!(action = "start", component = "tui", records = dataset.len(), "Dashboard starting");
    crate::tui::run(dataset, filters)
}

/// Rewrite argv so `travel` defaults to `travel tui`.
///
/// Rules:
/// - `travel`                      -> `travel tui`
/// - `travel -d Paris ...`         -> `travel tui -d Paris ...`
/// - `travel --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "view" | "export" | "options");
    if is_subcommand {
        return argv;
    }

    // A leading flag means "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
