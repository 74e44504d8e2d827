//! `travel-insights` library crate.
//!
//! The binary (`travel`) is a thin wrapper around this library so that:
//!
//! - the filter/aggregate pipeline is testable without spawning processes
//! - the CLI report and the terminal dashboard share one implementation
//!
//! Data flows `io::ingest` -> `domain::transport` -> `filter` -> `stats` ->
//! `views`, and from there to `report`/`plot` or `tui`.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod stats;
pub mod tui;
pub mod views;
