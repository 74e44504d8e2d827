//! Reporting utilities: formatted terminal output for view reports.

mod format;

pub use format::*;
