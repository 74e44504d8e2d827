//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loaded records and the immutable dataset (`TripRecord`, `Dataset`)
//! - filter inputs (`FilterCriteria`, `YearRange`, destination/transport filters)
//! - navigation and field selectors (`NavigationState`, `CategoryField`, `Measure`)
//! - scalar results that may be empty (`Metric`)
//! - transportation label normalization (`transport`)

pub mod transport;
pub mod types;

pub use types::*;
