//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built once by the loader and shared read-only for the process lifetime
//! - borrowed by filtered views without copying
//! - exported to CSV/JSON

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Wildcard label accepted by the destination and transportation filters.
pub const ALL: &str = "All";

/// One trip row after loading and normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    pub destination: String,
    /// Canonical label (see `domain::transport`).
    pub transportation_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub traveler_name: Option<String>,
    pub traveler_nationality: String,
    pub accommodation_cost: f64,
    pub transportation_cost: f64,
    /// `end_date - start_date` in days. Negative when the source is inconsistent.
    pub duration_days: i64,
}

impl TripRecord {
    pub fn total_cost(&self) -> f64 {
        self.accommodation_cost + self.transportation_cost
    }

    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn start_month(&self) -> YearMonth {
        YearMonth::from_date(self.start_date)
    }

    pub fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Destination => self.destination.as_str(),
            CategoryField::TransportationType => self.transportation_type.as_str(),
        }
    }

    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::AccommodationCost => self.accommodation_cost,
            Measure::TransportationCost => self.transportation_cost,
            Measure::TotalCost => self.total_cost(),
        }
    }
}

/// The loaded dataset. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest start year, `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().map(TripRecord::start_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Distinct destinations in first-seen order.
    pub fn destinations(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.destination.as_str()))
    }

    /// Distinct (normalized) transportation types in first-seen order.
    pub fn transportation_types(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.transportation_type.as_str()))
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Inclusive start-year window. Always satisfies `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, AppError> {
        if min > max {
            return Err(AppError::invalid_filter(format!(
                "Invalid year range: {min} is after {max}."
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Destination predicate: wildcard or exact match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DestinationFilter {
    All,
    Exact(String),
}

impl DestinationFilter {
    /// `"All"` maps to the wildcard, anything else to an exact match.
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Self::All
        } else {
            Self::Exact(label.to_string())
        }
    }

    pub fn matches(&self, destination: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(want) => want == destination,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Exact(want) => want.as_str(),
        }
    }
}

/// Transportation-type predicate: wildcard or set membership.
///
/// An empty `Only` set matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransportFilter {
    All,
    Only(BTreeSet<String>),
}

impl TransportFilter {
    /// Build from widget labels. Presence of `"All"` anywhere short-circuits.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for label in labels {
            let label = label.into();
            if label == ALL {
                return Self::All;
            }
            set.insert(label);
        }
        Self::Only(set)
    }

    pub fn matches(&self, transportation_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(transportation_type),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => ALL.to_string(),
            Self::Only(set) if set.is_empty() => "(none)".to_string(),
            Self::Only(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

/// User-selected constraints. Passed explicitly into every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub year_range: YearRange,
    pub destination: DestinationFilter,
    pub transportation: TransportFilter,
}

impl FilterCriteria {
    /// Criteria that keep every record of `dataset`.
    pub fn full_range(dataset: &Dataset) -> Self {
        let (min, max) = dataset.year_bounds().unwrap_or((0, 0));
        Self {
            year_range: YearRange { min, max },
            destination: DestinationFilter::All,
            transportation: TransportFilter::All,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "years {}-{} | destination: {} | transport: {}",
            self.year_range.min(),
            self.year_range.max(),
            self.destination.label(),
            self.transportation.label(),
        )
    }
}

/// The four dashboard pages. Closed set controlled by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationState {
    Overview,
    Trends,
    WhereToVisit,
    WhatToAvoid,
}

impl NavigationState {
    pub const ALL: [NavigationState; 4] = [
        NavigationState::Overview,
        NavigationState::Trends,
        NavigationState::WhereToVisit,
        NavigationState::WhatToAvoid,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            NavigationState::Overview => "Overview",
            NavigationState::Trends => "Trends",
            NavigationState::WhereToVisit => "Where to Visit",
            NavigationState::WhatToAvoid => "What to Avoid",
        }
    }

    pub fn index(self) -> usize {
        match self {
            NavigationState::Overview => 0,
            NavigationState::Trends => 1,
            NavigationState::WhereToVisit => 2,
            NavigationState::WhatToAvoid => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Categorical columns usable as grouping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Destination,
    TransportationType,
}

/// Numeric columns usable as aggregation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    AccommodationCost,
    TransportationCost,
    TotalCost,
}

/// Calendar month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A scalar result that may be absent because the filtered view was empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric<T> {
    Value(T),
    NoData,
}

/// Placeholder shown wherever an aggregate has no input rows.
pub const NO_DATA: &str = "No Data";

impl<T> Metric<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Metric::Value(v),
            None => Metric::NoData,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Metric::NoData)
    }
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => fmt::Display::fmt(v, f),
            Metric::NoData => f.write_str(NO_DATA),
        }
    }
}

// Exported as the bare value, or the "No Data" placeholder string.
impl<T: Serialize> Serialize for Metric<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => v.serialize(serializer),
            Metric::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}
