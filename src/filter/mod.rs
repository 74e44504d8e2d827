//! Filter engine.
//!
//! A [`FilteredView`] is the ordered subsequence of the dataset whose records
//! satisfy all three predicates of a [`FilterCriteria`]:
//!
//! ```text
//! year(start_date) ∈ [min, max]
//!   AND (destination == "All" OR record.destination == destination)
//!   AND ("All" ∈ types OR record.transportation_type ∈ types)
//! ```
//!
//! An empty view is a normal outcome; every aggregate handles it.

use std::time::Instant;

use tracing::debug;

use crate::domain::{Dataset, FilterCriteria, TripRecord};

/// Records of a dataset matching one set of criteria, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn from_records(records: Vec<&'a TripRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Evaluate the full predicate for a single record.
pub fn matches(record: &TripRecord, criteria: &FilterCriteria) -> bool {
    criteria.year_range.contains(record.start_year())
        && criteria.destination.matches(&record.destination)
        && criteria.transportation.matches(&record.transportation_type)
}

/// Apply `criteria` to every record of `dataset`.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let start_time = Instant::now();
    let records: Vec<&TripRecord> = dataset
        .records()
        .iter()
        .filter(|r| matches(r, criteria))
        .collect();

    debug!(
        action = "filter",
        component = "filter_engine",
        matched = records.len(),
        total = dataset.len(),
        criteria = %criteria.summary(),
        duration_us = start_time.elapsed().as_micros(),
        "Filter applied"
    );

    FilteredView { records }
}
