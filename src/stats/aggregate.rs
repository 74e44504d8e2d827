//! Stateless reducers over a filtered view.
//!
//! Every function here is pure and total: an empty view yields
//! [`Metric::NoData`] or an empty table, never an error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::domain::{CategoryField, Measure, Metric, YearMonth};
use crate::filter::FilteredView;
use crate::stats::table::AggregateTable;

/// Most frequent value of `field`.
///
/// Ties are broken by natural ascending order of the value, so the result
/// does not depend on row order.
pub fn mode(view: &FilteredView<'_>, field: CategoryField) -> Metric<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in view.iter() {
        *counts.entry(record.category(field)).or_insert(0) += 1;
    }

    let best = counts
        .into_iter()
        .max_by(|(a_key, a_count), (b_key, b_count)| {
            a_count.cmp(b_count).then_with(|| b_key.cmp(a_key))
        })
        .map(|(key, _)| key.to_string());
    Metric::from_option(best)
}

/// Arithmetic mean of `measure`.
pub fn mean(view: &FilteredView<'_>, measure: Measure) -> Metric<f64> {
    if view.is_empty() {
        return Metric::NoData;
    }
    let sum: f64 = view.iter().map(|r| r.measure(measure)).sum();
    Metric::Value(sum / view.len() as f64)
}

/// Mean of `value` per distinct `group`, ascending by mean.
///
/// With `exclude_zero`, rows whose value is `<= 0` are dropped before
/// grouping. Groups with equal means keep first-encountered order.
pub fn group_mean(
    view: &FilteredView<'_>,
    group: CategoryField,
    value: Measure,
    exclude_zero: bool,
) -> AggregateTable<String, f64> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

    for record in view.iter() {
        let v = record.measure(value);
        if exclude_zero && v <= 0.0 {
            continue;
        }
        let key = record.category(group);
        let slot = sums.entry(key).or_insert_with(|| {
            order.push(key);
            (0.0, 0)
        });
        slot.0 += v;
        slot.1 += 1;
    }

    let mut rows: Vec<(String, f64)> = order
        .into_iter()
        .filter_map(|key| {
            let (sum, n) = sums.get(key)?;
            Some((key.to_string(), sum / *n as f64))
        })
        .collect();
    rows.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    AggregateTable::new(rows)
}

/// Occurrences of each distinct value of `field`, most frequent first.
///
/// Equal counts keep first-encountered order.
pub fn value_counts(view: &FilteredView<'_>, field: CategoryField) -> AggregateTable<String, usize> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in view.iter() {
        let key = record.category(field);
        let count = counts.entry(key).or_insert_with(|| {
            order.push(key);
            0
        });
        *count += 1;
    }

    let mut rows: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| (key.to_string(), counts.get(key).copied().unwrap_or(0)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    AggregateTable::new(rows)
}

/// Trips per start month, chronological.
pub fn monthly_counts(view: &FilteredView<'_>) -> AggregateTable<YearMonth, usize> {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for record in view.iter() {
        *counts.entry(record.start_month()).or_insert(0) += 1;
    }
    AggregateTable::new(counts.into_iter().collect())
}

/// One point of the cost-versus-duration scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostPoint {
    pub duration_days: i64,
    pub total_cost: f64,
    pub destination: String,
    pub traveler_nationality: String,
}

/// Scatter points for trips with a positive total cost and a positive duration.
pub fn cost_duration_points(view: &FilteredView<'_>) -> Vec<CostPoint> {
    view.iter()
        .filter(|r| r.total_cost() > 0.0 && r.duration_days > 0)
        .map(|r| CostPoint {
            duration_days: r.duration_days,
            total_cost: r.total_cost(),
            destination: r.destination.clone(),
            traveler_nationality: r.traveler_nationality.clone(),
        })
        .collect()
}

/// The four scalar cards of the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub most_traveled_destination: Metric<String>,
    pub most_used_transportation: Metric<String>,
    pub avg_accommodation_cost: Metric<f64>,
    pub avg_transportation_cost: Metric<f64>,
}

impl OverviewMetrics {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        Self {
            most_traveled_destination: mode(view, CategoryField::Destination),
            most_used_transportation: mode(view, CategoryField::TransportationType),
            avg_accommodation_cost: mean(view, Measure::AccommodationCost),
            avg_transportation_cost: mean(view, Measure::TransportationCost),
        }
    }
}
