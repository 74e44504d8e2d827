//! Aggregation functions over a [`FilteredView`](crate::filter::FilteredView).

pub mod aggregate;
pub mod table;

pub use aggregate::{
    CostPoint, OverviewMetrics, cost_duration_points, group_mean, mean, mode, monthly_counts,
    value_counts,
};
pub use table::{AggregateTable, bottom_n, sort_descending, top_n};
