//! View selector.
//!
//! Each dashboard page is a fixed, ordered list of [`AggregateCall`]s.
//! [`select`] returns that list for a page and [`evaluate`] runs it against a
//! filtered view, producing one titled [`Panel`] per call.

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::domain::{CategoryField, Measure, Metric, NavigationState, YearMonth};
use crate::filter::FilteredView;
use crate::stats::{self, AggregateTable, CostPoint};

/// Row limit used by the top/bottom panels.
pub const PANEL_ROWS: usize = 10;

/// The reducer behind a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mode(CategoryField),
    Mean(Measure),
    MonthlyCounts,
    ValueCounts(CategoryField),
    GroupMean {
        group: CategoryField,
        value: Measure,
        exclude_zero: bool,
    },
    CostDuration,
}

/// Post-processing applied to a table result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    AsIs,
    Top(usize),
    Bottom(usize),
    Descending,
}

/// Axis captions for a chart panel. Empty for scalar panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AxisLabels {
    pub x: &'static str,
    pub y: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCall {
    pub title: &'static str,
    pub reducer: Reducer,
    pub shape: Shape,
    pub labels: AxisLabels,
}

impl AggregateCall {
    const fn new(title: &'static str, reducer: Reducer) -> Self {
        Self {
            title,
            reducer,
            shape: Shape::AsIs,
            labels: AxisLabels { x: "", y: "" },
        }
    }

    const fn shaped(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    const fn labeled(mut self, x: &'static str, y: &'static str) -> Self {
        self.labels = AxisLabels { x, y };
        self
    }
}

/// The calls a page needs, in display order.
pub fn select(navigation: NavigationState) -> Vec<AggregateCall> {
    use CategoryField::{Destination, TransportationType};
    use Measure::{AccommodationCost, TotalCost, TransportationCost};

    match navigation {
        NavigationState::Overview => vec![
            AggregateCall::new("Most Traveled Destination", Reducer::Mode(Destination)),
            AggregateCall::new("Most Used Transportation", Reducer::Mode(TransportationType)),
            AggregateCall::new("Avg. Accommodation Cost", Reducer::Mean(AccommodationCost)),
            AggregateCall::new("Avg. Transportation Cost", Reducer::Mean(TransportationCost)),
        ],
        NavigationState::Trends => vec![
            AggregateCall::new("Monthly Travel Trends", Reducer::MonthlyCounts)
                .labeled("Month", "Number of Trips"),
            AggregateCall::new(
                "Transportation Usage Trends",
                Reducer::ValueCounts(TransportationType),
            )
            .labeled("Mode of Transport", "Usage Count"),
        ],
        NavigationState::WhereToVisit => vec![
            AggregateCall::new(
                "Top 10 Most Affordable Destinations",
                Reducer::GroupMean {
                    group: Destination,
                    value: TotalCost,
                    exclude_zero: true,
                },
            )
            .shaped(Shape::Top(PANEL_ROWS))
            .labeled("Destination", "Average Cost ($)"),
            AggregateCall::new("Cost vs Duration", Reducer::CostDuration)
                .labeled("Trip Duration (Days)", "Total Travel Cost ($)"),
            AggregateCall::new(
                "Travel Costs by Country",
                Reducer::GroupMean {
                    group: Destination,
                    value: TotalCost,
                    exclude_zero: false,
                },
            )
            .labeled("Destination", "Total Cost ($)"),
        ],
        NavigationState::WhatToAvoid => vec![
            AggregateCall::new("Least Popular Destinations", Reducer::ValueCounts(Destination))
                .shaped(Shape::Bottom(PANEL_ROWS))
                .labeled("Destination", "Visits"),
            AggregateCall::new(
                "High-Cost Transportation",
                Reducer::GroupMean {
                    group: TransportationType,
                    value: TransportationCost,
                    exclude_zero: false,
                },
            )
            .shaped(Shape::Descending)
            .labeled("Transportation Type", "Average Cost ($)"),
        ],
    }
}

/// Evaluated result of one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PanelData {
    Label(Metric<String>),
    Amount(Metric<f64>),
    Categories(AggregateTable<String, f64>),
    Counts(AggregateTable<String, usize>),
    Monthly(AggregateTable<YearMonth, usize>),
    Scatter(Vec<CostPoint>),
}

impl PanelData {
    /// True when the panel has nothing to plot or show.
    pub fn is_empty(&self) -> bool {
        match self {
            PanelData::Label(m) => m.is_no_data(),
            PanelData::Amount(m) => m.is_no_data(),
            PanelData::Categories(t) => t.is_empty(),
            PanelData::Counts(t) => t.is_empty(),
            PanelData::Monthly(t) => t.is_empty(),
            PanelData::Scatter(points) => points.is_empty(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, PanelData::Label(_) | PanelData::Amount(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub labels: AxisLabels,
    #[serde(flatten)]
    pub data: PanelData,
}

/// All panels of one page for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewReport {
    pub navigation: NavigationState,
    pub matched_records: usize,
    pub panels: Vec<Panel>,
}

impl ViewReport {
    pub fn panel(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.title == title)
    }
}

fn shape_table<K: Clone, V: PartialOrd + Clone>(
    table: AggregateTable<K, V>,
    shape: Shape,
) -> AggregateTable<K, V> {
    match shape {
        Shape::AsIs => table,
        Shape::Top(n) => stats::top_n(&table, n),
        Shape::Bottom(n) => stats::bottom_n(&table, n),
        Shape::Descending => stats::sort_descending(&table),
    }
}

/// Run one call against `view`.
pub fn run_call(call: &AggregateCall, view: &FilteredView<'_>) -> PanelData {
    match call.reducer {
        Reducer::Mode(field) => PanelData::Label(stats::mode(view, field)),
        Reducer::Mean(measure) => PanelData::Amount(stats::mean(view, measure)),
        Reducer::MonthlyCounts => {
            PanelData::Monthly(shape_table(stats::monthly_counts(view), call.shape))
        }
        Reducer::ValueCounts(field) => {
            PanelData::Counts(shape_table(stats::value_counts(view, field), call.shape))
        }
        Reducer::GroupMean {
            group,
            value,
            exclude_zero,
        } => PanelData::Categories(shape_table(
            stats::group_mean(view, group, value, exclude_zero),
            call.shape,
        )),
        Reducer::CostDuration => PanelData::Scatter(stats::cost_duration_points(view)),
    }
}

/// Evaluate `calls` in order against `view`.
pub fn evaluate(
    navigation: NavigationState,
    calls: &[AggregateCall],
    view: &FilteredView<'_>,
) -> ViewReport {
    let start_time = Instant::now();
    let panels: Vec<Panel> = calls
        .iter()
        .map(|call| Panel {
            title: call.title,
            labels: call.labels,
            data: run_call(call, view),
        })
        .collect();

    debug!(
        action = "evaluate",
        component = "view_selector",
        view = navigation.display_name(),
        panels = panels.len(),
        matched = view.len(),
        duration_us = start_time.elapsed().as_micros(),
        "View evaluated"
    );

    ViewReport {
        navigation,
        matched_records: view.len(),
        panels,
    }
}
