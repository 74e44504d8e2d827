//! Formatted terminal output for view reports.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (golden tests below)

use crate::domain::{Dataset, FilterCriteria, Metric, NO_DATA};
use crate::plot;
use crate::views::{Panel, PanelData, ViewReport};

const KEY_WIDTH: usize = 24;

/// Chart size for the ASCII renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: usize,
    pub height: usize,
}

/// `$1234.50`, or the placeholder when there is no data.
pub fn format_amount(amount: &Metric<f64>) -> String {
    match amount {
        Metric::Value(v) => format!("${v:.2}"),
        Metric::NoData => NO_DATA.to_string(),
    }
}

pub fn no_data_message(title: &str) -> String {
    format!("No valid data available for {title}. Please adjust the filters.")
}

/// Title block: page name, active filters and match count.
pub fn format_header(report: &ViewReport, criteria: &FilterCriteria) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Travel Pattern Analysis - {} ===\n",
        report.navigation.display_name()
    ));
    out.push_str(&format!("Filters: {}\n", criteria.summary()));
    out.push_str(&format!("Matched records: {}\n", report.matched_records));
    out
}

/// Full text rendering of one page. Charts are drawn when `plot` is set.
pub fn format_view(report: &ViewReport, criteria: &FilterCriteria, plot: Option<PlotSize>) -> String {
    let mut out = format_header(report, criteria);

    let (scalars, charts): (Vec<&Panel>, Vec<&Panel>) =
        report.panels.iter().partition(|p| p.data.is_scalar());

    if !scalars.is_empty() {
        out.push_str("\nKey Metrics:\n");
        for panel in scalars {
            out.push_str(&format!("- {}: {}\n", panel.title, format_scalar(&panel.data)));
        }
    }

    for panel in charts {
        out.push('\n');
        out.push_str(&format_panel(panel, plot));
    }

    out
}

fn format_scalar(data: &PanelData) -> String {
    match data {
        PanelData::Label(m) => m.to_string(),
        PanelData::Amount(m) => format_amount(m),
        _ => String::new(),
    }
}

/// One chart panel: title, table, optional chart.
pub fn format_panel(panel: &Panel, plot: Option<PlotSize>) -> String {
    let mut out = format!("{}\n", panel.title);

    if panel.data.is_empty() {
        out.push_str(&no_data_message(panel.title));
        out.push('\n');
        return out;
    }

    let (x, y) = (panel.labels.x, panel.labels.y);
    match &panel.data {
        PanelData::Categories(table) => {
            let rows: Vec<(String, String)> = table
                .rows
                .iter()
                .map(|(k, v)| (k.clone(), format!("{v:.2}")))
                .collect();
            out.push_str(&format_table(x, y, &rows));
            if let Some(size) = plot {
                out.push('\n');
                out.push_str(&plot::render_bar_chart(&table.rows, size.width, |v| format!("{v:.2}")));
            }
        }
        PanelData::Counts(table) => {
            let rows: Vec<(String, String)> =
                table.rows.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
            out.push_str(&format_table(x, y, &rows));
            if let Some(size) = plot {
                let bars: Vec<(String, f64)> =
                    table.rows.iter().map(|(k, v)| (k.clone(), *v as f64)).collect();
                out.push('\n');
                out.push_str(&plot::render_bar_chart(&bars, size.width, |v| format!("{v:.0}")));
            }
        }
        PanelData::Monthly(table) => {
            let rows: Vec<(String, String)> =
                table.rows.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
            out.push_str(&format_table(x, y, &rows));
            if let Some(size) = plot {
                out.push('\n');
                out.push_str(&plot::render_monthly_plot(table, size.width, size.height));
            }
        }
        PanelData::Scatter(points) => {
            out.push_str(&format!("{} trips ({x} vs {y})\n", points.len()));
            if let Some(size) = plot {
                out.push('\n');
                out.push_str(&plot::render_cost_duration_plot(points, size.width, size.height));
            }
        }
        PanelData::Label(_) | PanelData::Amount(_) => {
            out.push_str(&format_scalar(&panel.data));
            out.push('\n');
        }
    }

    out
}

fn format_table(key_header: &str, value_header: &str, rows: &[(String, String)]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<KEY_WIDTH$} {:>16}", key_header, value_header).trim_end());
    out.push('\n');
    out.push_str(format!("{:-<KEY_WIDTH$} {:-<16}", "", "").trim_end());
    out.push('\n');
    for (k, v) in rows {
        out.push_str(format!("{:<KEY_WIDTH$} {:>16}", truncate(k, KEY_WIDTH), v).trim_end());
        out.push('\n');
    }
    out
}

/// Filter values available in `dataset`.
pub fn format_options(dataset: &Dataset) -> String {
    let mut out = String::new();
    match dataset.year_bounds() {
        Some((lo, hi)) => out.push_str(&format!("Years: {lo}-{hi}\n")),
        None => out.push_str(&format!("Years: {NO_DATA}\n")),
    }
    out.push_str(&format!("Records: {}\n", dataset.len()));

    out.push_str("\nDestinations:\n");
    for d in dataset.destinations() {
        out.push_str(&format!("  {d}\n"));
    }
    out.push_str("\nTransportation types:\n");
    for t in dataset.transportation_types() {
        out.push_str(&format!("  {t}\n"));
    }
    out
}

/// Shorten `s` to at most `max` characters, marking the cut with `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NavigationState, TripRecord};
    use crate::filter::FilteredView;
    use crate::views;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let trip = |destination: &str, transport: &str, day: u32, acc: f64, tr: f64| {
            let start = NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
            let end = NaiveDate::from_ymd_opt(2023, 1, day + 3).unwrap();
            TripRecord {
                line: 0,
                destination: destination.to_string(),
                transportation_type: transport.to_string(),
                start_date: start,
                end_date: end,
                traveler_name: None,
                traveler_nationality: "Korean".to_string(),
                accommodation_cost: acc,
                transportation_cost: tr,
                duration_days: 3,
            }
        };
        Dataset::new(vec![
            trip("Paris", "Airplane", 1, 100.0, 50.0),
            trip("Paris", "Car", 5, 200.0, 20.0),
        ])
    }

    fn report_for(ds: &Dataset, nav: NavigationState) -> ViewReport {
        let view = FilteredView::from_records(ds.records().iter().collect());
        views::evaluate(nav, &views::select(nav), &view)
    }

    #[test]
    fn overview_golden_snapshot() {
        let ds = dataset();
        let report = report_for(&ds, NavigationState::Overview);
        let txt = format_view(&report, &FilterCriteria::full_range(&ds), None);
        let expected = concat!(
            "=== Travel Pattern Analysis - Overview ===\n",
            "Filters: years 2023-2023 | destination: All | transport: All\n",
            "Matched records: 2\n",
            "\n",
            "Key Metrics:\n",
            "- Most Traveled Destination: Paris\n",
            "- Most Used Transportation: Airplane\n",
            "- Avg. Accommodation Cost: $150.00\n",
            "- Avg. Transportation Cost: $35.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn what_to_avoid_tables() {
        let ds = dataset();
        let report = report_for(&ds, NavigationState::WhatToAvoid);
        let txt = format_view(&report, &FilterCriteria::full_range(&ds), None);
        let expected_tail = concat!(
            "Least Popular Destinations\n",
            "Destination                        Visits\n",
            "------------------------ ----------------\n",
            "Paris                                   2\n",
            "\n",
            "High-Cost Transportation\n",
            "Transportation Type      Average Cost ($)\n",
            "------------------------ ----------------\n",
            "Airplane                            50.00\n",
            "Car                                 20.00\n",
        );
        assert!(txt.ends_with(expected_tail), "{txt}");
    }

    #[test]
    fn empty_view_prints_placeholders() {
        let ds = Dataset::default();
        let report = report_for(&ds, NavigationState::Overview);
        let txt = format_view(&report, &FilterCriteria::full_range(&ds), None);
        assert!(txt.contains("- Most Traveled Destination: No Data\n"));
        assert!(txt.contains("- Avg. Transportation Cost: No Data\n"));

        let report = report_for(&ds, NavigationState::Trends);
        let txt = format_view(&report, &FilterCriteria::full_range(&ds), Some(PlotSize { width: 40, height: 8 }));
        assert!(txt.contains(&no_data_message("Monthly Travel Trends")));
    }

    #[test]
    fn plots_follow_tables_when_enabled() {
        let ds = dataset();
        let report = report_for(&ds, NavigationState::WhereToVisit);
        let txt = format_view(&report, &FilterCriteria::full_range(&ds), Some(PlotSize { width: 40, height: 6 }));
        assert!(txt.contains("2 trips (Trip Duration (Days) vs Total Travel Cost ($))\n"));
        assert!(txt.contains("Duration (days) vs total cost: "));
        assert!(txt.contains('#'));
    }

    #[test]
    fn options_lists_dataset_values() {
        let txt = format_options(&dataset());
        assert!(txt.starts_with("Years: 2023-2023\nRecords: 2\n"));
        assert!(txt.contains("  Paris\n"));
        assert!(txt.contains("  Car\n"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Paris", 10), "Paris");
        assert_eq!(truncate("Amsterdam, Netherlands", 10), "Amsterdam.");
    }
}
