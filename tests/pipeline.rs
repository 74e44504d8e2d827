use travel_insights::app::pipeline::{FilterInput, build_criteria, run_view};
use travel_insights::domain::{Dataset, Metric, NavigationState};
use travel_insights::io::ingest::read_dataset;
use travel_insights::report::{PlotSize, format_view};
use travel_insights::views::PanelData;

fn sample() -> Dataset {
    let bytes = include_bytes!("fixtures/travel_sample.csv");
    let (dataset, summary) = read_dataset(&bytes[..]).expect("fixture should load");
    assert_eq!(summary.rows_skipped, 1);
    dataset
}

fn input(from: Option<i32>, to: Option<i32>, destination: &str, transport: &[&str]) -> FilterInput {
    FilterInput {
        year_from: from,
        year_to: to,
        destination: destination.to_string(),
        transport: transport.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn loads_and_normalizes_fixture() {
    let ds = sample();
    assert_eq!(ds.len(), 10);
    assert_eq!(ds.year_bounds(), Some((2023, 2024)));

    let types = ds.transportation_types();
    assert_eq!(types, vec!["Airplane", "Train", "Car", "Bus"]);

    // "$1,200" and an empty cell coerce to zero.
    assert_eq!(ds.records()[8].accommodation_cost, 0.0);
    assert_eq!(ds.records()[9].transportation_cost, 0.0);
}

#[test]
fn overview_for_2023_airplanes() {
    let ds = sample();
    let criteria = build_criteria(&ds, &input(Some(2023), Some(2023), "All", &["Airplane"])).unwrap();
    let run = run_view(&ds, criteria, NavigationState::Overview);

    assert_eq!(run.view.len(), 4);
    assert_eq!(run.metrics.most_used_transportation, Metric::Value("Airplane".to_string()));
    assert_eq!(run.metrics.avg_accommodation_cost, Metric::Value(1250.0));
    assert_eq!(run.metrics.avg_transportation_cost, Metric::Value(700.0));
    // All four destinations appear once; the smallest name wins.
    assert_eq!(run.metrics.most_traveled_destination, Metric::Value("Bali, Indonesia".to_string()));
}

#[test]
fn where_to_visit_skips_zero_cost_groups() {
    let ds = sample();
    let criteria = build_criteria(&ds, &input(None, None, "All", &["All"])).unwrap();
    let run = run_view(&ds, criteria, NavigationState::WhereToVisit);

    let PanelData::Categories(affordable) = &run.report.panels[0].data else {
        panic!("expected categories");
    };
    assert_eq!(affordable.len(), 9);
    assert_eq!(affordable.rows[0].0, "Amsterdam, Netherlands");
    assert!(affordable.rows.windows(2).all(|w| w[0].1 <= w[1].1));

    let PanelData::Scatter(points) = &run.report.panels[1].data else {
        panic!("expected scatter");
    };
    assert_eq!(points.len(), 10);
}

#[test]
fn what_to_avoid_ranks_transport_costs() {
    let ds = sample();
    let criteria = build_criteria(&ds, &input(None, None, "All", &["All"])).unwrap();
    let run = run_view(&ds, criteria, NavigationState::WhatToAvoid);

    let PanelData::Categories(costly) = &run.report.panels[1].data else {
        panic!("expected categories");
    };
    let keys: Vec<&str> = costly.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Airplane", "Train", "Car", "Bus"]);
}

#[test]
fn empty_selection_renders_placeholders() {
    let ds = sample();
    let criteria = build_criteria(&ds, &input(None, None, "Atlantis", &["All"])).unwrap();
    let run = run_view(&ds, criteria, NavigationState::Trends);
    assert!(run.view.is_empty());

    let txt = format_view(&run.report, &run.criteria, Some(PlotSize { width: 60, height: 10 }));
    assert!(txt.contains("Matched records: 0"));
    assert!(txt.contains("No valid data available for Monthly Travel Trends."));
}

#[test]
fn inverted_year_range_is_an_input_error() {
    let ds = sample();
    let err = build_criteria(&ds, &input(Some(2024), Some(2023), "All", &["All"])).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}
