//! Shared pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! cached load -> criteria -> filter -> view selection -> evaluation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::cli::FilterArgs;
use crate::domain::{Dataset, DestinationFilter, FilterCriteria, NavigationState, TransportFilter, YearRange};
use crate::error::AppError;
use crate::filter::{self, FilteredView};
use crate::stats::OverviewMetrics;
use crate::views::{self, ViewReport};

/// Filter selections as entered by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInput {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub destination: String,
    pub transport: Vec<String>,
}

impl From<&FilterArgs> for FilterInput {
    fn from(args: &FilterArgs) -> Self {
        Self {
            year_from: args.year_from,
            year_to: args.year_to,
            destination: args.destination.clone(),
            transport: args.transport.clone(),
        }
    }
}

/// Validate user input against the dataset and build the criteria.
///
/// Missing year bounds default to the dataset's own bounds.
pub fn build_criteria(dataset: &Dataset, input: &FilterInput) -> Result<FilterCriteria, AppError> {
    let (lo, hi) = dataset.year_bounds().unwrap_or((0, 0));
    let year_range = YearRange::new(input.year_from.unwrap_or(lo), input.year_to.unwrap_or(hi))?;

    Ok(FilterCriteria {
        year_range,
        destination: DestinationFilter::from_label(input.destination.trim()),
        transportation: TransportFilter::from_labels(input.transport.iter().map(|t| t.trim())),
    })
}

/// All computed outputs of a single pipeline pass.
#[derive(Debug, Clone)]
pub struct RunOutput<'a> {
    pub criteria: FilterCriteria,
    pub view: FilteredView<'a>,
    pub metrics: OverviewMetrics,
    pub report: ViewReport,
}

/// Filter, select and evaluate one page.
pub fn run_view<'a>(
    dataset: &'a Dataset,
    criteria: FilterCriteria,
    navigation: NavigationState,
) -> RunOutput<'a> {
    let start_time = Instant::now();
    let view = filter::apply(dataset, &criteria);
    let metrics = OverviewMetrics::compute(&view);
    let calls = views::select(navigation);
    let report = views::evaluate(navigation, &calls, &view);

    info!(
        action = "run_view",
        component = "pipeline",
        view = navigation.display_name(),
        matched = view.len(),
        total = dataset.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Pipeline pass complete"
    );

    RunOutput {
        criteria,
        view,
        metrics,
        report,
    }
}

/// Load the process-wide dataset (cached) for `path`.
pub fn load(path: &Path) -> Result<&'static Dataset, AppError> {
    Ok(crate::io::cache::shared_dataset(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripRecord;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let record = |destination: &str, year: i32| {
            let d = NaiveDate::from_ymd_opt(year, 4, 1).unwrap();
            TripRecord {
                line: 0,
                destination: destination.to_string(),
                transportation_type: "Train".to_string(),
                start_date: d,
                end_date: d,
                traveler_name: None,
                traveler_nationality: "German".to_string(),
                accommodation_cost: 300.0,
                transportation_cost: 100.0,
                duration_days: 0,
            }
        };
        Dataset::new(vec![record("Paris", 2021), record("Rome", 2023)])
    }

    fn input() -> FilterInput {
        FilterInput {
            year_from: None,
            year_to: None,
            destination: "All".to_string(),
            transport: vec!["All".to_string()],
        }
    }

    #[test]
    fn missing_years_default_to_dataset_bounds() {
        let ds = dataset();
        let c = build_criteria(&ds, &input()).unwrap();
        assert_eq!((c.year_range.min(), c.year_range.max()), (2021, 2023));
        assert_eq!(c, FilterCriteria::full_range(&ds));
    }

    #[test]
    fn inverted_years_are_rejected() {
        let ds = dataset();
        let err = build_criteria(
            &ds,
            &FilterInput {
                year_from: Some(2024),
                year_to: Some(2022),
                ..input()
            },
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn run_view_filters_and_evaluates() {
        let ds = dataset();
        let criteria = build_criteria(
            &ds,
            &FilterInput {
                destination: "Rome".to_string(),
                ..input()
            },
        )
        .unwrap();
        let run = run_view(&ds, criteria, NavigationState::Overview);

        assert_eq!(run.view.len(), 1);
        assert_eq!(run.report.matched_records, 1);
        assert_eq!(run.report.panels.len(), 4);
        assert_eq!(run.metrics.most_traveled_destination.to_string(), "Rome");
    }
}
