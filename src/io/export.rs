//! Export filtered records to CSV and view reports to JSON.
//!
//! The CSV export is meant to be easy to consume in spreadsheets or downstream
//! scripts; it uses the source column names plus the two derived columns.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::domain::{FilterCriteria, TripRecord};
use crate::error::AppError;
use crate::filter::FilteredView;
use crate::views::ViewReport;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Destination")]
    destination: &'a str,
    #[serde(rename = "Start date")]
    start_date: NaiveDate,
    #[serde(rename = "End date")]
    end_date: NaiveDate,
    #[serde(rename = "Duration (days)")]
    duration_days: i64,
    #[serde(rename = "Traveler name")]
    traveler_name: &'a str,
    #[serde(rename = "Traveler nationality")]
    traveler_nationality: &'a str,
    #[serde(rename = "Accommodation cost")]
    accommodation_cost: f64,
    #[serde(rename = "Transportation type")]
    transportation_type: &'a str,
    #[serde(rename = "Transportation cost")]
    transportation_cost: f64,
    #[serde(rename = "Total cost")]
    total_cost: f64,
}

impl<'a> From<&'a TripRecord> for ExportRow<'a> {
    fn from(r: &'a TripRecord) -> Self {
        Self {
            destination: &r.destination,
            start_date: r.start_date,
            end_date: r.end_date,
            duration_days: r.duration_days,
            traveler_name: r.traveler_name.as_deref().unwrap_or(""),
            traveler_nationality: &r.traveler_nationality,
            accommodation_cost: r.accommodation_cost,
            transportation_type: &r.transportation_type,
            transportation_cost: r.transportation_cost,
            total_cost: r.total_cost(),
        }
    }
}

/// Write `records` as CSV to any writer.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut n = 0;
    for record in records {
        wtr.serialize(ExportRow::from(record))?;
        n += 1;
    }
    wtr.flush()?;
    Ok(n)
}

/// Write the filtered records to a CSV file.
pub fn write_records_csv(path: &Path, view: &FilteredView<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let rows = write_records(file, view.iter())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;

    info!(action = "export_csv", component = "export", rows, path = %path.display(), "Records exported");
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    tool: &'static str,
    criteria: &'a FilterCriteria,
    #[serde(flatten)]
    report: &'a ViewReport,
}

/// Write an evaluated view (with its criteria) to a JSON file.
pub fn write_report_json(path: &Path, report: &ViewReport, criteria: &FilterCriteria) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let doc = ReportFile {
        tool: "travel",
        criteria,
        report,
    };
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    info!(action = "export_json", component = "export", path = %path.display(), "Report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;
    use crate::io::ingest::read_dataset;

    fn record() -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 5, 8).unwrap();
        TripRecord {
            line: 2,
            destination: "London, UK".to_string(),
            transportation_type: "Airplane".to_string(),
            start_date: start,
            end_date: end,
            traveler_name: Some("John Smith".to_string()),
            traveler_nationality: "American".to_string(),
            accommodation_cost: 1200.0,
            transportation_cost: 600.5,
            duration_days: 7,
        }
    }

    #[test]
    fn csv_has_source_headers_and_derived_columns() {
        let r = record();
        let mut buf = Vec::new();
        let n = write_records(&mut buf, [&r]).unwrap();
        assert_eq!(n, 1);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Destination,Start date,End date,Duration (days),Traveler name,Traveler nationality,\
             Accommodation cost,Transportation type,Transportation cost,Total cost"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"London, UK\",2023-05-01,2023-05-08,7,John Smith,American,1200.0,Airplane,600.5,1800.5"
        );
    }

    #[test]
    fn exported_csv_loads_back() {
        let r = record();
        let mut buf = Vec::new();
        write_records(&mut buf, [&r]).unwrap();

        let (ds, _) = read_dataset(buf.as_slice()).unwrap();
        assert_eq!(ds.len(), 1);
        let back = &ds.records()[0];
        assert_eq!(back.destination, r.destination);
        assert_eq!(back.start_date, r.start_date);
        assert_eq!(back.total_cost(), r.total_cost());
        assert_eq!(back.duration_days, 7);
    }

    #[test]
    fn empty_view_writes_no_rows() {
        let ds = Dataset::default();
        let mut buf = Vec::new();
        let n = write_records(&mut buf, ds.records()).unwrap();
        assert_eq!(n, 0);
    }
}
