//! CSV ingest and normalization.
//!
//! This module is responsible for turning the travel-details CSV into a clean,
//! immutable [`Dataset`]:
//!
//! - **Strict dates**: an unparseable start/end date aborts the load
//! - **Lenient costs**: unparseable, missing or negative costs become `0.0`
//! - **Derived fields** (`duration_days`) are computed once here
//! - **Normalization**: transportation labels are canonicalized before return

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::transport;
use crate::domain::{Dataset, TripRecord};

pub const COL_DESTINATION: &str = "Destination";
pub const COL_TRANSPORTATION_TYPE: &str = "Transportation type";
pub const COL_START_DATE: &str = "Start date";
pub const COL_END_DATE: &str = "End date";
pub const COL_NATIONALITY: &str = "Traveler nationality";
pub const COL_ACCOMMODATION_COST: &str = "Accommodation cost";
pub const COL_TRANSPORTATION_COST: &str = "Transportation cost";
pub const COL_TRAVELER_NAME: &str = "Traveler name";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_DESTINATION,
    COL_TRANSPORTATION_TYPE,
    COL_START_DATE,
    COL_END_DATE,
    COL_NATIONALITY,
    COL_ACCOMMODATION_COST,
    COL_TRANSPORTATION_COST,
];

/// Date layouts accepted for `Start date` / `End date`, tried in order.
///
/// Two-digit years go first: `%Y` would otherwise read "7/4/23" as year 23.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Fatal dataset load failures.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Io { path: String, message: String },
    Csv { line: Option<u64>, message: String },
    MissingColumn(String),
    InvalidDate { line: usize, column: String, value: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => write!(f, "cannot read '{path}': {message}"),
            LoadError::Csv { line: Some(line), message } => {
                write!(f, "CSV parse error at line {line}: {message}")
            }
            LoadError::Csv { line: None, message } => write!(f, "CSV parse error: {message}"),
            LoadError::MissingColumn(column) => write!(f, "missing required column `{column}`"),
            LoadError::InvalidDate { line, column, value } => {
                write!(f, "line {line}: `{column}` value '{value}' is not a valid date")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv {
            line: err.position().map(|p| p.line()),
            message: err.to_string(),
        }
    }
}

/// Counters describing what the loader did with the raw rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub costs_coerced: usize,
    pub labels_normalized: usize,
}

/// Load the dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let start_time = Instant::now();
    info!(action = "start", component = "dataset_load", path = ?path, "Loading travel dataset");

    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let (dataset, summary) = read_dataset(file)?;

    info!(
        action = "complete",
        component = "dataset_load",
        records = dataset.len(),
        rows_read = summary.rows_read,
        rows_skipped = summary.rows_skipped,
        costs_coerced = summary.costs_coerced,
        labels_normalized = summary.labels_normalized,
        duration_ms = start_time.elapsed().as_millis(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV from any reader. Normalization is applied before returning.
pub fn read_dataset<R: Read>(reader: R) -> Result<(Dataset, LoadSummary), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(&normalize_header_name(column)) {
            return Err(LoadError::MissingColumn(column.to_string()));
        }
    }

    let mut summary = LoadSummary::default();
    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        summary.rows_read += 1;

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        if record.iter().all(str::is_empty) {
            debug!(action = "skip", component = "dataset_load", line, "Skipping blank row");
            summary.rows_skipped += 1;
            continue;
        }

        let mut trip = parse_row(&record, &header_map, line, &mut summary)?;
        let canonical = transport::normalize(&trip.transportation_type);
        if canonical != trip.transportation_type {
            trip.transportation_type = canonical.to_string();
            summary.labels_normalized += 1;
        }
        records.push(trip);
    }

    Ok((Dataset::new(records), summary))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_field<'r>(record: &'r StringRecord, header_map: &HashMap<String, usize>, column: &str) -> &'r str {
    header_map
        .get(&normalize_header_name(column))
        .and_then(|&idx| record.get(idx))
        .unwrap_or("")
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
    summary: &mut LoadSummary,
) -> Result<TripRecord, LoadError> {
    let start_date = required_date(record, header_map, COL_START_DATE, line)?;
    let end_date = required_date(record, header_map, COL_END_DATE, line)?;

    let mut cost = |column: &str| {
        let raw = get_field(record, header_map, column);
        match parse_cost(raw) {
            Some(v) => v,
            None => {
                debug!(action = "coerce", component = "dataset_load", line, column, raw, "Cost coerced to 0.0");
                summary.costs_coerced += 1;
                0.0
            }
        }
    };
    let accommodation_cost = cost(COL_ACCOMMODATION_COST);
    let transportation_cost = cost(COL_TRANSPORTATION_COST);

    let traveler_name = Some(get_field(record, header_map, COL_TRAVELER_NAME))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(TripRecord {
        line,
        destination: get_field(record, header_map, COL_DESTINATION).to_string(),
        transportation_type: get_field(record, header_map, COL_TRANSPORTATION_TYPE).to_string(),
        start_date,
        end_date,
        traveler_name,
        traveler_nationality: get_field(record, header_map, COL_NATIONALITY).to_string(),
        accommodation_cost,
        transportation_cost,
        duration_days: (end_date - start_date).num_days(),
    })
}

fn required_date(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    column: &str,
    line: usize,
) -> Result<NaiveDate, LoadError> {
    let raw = get_field(record, header_map, column);
    parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Parse a calendar date in one of the accepted layouts.
///
/// Timestamps are accepted too; the time of day is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a non-negative, finite cost. `None` means "coerce to 0.0".
pub fn parse_cost(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Trip ID,Destination,Start date,End date,Duration (days),Traveler name,Traveler age,Traveler gender,Traveler nationality,Accommodation type,Accommodation cost,Transportation type,Transportation cost\n";

    fn load(body: &str) -> Result<(Dataset, LoadSummary), LoadError> {
        let csv = format!("{HEADER}{body}");
        read_dataset(csv.as_bytes())
    }

    #[test]
    fn parses_rows_and_derives_duration() {
        let (ds, summary) = load(
            "1,\"London, UK\",5/1/2023,5/8/2023,7,John Smith,35,Male,American,Hotel,1200,Flight,600\n",
        )
        .unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(summary.rows_read, 1);
        let r = &ds.records()[0];
        assert_eq!(r.destination, "London, UK");
        assert_eq!(r.start_date, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(r.duration_days, 7);
        assert_eq!(r.accommodation_cost, 1200.0);
        assert_eq!(r.transportation_cost, 600.0);
        assert_eq!(r.traveler_name.as_deref(), Some("John Smith"));
        assert_eq!(r.line, 2);
    }

    #[test]
    fn normalizes_transportation_labels() {
        let (ds, summary) = load(concat!(
            "1,Paris,2023-01-01,2023-01-05,4,A,30,F,French,Hotel,100,Plane,50\n",
            "2,Rome,2023-02-01,2023-02-03,2,B,31,M,Italian,Hostel,80,Car rental,20\n",
            "3,Oslo,2023-03-01,2023-03-02,1,C,32,M,Norwegian,Hotel,90,Hoverboard,10\n",
        ))
        .unwrap();

        let types: Vec<&str> = ds.records().iter().map(|r| r.transportation_type.as_str()).collect();
        assert_eq!(types, vec!["Airplane", "Car", "Hoverboard"]);
        assert_eq!(summary.labels_normalized, 2);
    }

    #[test]
    fn coerces_bad_costs_to_zero() {
        let (ds, summary) = load(concat!(
            "1,Paris,2023-01-01,2023-01-05,4,A,30,F,French,Hotel,$1000,Train,\n",
            "2,Rome,2023-02-01,2023-02-03,2,B,31,M,Italian,Hostel,-5,Bus,700 USD\n",
        ))
        .unwrap();

        for r in ds.records() {
            assert_eq!(r.accommodation_cost, 0.0);
            assert_eq!(r.transportation_cost, 0.0);
        }
        assert_eq!(summary.costs_coerced, 4);
    }

    #[test]
    fn negative_duration_is_kept() {
        let (ds, _) = load("1,Paris,2023-01-10,2023-01-05,,A,30,F,French,Hotel,100,Train,50\n").unwrap();
        assert_eq!(ds.records()[0].duration_days, -5);
    }

    #[test]
    fn invalid_date_is_fatal() {
        let err = load("1,Paris,not-a-date,2023-01-05,4,A,30,F,French,Hotel,100,Train,50\n").unwrap_err();
        assert_eq!(
            err,
            LoadError::InvalidDate {
                line: 2,
                column: COL_START_DATE.to_string(),
                value: "not-a-date".to_string(),
            }
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let (ds, summary) = load(concat!(
            "1,Paris,2023-01-01,2023-01-05,4,A,30,F,French,Hotel,100,Train,50\n",
            ",,,,,,,,,,,,\n",
        ))
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(summary.rows_skipped, 1);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_dataset("Destination,Start date\nParis,2023-01-01\n".as_bytes()).unwrap_err();
        assert_eq!(err, LoadError::MissingColumn(COL_TRANSPORTATION_TYPE.to_string()));
    }

    #[test]
    fn headers_match_case_insensitively_with_bom() {
        let csv = concat!(
            "\u{feff}destination,TRANSPORTATION TYPE,start date,end date,traveler nationality,accommodation cost,transportation cost\n",
            "Paris,Flight,2023-01-01,2023-01-02,French,10,20\n",
        );
        let (ds, _) = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].transportation_type, "Airplane");
        assert_eq!(ds.records()[0].traveler_name, None);
    }

    #[test]
    fn date_formats() {
        let want = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        assert_eq!(parse_date("7/4/2023"), Some(want));
        assert_eq!(parse_date("2023-07-04"), Some(want));
        assert_eq!(parse_date("2023/07/04"), Some(want));
        assert_eq!(parse_date("7/4/23"), Some(want));
        assert_eq!(parse_date("2023-07-04 13:45:00"), Some(want));
        assert_eq!(parse_date("2023-07-04T13:45:00Z"), Some(want));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("13/45/2023"), None);
    }

    #[test]
    fn cost_parsing() {
        assert_eq!(parse_cost(" 12.5 "), Some(12.5));
        assert_eq!(parse_cost("0"), Some(0.0));
        assert_eq!(parse_cost("NaN"), None);
        assert_eq!(parse_cost("inf"), None);
        assert_eq!(parse_cost("1,200"), None);
    }
}
