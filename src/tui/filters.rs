//! Filter widget state for the dashboard sidebar.

use std::collections::BTreeSet;

use crate::app::pipeline::FilterInput;
use crate::domain::{ALL, Dataset, FilterCriteria, TransportFilter};

/// The four sidebar widgets, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    YearFrom,
    YearTo,
    Destination,
    Transport,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::YearFrom,
        FilterField::YearTo,
        FilterField::Destination,
        FilterField::Transport,
    ];

    pub fn index(self) -> usize {
        match self {
            FilterField::YearFrom => 0,
            FilterField::YearTo => 1,
            FilterField::Destination => 2,
            FilterField::Transport => 3,
        }
    }
}

/// Current widget values plus the choices offered by the dataset.
///
/// `year_from <= year_to` holds after every adjustment. Transportation is a
/// multi-select: the cursor walks the choices and [`FilterState::toggle`]
/// flips the one under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    bounds: (i32, i32),
    destinations: Vec<String>,
    transports: Vec<String>,
    pub year_from: i32,
    pub year_to: i32,
    destination: usize,
    transport_cursor: usize,
    transportation: TransportFilter,
    pub selected: FilterField,
}

fn with_all(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.insert(0, ALL.to_string());
    values
}

/// Index of `label` in a `with_all` list, inserting it in sorted position
/// when the dataset does not offer it.
fn position_or_insert(values: &mut Vec<String>, label: &str) -> usize {
    if label == ALL {
        return 0;
    }
    match values[1..].binary_search_by(|v| v.as_str().cmp(label)) {
        Ok(i) => i + 1,
        Err(i) => {
            values.insert(i + 1, label.to_string());
            i + 1
        }
    }
}

fn cycle(index: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (index as i64 + delta as i64).rem_euclid(len) as usize
}

impl FilterState {
    pub fn new(dataset: &Dataset) -> Self {
        let bounds = dataset.year_bounds().unwrap_or((0, 0));
        Self {
            bounds,
            destinations: with_all(dataset.destinations()),
            transports: with_all(dataset.transportation_types()),
            year_from: bounds.0,
            year_to: bounds.1,
            destination: 0,
            transport_cursor: 0,
            transportation: TransportFilter::All,
            selected: FilterField::YearFrom,
        }
    }

    /// Start from criteria given on the command line.
    ///
    /// Years outside the dataset widen the slider bounds. Labels the dataset
    /// does not contain are added to the choices, so `to_input` rebuilds the
    /// same criteria.
    pub fn from_criteria(dataset: &Dataset, criteria: &FilterCriteria) -> Self {
        let mut state = Self::new(dataset);
        state.year_from = criteria.year_range.min();
        state.year_to = criteria.year_range.max();
        state.bounds = (
            state.bounds.0.min(state.year_from),
            state.bounds.1.max(state.year_to),
        );

        let wanted = criteria.destination.label().to_string();
        state.destination = position_or_insert(&mut state.destinations, &wanted);

        if let TransportFilter::Only(set) = &criteria.transportation {
            for label in set {
                position_or_insert(&mut state.transports, label);
            }
        }
        state.transportation = criteria.transportation.clone();
        state
    }

    pub fn destination(&self) -> &str {
        self.destinations.get(self.destination).map_or(ALL, String::as_str)
    }

    /// Choice under the transportation cursor.
    pub fn transport_cursor(&self) -> &str {
        self.transports.get(self.transport_cursor).map_or(ALL, String::as_str)
    }

    pub fn transportation(&self) -> &TransportFilter {
        &self.transportation
    }

    fn is_checked(&self, label: &str) -> bool {
        match &self.transportation {
            TransportFilter::All => true,
            TransportFilter::Only(set) => set.contains(label),
        }
    }

    pub fn select_next(&mut self) {
        let i = (self.selected.index() + 1).min(FilterField::ALL.len() - 1);
        self.selected = FilterField::ALL[i];
    }

    pub fn select_prev(&mut self) {
        let i = self.selected.index().saturating_sub(1);
        self.selected = FilterField::ALL[i];
    }

    /// Move the selected widget by `delta` steps.
    pub fn adjust(&mut self, delta: i32) {
        let (lo, hi) = self.bounds;
        match self.selected {
            FilterField::YearFrom => {
                self.year_from = (self.year_from + delta).max(lo).min(self.year_to);
            }
            FilterField::YearTo => {
                self.year_to = (self.year_to + delta).min(hi).max(self.year_from);
            }
            FilterField::Destination => {
                self.destination = cycle(self.destination, self.destinations.len(), delta);
            }
            FilterField::Transport => {
                self.transport_cursor = cycle(self.transport_cursor, self.transports.len(), delta);
            }
        }
    }

    /// Flip the transportation choice under the cursor.
    ///
    /// "All" switches between every type and none. Unchecking a type while
    /// everything is selected keeps the others; checking the last missing
    /// type goes back to "All".
    pub fn toggle(&mut self) {
        let label = self.transport_cursor().to_string();
        let types = &self.transports[1..];
        self.transportation = match (&self.transportation, label == ALL) {
            (TransportFilter::All, true) => TransportFilter::Only(BTreeSet::new()),
            (TransportFilter::Only(_), true) => TransportFilter::All,
            (TransportFilter::All, false) => {
                TransportFilter::from_labels(types.iter().filter(|t| **t != label).cloned())
            }
            (TransportFilter::Only(set), false) => {
                let mut set = set.clone();
                if !set.remove(&label) {
                    set.insert(label);
                }
                if types.iter().all(|t| set.contains(t)) {
                    TransportFilter::All
                } else {
                    TransportFilter::Only(set)
                }
            }
        };
    }

    /// Back to the full dataset.
    pub fn reset(&mut self) {
        self.year_from = self.bounds.0;
        self.year_to = self.bounds.1;
        self.destination = 0;
        self.transport_cursor = 0;
        self.transportation = TransportFilter::All;
    }

    pub fn to_input(&self) -> FilterInput {
        let transport = match &self.transportation {
            TransportFilter::All => vec![ALL.to_string()],
            TransportFilter::Only(set) => set.iter().cloned().collect(),
        };
        FilterInput {
            year_from: Some(self.year_from),
            year_to: Some(self.year_to),
            destination: self.destination().to_string(),
            transport,
        }
    }

    /// Sidebar rows, in `FilterField::ALL` order.
    pub fn rows(&self) -> Vec<String> {
        let cursor = self.transport_cursor();
        let mark = if self.is_checked(cursor) { 'x' } else { ' ' };
        vec![
            format!("From year:   {}", self.year_from),
            format!("To year:     {}", self.year_to),
            format!("Destination: {}", self.destination()),
            format!("Transport:   [{mark}] {cursor} ({})", self.transportation.label()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_criteria;
    use crate::domain::TripRecord;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let trip = |destination: &str, transport: &str, year: i32| {
            let d = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            TripRecord {
                line: 0,
                destination: destination.to_string(),
                transportation_type: transport.to_string(),
                start_date: d,
                end_date: d,
                traveler_name: None,
                traveler_nationality: "French".to_string(),
                accommodation_cost: 1.0,
                transportation_cost: 1.0,
                duration_days: 0,
            }
        };
        Dataset::new(vec![
            trip("Tokyo", "Train", 2021),
            trip("Paris", "Airplane", 2023),
        ])
    }

    #[test]
    fn starts_at_full_range_and_all() {
        let state = FilterState::new(&dataset());
        let input = state.to_input();
        assert_eq!((input.year_from, input.year_to), (Some(2021), Some(2023)));
        assert_eq!(input.destination, ALL);
        assert_eq!(input.transport, vec![ALL]);
    }

    #[test]
    fn years_never_cross() {
        let mut state = FilterState::new(&dataset());
        state.selected = FilterField::YearFrom;
        state.adjust(5);
        assert_eq!(state.year_from, 2023);

        state.selected = FilterField::YearTo;
        state.adjust(-1);
        assert_eq!(state.year_to, 2023);

        state.selected = FilterField::YearFrom;
        state.adjust(-10);
        assert_eq!(state.year_from, 2021);
    }

    #[test]
    fn destination_cycles_through_sorted_choices() {
        let mut state = FilterState::new(&dataset());
        state.selected = FilterField::Destination;
        state.adjust(1);
        assert_eq!(state.destination(), "Paris");
        state.adjust(1);
        assert_eq!(state.destination(), "Tokyo");
        state.adjust(1);
        assert_eq!(state.destination(), ALL);
        state.adjust(-1);
        assert_eq!(state.destination(), "Tokyo");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = FilterState::new(&dataset());
        state.selected = FilterField::Transport;
        state.adjust(1);
        state.selected = FilterField::YearTo;
        state.adjust(-1);
        state.reset();
        assert_eq!(state.to_input(), FilterState::new(&dataset()).to_input());
    }

    #[test]
    fn from_criteria_positions_widgets() {
        let ds = dataset();
        let criteria = FilterCriteria {
            year_range: crate::domain::YearRange::new(2022, 2023).unwrap(),
            destination: crate::domain::DestinationFilter::from_label("Tokyo"),
            transportation: TransportFilter::from_labels(["Train"]),
        };
        let state = FilterState::from_criteria(&ds, &criteria);
        assert_eq!(state.year_from, 2022);
        assert_eq!(state.destination(), "Tokyo");
        assert_eq!(state.transportation(), &TransportFilter::from_labels(["Train"]));
    }

    #[test]
    fn command_line_years_outside_dataset_widen_bounds() {
        let ds = dataset();
        let input = FilterInput {
            year_from: Some(2018),
            year_to: Some(2019),
            destination: ALL.to_string(),
            transport: vec![ALL.to_string()],
        };
        let criteria = build_criteria(&ds, &input).unwrap();
        let mut state = FilterState::from_criteria(&ds, &criteria);

        state.selected = FilterField::YearFrom;
        state.adjust(1);
        assert_eq!(state.year_from, 2019);
        state.adjust(-5);
        assert_eq!(state.year_from, 2018);

        state.selected = FilterField::YearTo;
        state.adjust(10);
        assert_eq!(state.year_to, 2023);
    }

    #[test]
    fn command_line_criteria_survive_the_dashboard() {
        let ds = dataset();
        let input = FilterInput {
            year_from: Some(2022),
            year_to: Some(2023),
            destination: "Lisbon".to_string(),
            transport: vec!["Train".to_string(), "Bus".to_string()],
        };
        let criteria = build_criteria(&ds, &input).unwrap();
        let state = FilterState::from_criteria(&ds, &criteria);

        assert_eq!(state.destination(), "Lisbon");
        assert_eq!(build_criteria(&ds, &state.to_input()).unwrap(), criteria);
    }

    #[test]
    fn toggling_transport_choices() {
        let mut state = FilterState::new(&dataset());
        state.selected = FilterField::Transport;
        state.adjust(1);
        assert_eq!(state.transport_cursor(), "Airplane");

        state.toggle();
        assert_eq!(state.transportation(), &TransportFilter::from_labels(["Train"]));
        assert_eq!(state.rows()[3], "Transport:   [ ] Airplane (Train)");

        state.toggle();
        assert_eq!(state.transportation(), &TransportFilter::All);

        state.adjust(-1);
        state.toggle();
        assert_eq!(state.transportation(), &TransportFilter::Only(BTreeSet::new()));
        assert_eq!(state.to_input().transport, Vec::<String>::new());

        state.toggle();
        assert_eq!(state.transportation(), &TransportFilter::All);
    }

    #[test]
    fn selection_stops_at_ends() {
        let mut state = FilterState::new(&dataset());
        state.select_prev();
        assert_eq!(state.selected, FilterField::YearFrom);
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected, FilterField::Transport);
    }
}
