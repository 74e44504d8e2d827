//! Transportation label normalization.
//!
//! The source data spells the same mode several ways ("Flight", "Plane",
//! "Car rental"). The table below folds them onto one canonical label.
//! Matching is exact and case-sensitive; anything not in the table is kept
//! verbatim, so the output vocabulary stays open.

use std::collections::BTreeMap;
use std::sync::LazyLock;

static TRANSPORT_LABELS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("Airplane", "Airplane"),
        ("Flight", "Airplane"),
        ("Plane", "Airplane"),
        ("Car", "Car"),
        ("Car rental", "Car"),
        ("Bus", "Bus"),
        ("Train", "Train"),
        ("Ferry", "Ferry"),
        ("Subway", "Subway"),
    ])
});

/// Map a raw transportation label to its canonical form.
#[must_use]
pub fn normalize(raw_label: &str) -> &str {
    match TRANSPORT_LABELS.get(raw_label) {
        Some(canonical) => *canonical,
        None => raw_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_air_synonyms() {
        assert_eq!(normalize("Flight"), "Airplane");
        assert_eq!(normalize("Plane"), "Airplane");
        assert_eq!(normalize("Airplane"), "Airplane");
    }

    #[test]
    fn folds_car_rental() {
        assert_eq!(normalize("Car rental"), "Car");
        assert_eq!(normalize("Car"), "Car");
    }

    #[test]
    fn unmapped_labels_pass_through() {
        assert_eq!(normalize("Unknown Mode"), "Unknown Mode");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(normalize("flight"), "flight");
        assert_eq!(normalize("CAR RENTAL"), "CAR RENTAL");
    }

    #[test]
    fn canonical_labels_are_fixed_points() {
        for canonical in TRANSPORT_LABELS.values() {
            assert_eq!(normalize(canonical), *canonical);
        }
    }
}
