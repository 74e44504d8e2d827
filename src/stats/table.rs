//! Small ordered result tables.
//!
//! Every grouped aggregate produces an [`AggregateTable`]: an ordered list of
//! `(key, value)` rows that a chart consumes as-is. Truncation helpers never
//! re-sort; they rely on the order the producing aggregate established.

use std::cmp::Ordering;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable<K, V> {
    pub rows: Vec<(K, V)>,
}

impl<K, V> Default for AggregateTable<K, V> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<K, V> AggregateTable<K, V> {
    pub fn new(rows: Vec<(K, V)>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.iter().map(|(_, v)| v)
    }
}

/// The first `n` rows (the whole table when it is shorter).
pub fn top_n<K: Clone, V: Clone>(table: &AggregateTable<K, V>, n: usize) -> AggregateTable<K, V> {
    AggregateTable::new(table.rows.iter().take(n).cloned().collect())
}

/// The last `n` rows, kept in table order.
pub fn bottom_n<K: Clone, V: Clone>(table: &AggregateTable<K, V>, n: usize) -> AggregateTable<K, V> {
    let skip = table.rows.len().saturating_sub(n);
    AggregateTable::new(table.rows[skip..].to_vec())
}

/// Stable re-order by value, largest first.
pub fn sort_descending<K: Clone, V: PartialOrd + Clone>(
    table: &AggregateTable<K, V>,
) -> AggregateTable<K, V> {
    let mut rows = table.rows.clone();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    AggregateTable::new(rows)
}
