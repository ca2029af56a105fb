//! Player × stat table.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Integer scores keyed by player name (rows) and stat label (columns).
///
/// Every lookup is defined: a player or column that was never recorded
/// reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatTable {
    players: BTreeSet<String>,
    columns: BTreeSet<String>,
    cells: BTreeMap<String, BTreeMap<String, i64>>,
    identifiers: BTreeSet<String>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `score` to the (player, column) cell, saturating at the i64 bounds.
    pub fn add(&mut self, player: &str, column: &str, score: i64) {
        self.players.insert(player.to_string());
        self.columns.insert(column.to_string());
        let cell = self
            .cells
            .entry(player.to_string())
            .or_default()
            .entry(column.to_string())
            .or_insert(0);
        *cell = cell.saturating_add(score);
    }

    /// Register a player row without any recorded values.
    pub fn insert_player(&mut self, player: &str) {
        self.players.insert(player.to_string());
    }

    /// Record a raw stat identifier that contributed to this table.
    pub fn record_identifier(&mut self, identifier: &str) {
        self.identifiers.insert(identifier.to_string());
    }

    /// Add or replace a column, computing each player's value with `f`.
    pub fn set_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(&Self, &str) -> i64,
    {
        let this: &Self = self;
        let values: Vec<(String, i64)> = this
            .players
            .iter()
            .map(|p| (p.clone(), f(this, p)))
            .collect();

        self.columns.insert(column.to_string());
        for (player, value) in values {
            self.cells
                .entry(player)
                .or_default()
                .insert(column.to_string(), value);
        }
    }

    /// Cell value, zero when absent.
    pub fn get(&self, player: &str, column: &str) -> i64 {
        self.cells
            .get(player)
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.players.contains(player)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Arithmetic mean of `column` over all players, 0.0 for an empty table.
    pub fn column_mean(&self, column: &str) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        let total: i128 = self.players().map(|p| i128::from(self.get(p, column))).sum();
        total as f64 / self.players.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let mut table = StatTable::new();
        table.add("Alice", "Points", 10);
        table.add("Alice", "Points", 5);

        assert_eq!(table.get("Alice", "Points"), 15);
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let mut table = StatTable::new();
        table.add("Alice", "Points", i64::MAX);
        table.add("Alice", "Points", i64::MAX);
        table.add("Bob", "Points", i64::MIN);
        table.add("Bob", "Points", -1);

        assert_eq!(table.get("Alice", "Points"), i64::MAX);
        assert_eq!(table.get("Bob", "Points"), i64::MIN);
    }

    #[test]
    fn test_column_mean_of_extreme_values() {
        let mut table = StatTable::new();
        table.add("Alice", "Points", i64::MAX);
        table.add("Bob", "Points", i64::MAX);

        assert_eq!(table.column_mean("Points"), i64::MAX as f64);
    }

    #[test]
    fn test_missing_cells_are_zero() {
        let mut table = StatTable::new();
        table.add("Alice", "Points", 10);
        table.add("Bob", "Waves", 3);

        assert_eq!(table.get("Bob", "Points"), 0);
        assert_eq!(table.get("Alice", "Waves"), 0);
        assert_eq!(table.get("Nobody", "Points"), 0);
        assert_eq!(table.get("Alice", "No Such Stat"), 0);
    }

    #[test]
    fn test_set_column_covers_every_player() {
        let mut table = StatTable::new();
        table.add("Alice", "A", 1);
        table.add("Alice", "B", 2);
        table.add("Bob", "A", 4);

        table.set_column("A+B", |t, p| t.get(p, "A") + t.get(p, "B"));

        assert!(table.has_column("A+B"));
        assert_eq!(table.get("Alice", "A+B"), 3);
        assert_eq!(table.get("Bob", "A+B"), 4);
    }

    #[test]
    fn test_column_mean() {
        let mut table = StatTable::new();
        table.add("Alice", "Points", 10);
        table.add("Bob", "Points", 5);
        table.insert_player("Carol");

        assert!((table.column_mean("Points") - 5.0).abs() < f64::EPSILON);
        assert_eq!(table.column_mean("Missing"), 0.0);
    }

    #[test]
    fn test_column_mean_empty_table_is_zero() {
        let table = StatTable::new();
        let mean = table.column_mean("Points");
        assert_eq!(mean, 0.0);
        assert!(!mean.is_nan());
    }
}
