//! Guild summary table.

use serde::{Deserialize, Serialize};

/// One player's summary values, aligned with [`SummaryTable::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub player: String,
    pub values: Vec<i64>,
}

/// Canonical projection of a stat table onto the summary metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,

    /// Per-column mean over `rows`, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<Vec<f64>>,
}

impl SummaryTable {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn row(&self, player: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.player == player)
    }

    /// Value for (player, column), zero when either is absent.
    pub fn value(&self, player: &str, column: &str) -> i64 {
        match (self.row(player), self.column_index(column)) {
            (Some(row), Some(idx)) => row.values.get(idx).copied().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn players(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.player.as_str()).collect()
    }
}
