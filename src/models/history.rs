//! Long-form metric history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One metric value for one player (or the guild average) at one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    pub player: String,
    pub metric: String,
    pub value: f64,
}

impl HistoryRecord {
    pub fn new(date: NaiveDate, player: &str, metric: &str, value: f64) -> Self {
        Self {
            date,
            player: player.to_string(),
            metric: metric.to_string(),
            value,
        }
    }

    /// Chart-axis date label, `DD-MM-YY`.
    pub fn date_label(&self) -> String {
        self.date.format("%d-%m-%y").to_string()
    }
}
