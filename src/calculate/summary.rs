//! Guild summary projection.

use std::cmp::Ordering;

use crate::models::{PhaseRange, StatTable, SummaryRow, SummaryTable};

/// Project `table` onto the summary columns.
///
/// All columns are present, zero-filled. Rows are sorted descending by
/// `sort_metric` (when it is a summary column), then by player name.
pub fn summarize(
    table: &StatTable,
    phases: PhaseRange,
    sort_metric: &str,
    include_average: bool,
) -> SummaryTable {
    let columns = phases.summary_columns();

    let mut rows: Vec<SummaryRow> = table
        .players()
        .map(|player| SummaryRow {
            player: player.to_string(),
            values: columns.iter().map(|c| table.get(player, c)).collect(),
        })
        .collect();

    let sort_idx = columns.iter().position(|c| c == sort_metric);
    rows.sort_by(|a, b| {
        let by_metric = match sort_idx {
            Some(idx) => b.values[idx].cmp(&a.values[idx]),
            None => Ordering::Equal,
        };
        by_metric.then_with(|| a.player.cmp(&b.player))
    });

    let average = include_average.then(|| column_means(&rows, columns.len()));

    SummaryTable {
        columns,
        rows,
        average,
    }
}

fn column_means(rows: &[SummaryRow], width: usize) -> Vec<f64> {
    if rows.is_empty() {
        return vec![0.0; width];
    }
    (0..width)
        .map(|idx| {
            let total: i128 = rows.iter().map(|r| i128::from(r.values[idx])).sum();
            total as f64 / rows.len() as f64
        })
        .collect()
}
