//! Metric history across snapshots.

use tracing::debug;

use super::build_augmented_table;
use crate::models::{HistoryRecord, NameMap, PhaseRange, Snapshot, GUILD_AVERAGE};

/// Long-form series of every requested player × metric at every snapshot.
///
/// Always yields `snapshots × players × metrics` records, in ascending date
/// order. Absent values are zero; "Guild Average" is the mean over the
/// snapshot's real players.
pub fn project_history(
    snapshots: &[Snapshot],
    players: &[String],
    metrics: &[String],
    names: &NameMap,
    phases: PhaseRange,
) -> Vec<HistoryRecord> {
    let mut records = Vec::with_capacity(snapshots.len() * players.len() * metrics.len());

    for snapshot in snapshots {
        let table = build_augmented_table(snapshot, names, phases);
        if table.is_empty() {
            debug!("{}: no stat data, emitting zeros", snapshot.date);
        }

        for player in players {
            for metric in metrics {
                let value = if player == GUILD_AVERAGE {
                    table.column_mean(metric)
                } else {
                    table.get(player, metric) as f64
                };
                records.push(HistoryRecord::new(snapshot.date, player, metric, value));
            }
        }
    }

    records.sort_by_key(|r| r.date);
    records
}
