//! Statistics calculation engine.
//!
//! Turns snapshot documents into derived views:
//! - Player × stat tables with phase-range totals
//! - The guild summary table
//! - The special mission status grid
//! - Metric history across snapshots
//! - Conflict zone star progress

pub mod history;
pub mod status;
pub mod summary;
pub mod zones;

pub use history::project_history;
pub use status::classify_missions;
pub use summary::summarize;
pub use zones::zone_progress;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{NameMap, PhaseRange, Snapshot, StatTable, GUILD_AVERAGE};

/// Row name for a listed member.
///
/// A member literally named "Guild Average" would collide with the synthetic
/// average row, so it gets a distinct name.
pub fn player_row_name(name: &str) -> String {
    if name == GUILD_AVERAGE {
        format!("{} (member)", name)
    } else {
        name.to_string()
    }
}

/// Flatten a snapshot's stat groups into a player × stat-label table.
///
/// Member ids are resolved through the snapshot's own member list and
/// records for ids missing from it are dropped. Every listed member gets a
/// row, even without records. Row names go through [`player_row_name`].
pub fn build_stat_table(snapshot: &Snapshot, names: &NameMap) -> StatTable {
    let doc = &snapshot.document;
    let mut table = StatTable::new();
    if !doc.has_stats() {
        return table;
    }

    let members: HashMap<&str, String> = doc
        .member_names()
        .into_iter()
        .map(|(id, name)| {
            let row = player_row_name(name);
            if row != name {
                warn!(
                    "{}: member {} is named {:?}, listed as {:?}",
                    snapshot.date, id, name, row
                );
            }
            (id, row)
        })
        .collect();
    for name in members.values() {
        table.insert_player(name);
    }

    let mut dropped = 0usize;
    for group in &doc.current_stat {
        table.record_identifier(&group.map_stat_id);
        let label = names.resolve(&group.map_stat_id);
        for stat in &group.player_stat {
            match members.get(stat.member_id.as_str()) {
                Some(player) => table.add(player, label, stat.score),
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        debug!(
            "{}: dropped {} stat records for unknown member ids",
            snapshot.date, dropped
        );
    }
    table
}

/// Append the phase-range attempt and wave totals.
///
/// Only source columns present in the table contribute. Both totals are
/// always added, all zero when no source column exists.
pub fn augment(table: &mut StatTable, phases: PhaseRange) {
    let attempts = phases.attempt_sources();
    let waves = phases.wave_sources();

    table.set_column(&phases.attempts_column(), |t, p| sum_columns(t, p, &attempts));
    table.set_column(&phases.waves_column(), |t, p| sum_columns(t, p, &waves));
}

fn sum_columns(table: &StatTable, player: &str, columns: &[String]) -> i64 {
    columns
        .iter()
        .filter(|c| table.has_column(c))
        .map(|c| table.get(player, c))
        .fold(0i64, i64::saturating_add)
}

/// [`build_stat_table`] followed by [`augment`].
pub fn build_augmented_table(snapshot: &Snapshot, names: &NameMap, phases: PhaseRange) -> StatTable {
    let mut table = build_stat_table(snapshot, names);
    augment(&mut table, phases);
    table
}
