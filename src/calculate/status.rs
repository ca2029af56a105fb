//! Special mission status classification.

use std::collections::{BTreeSet, HashSet};

use crate::models::{
    MissionStatus, NameMap, StatTable, StatusGrid, StatusRow, MISSION_ATTEMPT_PREFIX,
    MISSION_COMPLETE_PREFIX,
};

/// A special mission and the table columns that describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Mission<'a> {
    label: &'a str,
    attempt_labels: Vec<&'a str>,
}

/// Pair every completion identifier with the attempt identifiers that
/// contain its base key.
fn discover_missions<'a>(table: &'a StatTable, names: &'a NameMap) -> Vec<Mission<'a>> {
    let identifiers: BTreeSet<&str> = names.identifiers().chain(table.identifiers()).collect();
    let attempts: Vec<&str> = identifiers
        .iter()
        .copied()
        .filter(|id| id.starts_with(MISSION_ATTEMPT_PREFIX))
        .collect();

    let complete_prefix = format!("{}_", MISSION_COMPLETE_PREFIX);
    let mut seen_labels = HashSet::new();
    let mut missions = Vec::new();

    for id in identifiers
        .iter()
        .copied()
        .filter(|id| id.starts_with(MISSION_COMPLETE_PREFIX))
    {
        let label = names.resolve(id);
        if !seen_labels.insert(label) {
            continue;
        }

        let base = id.strip_prefix(complete_prefix.as_str()).unwrap_or(id);
        let attempt_labels = attempts
            .iter()
            .filter(|a| a.contains(base))
            .map(|a| names.resolve(*a))
            .collect();

        missions.push(Mission {
            label,
            attempt_labels,
        });
    }

    missions
}

/// Classify every player × special mission of `table`.
///
/// Completed when the completion column is positive, attempted when any
/// matching attempt column is positive, untouched otherwise. Columns that
/// are absent read as zero.
pub fn classify_missions(table: &StatTable, names: &NameMap) -> StatusGrid {
    let missions = discover_missions(table, names);

    let rows = table
        .players()
        .map(|player| {
            let statuses = missions
                .iter()
                .map(|m| {
                    let completed = table.get(player, m.label);
                    let attempted: i64 = m
                        .attempt_labels
                        .iter()
                        .map(|a| table.get(player, a))
                        .fold(0, i64::saturating_add);
                    MissionStatus::classify(completed, attempted)
                })
                .collect();
            StatusRow {
                player: player.to_string(),
                statuses,
            }
        })
        .collect();

    StatusGrid {
        missions: missions.iter().map(|m| m.label.to_string()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::build_stat_table;
    use crate::calculate::fixtures::*;
    use pretty_assertions::assert_eq;

    fn mission_names() -> NameMap {
        names(&[
            ("covert_complete_mission_x", "Mission X"),
            ("covert_round_attempted_mission_x_r1", "Mission X Attempts R1"),
            ("covert_round_attempted_mission_x_r2", "Mission X Attempts R2"),
            ("covert_complete_mission_y", "Mission Y"),
            ("covert_round_attempted_mission_y", "Mission Y Attempts"),
            ("pts", "Total Territory Points"),
        ])
    }

    #[test]
    fn test_classifies_each_state() {
        let snap = snapshot(
            (2025, 1, 1),
            vec![member("a", "A"), member("b", "B"), member("c", "C")],
            vec![
                group("covert_complete_mission_x", &[("a", 1)]),
                group("covert_round_attempted_mission_x_r1", &[("a", 2), ("b", 1)]),
                group("pts", &[("c", 10)]),
            ],
        );
        let names = mission_names();
        let table = build_stat_table(&snap, &names);

        let grid = classify_missions(&table, &names);

        assert_eq!(grid.missions, vec!["Mission X", "Mission Y"]);
        assert_eq!(grid.get("A", "Mission X"), MissionStatus::Completed);
        assert_eq!(grid.get("B", "Mission X"), MissionStatus::Attempted);
        assert_eq!(grid.get("C", "Mission X"), MissionStatus::Untouched);
        assert_eq!(grid.get("A", "Mission Y"), MissionStatus::Untouched);
    }

    #[test]
    fn test_sums_all_matching_attempt_rounds() {
        let snap = snapshot(
            (2025, 1, 1),
            vec![member("a", "A")],
            vec![group("covert_round_attempted_mission_x_r2", &[("a", 1)])],
        );
        let names = mission_names();
        let table = build_stat_table(&snap, &names);

        let grid = classify_missions(&table, &names);
        assert_eq!(grid.get("A", "Mission X"), MissionStatus::Attempted);
    }

    #[test]
    fn test_completion_without_attempts_is_untouched() {
        let names = names(&[("covert_complete_mission_x", "Mission X")]);
        let snap = snapshot(
            (2025, 1, 1),
            vec![member("a", "A")],
            vec![group("covert_complete_mission_x", &[("a", 0)])],
        );
        let table = build_stat_table(&snap, &names);

        let grid = classify_missions(&table, &names);
        assert_eq!(grid.get("A", "Mission X"), MissionStatus::Untouched);
        assert_eq!(grid.rows[0].statuses[0].code(), 0);
    }

    #[test]
    fn test_missions_discovered_from_unmapped_table_identifiers() {
        let snap = snapshot(
            (2025, 1, 1),
            vec![member("a", "A")],
            vec![
                group("covert_complete_mission_z", &[("a", 0)]),
                group("covert_round_attempted_mission_z", &[("a", 3)]),
            ],
        );
        let names = NameMap::default();
        let table = build_stat_table(&snap, &names);

        let grid = classify_missions(&table, &names);
        assert_eq!(grid.missions, vec!["covert_complete_mission_z"]);
        assert_eq!(
            grid.get("A", "covert_complete_mission_z"),
            MissionStatus::Attempted
        );
    }

    #[test]
    fn test_completed_wins_regardless_of_attempts() {
        let names = mission_names();
        for attempts in [0, 1, 50] {
            let snap = snapshot(
                (2025, 1, 1),
                vec![member("a", "A")],
                vec![
                    group("covert_complete_mission_y", &[("a", 1)]),
                    group("covert_round_attempted_mission_y", &[("a", attempts)]),
                ],
            );
            let table = build_stat_table(&snap, &names);
            let grid = classify_missions(&table, &names);
            assert_eq!(grid.get("A", "Mission Y"), MissionStatus::Completed);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let snap = snapshot(
            (2025, 1, 1),
            vec![member("a", "A"), member("b", "B")],
            vec![group("covert_round_attempted_mission_x_r1", &[("b", 1)])],
        );
        let names = mission_names();
        let table = build_stat_table(&snap, &names);

        assert_eq!(
            classify_missions(&table, &names),
            classify_missions(&table, &names)
        );
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let names = mission_names();
        let grid = classify_missions(&StatTable::new(), &names);
        assert!(grid.rows.is_empty());
        assert_eq!(grid.missions.len(), 2);
    }
}
