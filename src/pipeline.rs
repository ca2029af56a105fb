//! Dashboard pipeline.
//!
//! One pure pass from loaded snapshots to every derived view of the latest
//! snapshot. Callers decide how snapshots are loaded and cached.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::calculate::{
    build_augmented_table, classify_missions, project_history, summarize, zone_progress,
};
use crate::config::AppConfig;
use crate::models::{
    HistoryRecord, NameMap, PhaseRange, Snapshot, StatTable, StatusGrid, SummaryTable,
    ZoneDefinitions, ZoneProgress, GUILD_AVERAGE,
};
use crate::storage::{load_name_map, load_zone_definitions, StorageError};

/// Immutable inputs shared by every pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub names: Arc<NameMap>,
    pub zones: Arc<ZoneDefinitions>,
    pub phases: PhaseRange,
    pub sort_metric: String,
    pub include_average: bool,
}

impl PipelineContext {
    pub fn new(names: NameMap, zones: ZoneDefinitions) -> Self {
        let metrics = crate::config::MetricsConfig::default();
        Self {
            names: Arc::new(names),
            zones: Arc::new(zones),
            phases: metrics.phases(),
            sort_metric: metrics.sort_metric,
            include_average: metrics.include_average,
        }
    }

    /// Load the mapping files named by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let names = load_name_map(&config.names_path())?;
        let zones = load_zone_definitions(&config.zones_path())?;
        info!(
            "Pipeline context: {} stat names, {} zone definitions, phases P{}-P{}",
            names.len(),
            zones.len(),
            config.metrics.phase_first,
            config.metrics.phase_last
        );

        Ok(Self {
            names: Arc::new(names),
            zones: Arc::new(zones),
            phases: config.metrics.phases(),
            sort_metric: config.metrics.sort_metric.clone(),
            include_average: config.metrics.include_average,
        })
    }
}

/// Everything shown for the latest snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardViews {
    pub date: NaiveDate,
    pub source: PathBuf,
    #[serde(skip)]
    pub table: StatTable,
    pub summary: SummaryTable,
    pub status: StatusGrid,
    pub zones: Vec<ZoneProgress>,
}

impl DashboardViews {
    /// Players selectable for history, "Guild Average" first.
    pub fn selectable_players(&self) -> Vec<String> {
        std::iter::once(GUILD_AVERAGE.to_string())
            .chain(self.table.players().map(str::to_string))
            .collect()
    }

    /// Metrics selectable for history.
    pub fn selectable_metrics(&self) -> Vec<String> {
        self.summary.columns.clone()
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub enum Dashboard {
    /// No dated snapshot files exist.
    NoSnapshots,

    /// The latest snapshot has no per-player stat records.
    NoStats { date: NaiveDate },

    Ready(Box<DashboardViews>),
}

impl Dashboard {
    pub fn views(&self) -> Option<&DashboardViews> {
        match self {
            Dashboard::Ready(views) => Some(views.as_ref()),
            _ => None,
        }
    }

    /// Human-readable reason when there is nothing to show.
    pub fn no_data_message(&self) -> Option<String> {
        match self {
            Dashboard::NoSnapshots => Some("No snapshot files found in data folder.".to_string()),
            Dashboard::NoStats { date } => {
                Some(format!("No currentStat data to display for {}.", date))
            }
            Dashboard::Ready(_) => None,
        }
    }
}

/// Build the latest-snapshot views.
///
/// `summary_average` overrides the context's default for the Guild Average
/// summary row.
pub fn build_dashboard(
    snapshots: &[Snapshot],
    ctx: &PipelineContext,
    summary_average: Option<bool>,
) -> Dashboard {
    let Some(latest) = snapshots.last() else {
        return Dashboard::NoSnapshots;
    };

    let table = build_augmented_table(latest, &ctx.names, ctx.phases);
    if table.is_empty() {
        return Dashboard::NoStats { date: latest.date };
    }

    let summary = summarize(
        &table,
        ctx.phases,
        &ctx.sort_metric,
        summary_average.unwrap_or(ctx.include_average),
    );
    let status = classify_missions(&table, &ctx.names);
    let zones = zone_progress(latest, &ctx.names, &ctx.zones);

    info!(
        "Dashboard for {}: {} players, {} missions, {} zones",
        latest.date,
        table.player_count(),
        status.missions.len(),
        zones.len()
    );

    Dashboard::Ready(Box::new(DashboardViews {
        date: latest.date,
        source: latest.path.clone(),
        table,
        summary,
        status,
        zones,
    }))
}

/// History series for the selected players and metrics.
pub fn build_history(
    snapshots: &[Snapshot],
    ctx: &PipelineContext,
    players: &[String],
    metrics: &[String],
) -> Vec<HistoryRecord> {
    project_history(snapshots, players, metrics, &ctx.names, ctx.phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::*;
    use crate::models::{MissionStatus, TOTAL_TERRITORY_POINTS};

    fn context() -> PipelineContext {
        PipelineContext::new(
            names(&[
                ("pts", TOTAL_TERRITORY_POINTS),
                ("covert_complete_mission_x", "Mission X"),
            ]),
            ZoneDefinitions::default(),
        )
    }

    #[test]
    fn test_no_snapshots() {
        let dashboard = build_dashboard(&[], &context(), None);
        assert!(matches!(dashboard, Dashboard::NoSnapshots));
        assert!(dashboard.no_data_message().is_some());
    }

    #[test]
    fn test_latest_without_stats_is_no_data() {
        let snapshots = vec![
            snapshot((2025, 1, 1), vec![member("a", "A")], vec![group("pts", &[("a", 1)])]),
            snapshot((2025, 1, 8), vec![member("a", "A")], Vec::new()),
        ];

        let dashboard = build_dashboard(&snapshots, &context(), None);
        match dashboard {
            Dashboard::NoStats { date } => assert_eq!(date.to_string(), "2025-01-08"),
            other => panic!("expected NoStats, got {:?}", other),
        }
    }

    #[test]
    fn test_ready_uses_latest_snapshot() {
        let snapshots = vec![
            snapshot((2025, 1, 1), vec![member("a", "A")], vec![group("pts", &[("a", 1)])]),
            snapshot(
                (2025, 1, 8),
                vec![member("a", "A"), member("b", "B")],
                vec![
                    group("pts", &[("a", 5), ("b", 9)]),
                    group("covert_complete_mission_x", &[("b", 1)]),
                ],
            ),
        ];

        let dashboard = build_dashboard(&snapshots, &context(), Some(true));
        let views = dashboard.views().unwrap();

        assert_eq!(views.date.to_string(), "2025-01-08");
        assert_eq!(views.summary.players(), vec!["B", "A"]);
        assert_eq!(views.summary.average.as_ref().unwrap()[0], 7.0);
        assert_eq!(views.status.get("B", "Mission X"), MissionStatus::Completed);
        assert_eq!(views.selectable_players(), vec![GUILD_AVERAGE, "A", "B"]);
        assert_eq!(views.selectable_metrics().len(), 8);
    }

    #[test]
    fn test_build_history_through_context() {
        let snapshots = vec![snapshot(
            (2025, 1, 1),
            vec![member("a", "A")],
            vec![group("pts", &[("a", 3)])],
        )];
        let records = build_history(
            &snapshots,
            &context(),
            &["A".to_string()],
            &[TOTAL_TERRITORY_POINTS.to_string()],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 3.0);
    }
}
