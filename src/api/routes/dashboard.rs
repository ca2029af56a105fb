use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ready_dashboard, ApiError};
use crate::models::{MissionStatus, StatusGrid, StatusLegend, SummaryTable, ZoneProgress};
use crate::storage::{write_status_csv, write_summary_csv};

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub average: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub date: String,
    pub source: String,
    pub player_count: usize,
    pub mission_count: usize,
    pub players: Vec<String>,
    pub metrics: Vec<String>,
}

/// Status grid plus the colour of each cell code.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub grid: StatusGrid,
    pub legend: Vec<StatusLegend>,
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let views = ready_dashboard(&state, None).await?;

    Ok(Json(OverviewResponse {
        date: views.date.to_string(),
        source: views.source.display().to_string(),
        player_count: views.table.player_count(),
        mission_count: views.status.missions.len(),
        players: views.selectable_players(),
        metrics: views.selectable_metrics(),
    }))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryTable>, ApiError> {
    let views = ready_dashboard(&state, params.average).await?;
    Ok(Json(views.summary))
}

pub async fn summary_csv(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Response, ApiError> {
    let views = ready_dashboard(&state, params.average).await?;

    let mut buf = Vec::new();
    write_summary_csv(&views.summary, &mut buf)?;
    Ok(csv_response(buf, &format!("guild_summary_{}.csv", views.date)))
}

pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let views = ready_dashboard(&state, None).await?;
    Ok(Json(StatusResponse {
        grid: views.status,
        legend: MissionStatus::legend(),
    }))
}

pub async fn status_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let views = ready_dashboard(&state, None).await?;

    let mut buf = Vec::new();
    write_status_csv(&views.status, &mut buf)?;
    Ok(csv_response(buf, &format!("mission_status_{}.csv", views.date)))
}

pub async fn zones(State(state): State<AppState>) -> Result<Json<Vec<ZoneProgress>>, ApiError> {
    let views = ready_dashboard(&state, None).await?;
    Ok(Json(views.zones))
}

fn csv_response(body: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use crate::storage::read_summary_csv;
    use axum::http::StatusCode;

    const LATEST: &str = r#"{
        "member": [
            {"playerId": "p1", "playerName": "Alice"},
            {"playerId": "p2", "playerName": "Bob"}
        ],
        "currentStat": [
            {"mapStatId": "summary_territory_points", "playerStat": [
                {"memberId": "p1", "score": "100"},
                {"memberId": "p2", "score": "250"}
            ]},
            {"mapStatId": "attempt_round_3", "playerStat": [{"memberId": "p1", "score": 2}]},
            {"mapStatId": "covert_round_attempted_mission_x", "playerStat": [{"memberId": "p2", "score": 1}]}
        ]
    }"#;

    #[tokio::test]
    async fn test_summary_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", LATEST);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/summary?average=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["columns"].as_array().unwrap().len(), 8);
        assert_eq!(json["rows"][0]["player"], "Bob");
        assert_eq!(json["rows"][0]["values"][0], 250);
        assert_eq!(json["rows"][1]["values"][6], 2);
        assert_eq!(json["average"][0], 175.0);
    }

    #[tokio::test]
    async fn test_summary_csv_endpoint_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", LATEST);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, body) = get_text(app, "/api/summary.csv").await;

        assert_eq!(status, StatusCode::OK);
        let table = read_summary_csv(body.as_bytes()).unwrap();
        assert_eq!(table.value("Bob", "Total Territory Points"), 250);
        assert_eq!(table.value("Alice", "Total Attempts P3-P6"), 2);
        assert!(table.average.is_none());
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", LATEST);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["missions"][0], "Mission X");
        // Rows follow player name order.
        assert_eq!(json["rows"][0]["player"], "Alice");
        assert_eq!(json["rows"][0]["statuses"][0], 0);
        assert_eq!(json["rows"][1]["statuses"][0], -1);
        assert_eq!(json["legend"][0]["code"], 1);
        assert_eq!(json["legend"][0]["color"], "#66be25");
        assert_eq!(json["legend"][1]["label"], "attempted");
        assert_eq!(json["legend"][2]["color"], "#f59406");
    }

    #[tokio::test]
    async fn test_status_csv_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", LATEST);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, body) = get_text(app, "/api/status.csv").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.lines().next(), Some("Player,Mission X"));
        assert_eq!(body.lines().nth(2), Some("Bob,-1"));
    }

    #[tokio::test]
    async fn test_overview_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", "{}");
        write_snapshot(tmp.path(), "080125", LATEST);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["date"], "2025-01-08");
        assert_eq!(json["player_count"], 2);
        assert_eq!(json["players"][0], "Guild Average");
        assert_eq!(json["metrics"][0], "Total Territory Points");
    }

    #[tokio::test]
    async fn test_no_data_when_latest_has_no_stats() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", LATEST);
        write_snapshot(tmp.path(), "080125", r#"{"member": [], "currentStat": []}"#);
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/summary").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_no_data_without_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/status").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_internal_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path(), "010125", "{oops");
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/summary").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_zones_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(
            tmp.path(),
            "010125",
            r#"{
                "member": [{"playerId": "p1", "playerName": "Alice"}],
                "currentStat": [{"mapStatId": "x", "playerStat": [{"memberId": "p1", "score": 1}]}],
                "conflictZoneStatus": [{"zoneStatus": {"zoneId": "zone_a", "score": "500"}}]
            }"#,
        );
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/zones").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["zone_id"], "zone_a");
        assert_eq!(json[0]["score"], 500);
        assert_eq!(json[0]["stars"], 0);
    }
}
