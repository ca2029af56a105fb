use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{load_snapshots, split_list, ApiError};
use crate::models::HistoryRecord;
use crate::pipeline::build_history;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Comma-separated player names; "Guild Average" is accepted
    pub players: Option<String>,
    /// Comma-separated metric labels
    pub metrics: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub players: Vec<String>,
    pub metrics: Vec<String>,
    pub records: Vec<HistoryRecord>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let players = split_list(params.players.as_deref());
    let metrics = split_list(params.metrics.as_deref());

    if players.is_empty() || metrics.is_empty() {
        return Err(ApiError::BadRequest(
            "Select at least one player and one metric".to_string(),
        ));
    }

    let snapshots = load_snapshots(&state).await?;
    if snapshots.is_empty() {
        return Err(ApiError::NoData(
            "No snapshot files found in data folder.".to_string(),
        ));
    }

    let records = build_history(&snapshots, &state.context, &players, &metrics);

    Ok(Json(HistoryResponse {
        players,
        metrics,
        records,
    }))
}
