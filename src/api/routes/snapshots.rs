use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{load_snapshots, ApiError};
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct SnapshotEntry {
    pub date: String,
    pub file: String,
    pub has_stats: bool,
}

#[derive(Debug, Serialize)]
pub struct SnapshotListResponse {
    pub snapshots: Vec<SnapshotEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub path: String,
    pub bytes: usize,
}

pub async fn list_snapshots(
    State(state): State<AppState>,
) -> Result<Json<SnapshotListResponse>, ApiError> {
    let snapshots = load_snapshots(&state).await?;

    let entries: Vec<SnapshotEntry> = snapshots
        .iter()
        .map(|s| SnapshotEntry {
            date: s.date.to_string(),
            file: s.file_name(),
            has_stats: s.document.has_stats(),
        })
        .collect();

    Ok(Json(SnapshotListResponse {
        total: entries.len(),
        snapshots: entries,
    }))
}

/// Raw JSON text of the latest snapshot, for editing.
pub async fn latest_raw(State(state): State<AppState>) -> Result<Response, ApiError> {
    let (_, contents) = state.store.read_latest_raw()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], contents).into_response())
}

/// Replace the latest snapshot with the request body.
pub async fn replace_latest(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ReplaceResponse>, ApiError> {
    let path = state.store.replace_latest(&body).map_err(|e| match e {
        StorageError::InvalidSnapshot { reason, .. } => ApiError::BadRequest(reason),
        other => other.into(),
    })?;

    // Later reads must see the new contents even if the mtime did not move.
    state.cache.write().await.invalidate();

    Ok(Json(ReplaceResponse {
        path: path.display().to_string(),
        bytes: body.len(),
    }))
}
