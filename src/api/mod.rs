//! REST API endpoints.
//!
//! Axum-based HTTP API serving the guild summary, mission status grid,
//! metric history, zone progress and the latest-snapshot editor.

pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::Snapshot;
use crate::pipeline::{build_dashboard, Dashboard, DashboardViews};
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NoData(_) => (StatusCode::NOT_FOUND, "NO_DATA"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PathNotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/snapshots", get(routes::snapshots::list_snapshots))
        .route(
            "/api/snapshots/latest/raw",
            get(routes::snapshots::latest_raw).put(routes::snapshots::replace_latest),
        )
        .route("/api/dashboard", get(routes::dashboard::overview))
        .route("/api/summary", get(routes::dashboard::summary))
        .route("/api/summary.csv", get(routes::dashboard::summary_csv))
        .route("/api/status", get(routes::dashboard::status))
        .route("/api/status.csv", get(routes::dashboard::status_csv))
        .route("/api/zones", get(routes::dashboard::zones))
        .route("/api/history", get(routes::history::history))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Snapshots through the shared cache.
///
/// Hits only take the read lock. Filesystem work runs on the blocking pool.
pub async fn load_snapshots(state: &AppState) -> Result<Arc<Vec<Snapshot>>, ApiError> {
    let store = Arc::clone(&state.store);
    let signature = run_blocking(move || store.signature()).await?;

    if let Some(snapshots) = state.cache.read().await.lookup(&signature) {
        return Ok(snapshots);
    }

    let mut cache = state.cache.write().await;
    // Another request may have filled the cache while we waited.
    if let Some(snapshots) = cache.lookup(&signature) {
        return Ok(snapshots);
    }

    let store = Arc::clone(&state.store);
    let snapshots = run_blocking(move || store.list_snapshots()).await?;
    Ok(cache.insert(signature, snapshots))
}

/// Run a blocking storage call off the async workers.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("storage task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Latest-snapshot views, or `NoData` when there is nothing to show.
pub async fn ready_dashboard(
    state: &AppState,
    summary_average: Option<bool>,
) -> Result<Box<DashboardViews>, ApiError> {
    let snapshots = load_snapshots(state).await?;
    match build_dashboard(&snapshots, &state.context, summary_average) {
        Dashboard::Ready(views) => Ok(views),
        other => Err(ApiError::NoData(
            other.no_data_message().unwrap_or_default(),
        )),
    }
}

/// Split a comma-separated query value into trimmed, non-empty items.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::state::AppState;
    use crate::models::{NameMap, ZoneDefinitions};
    use crate::pipeline::PipelineContext;
    use crate::storage::SnapshotStore;

    pub const NAMES: &[(&str, &str)] = &[
        ("summary_territory_points", "Total Territory Points"),
        ("covert_complete_mission_x", "Mission X"),
        ("covert_round_attempted_mission_x", "Mission X Attempts"),
        ("attempt_round_3", "Mission Attempt Round 3"),
    ];

    pub fn write_snapshot(dir: &Path, ddmmyy: &str, body: &str) {
        std::fs::write(dir.join(format!("tb_data_{}.json", ddmmyy)), body).unwrap();
    }

    pub fn setup_test_state(dir: &Path) -> AppState {
        let store = SnapshotStore::new(dir.to_path_buf(), "tb_data", "json").unwrap();
        let names: NameMap = NAMES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppState::new(
            store,
            PipelineContext::new(names, ZoneDefinitions::default()),
        )
    }

    pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    pub async fn get_text(app: axum::Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get_text(app, uri).await;
        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(Some("Alice, Bob ,,Guild Average")),
            vec!["Alice", "Bob", "Guild Average"]
        );
        assert!(split_list(None).is_empty());
        assert!(split_list(Some(" , ")).is_empty());
    }

    #[test]
    fn test_storage_errors_map_to_api_errors() {
        let err: ApiError = StorageError::PathNotFound("/data".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StorageError::InvalidCsv("bad".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_cache_hits_share_the_read_lock() {
        let tmp = tempfile::tempdir().unwrap();
        test_support::write_snapshot(tmp.path(), "010125", "{}");
        let state = test_support::setup_test_state(tmp.path());

        let first = load_snapshots(&state).await.unwrap();

        // A warm cache must be readable while another reader holds the lock.
        let _reader = state.cache.read().await;
        let second = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            load_snapshots(&state),
        )
        .await
        .expect("cache hit blocked on the write lock")
        .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_snapshots_reloads_after_change() {
        let tmp = tempfile::tempdir().unwrap();
        test_support::write_snapshot(tmp.path(), "010125", "{}");
        let state = test_support::setup_test_state(tmp.path());

        assert_eq!(load_snapshots(&state).await.unwrap().len(), 1);

        test_support::write_snapshot(tmp.path(), "080125", "{}");
        assert_eq!(load_snapshots(&state).await.unwrap().len(), 2);
    }

    #[test]
    fn test_no_data_status_code() {
        let resp = ApiError::NoData("empty".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
