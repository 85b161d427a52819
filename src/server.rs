// Inbound API surface: POST /api/suggest plus a health probe and static file
// serving. All suggestion logic lives in the resolver modules; handlers here
// only validate the request shape and serialize the result.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::dataset::{Dataset, Record};
use crate::oracle::OracleClient;
use crate::suggest::resolve_with_oracle;

/// Shared state: the oracle client, built once at startup. `None` when no
/// credential is configured, in which case every request resolves locally.
pub type AppState = Arc<Option<OracleClient>>;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub prompt: Option<String>,
    pub rows: Option<Vec<Record>>,
    #[serde(rename = "datasetName")]
    pub dataset_name: Option<String>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/suggest", post(suggest))
        .fallback_service(ServeDir::new("public"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "mmcartbox"}))
}

async fn suggest(State(state): State<AppState>, Json(req): Json<SuggestRequest>) -> Response {
    let prompt = match req.prompt.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => return (StatusCode::BAD_REQUEST, "Missing prompt").into_response(),
    };
    let rows = match req.rows {
        Some(r) => r,
        None => return (StatusCode::BAD_REQUEST, "Missing rows (dataset)").into_response(),
    };

    let name = req.dataset_name.unwrap_or_else(|| "dataset".to_string());
    let data = Dataset::from_rows(&name, rows);

    let suggestion = resolve_with_oracle(state.as_ref().as_ref(), &prompt, &data).await;
    Json(suggestion.spec).into_response()
}
