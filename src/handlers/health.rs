use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::state::AppState;

// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "PoolBnB API is running" }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    backend: &'static str,
    database: String,
    database_url: &'static str,
    database_name: String,
    tables: Vec<String>,
}

// GET /health (also served at /test)
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_url = if state.config.database_url_set { "set" } else { "not set" };
    let database_name = state.config.database_name().to_string();

    let tables = state
        .db()
        .map_err(|e| e.to_string())
        .and_then(|db| queries::list_tables(&db).map_err(|e| e.to_string()));

    let response = match tables {
        Ok(tables) => HealthResponse {
            backend: "running",
            database: "connected".to_string(),
            database_url,
            database_name,
            tables,
        },
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            HealthResponse {
                backend: "running",
                database: format!("error: {e}"),
                database_url,
                database_name,
                tables: vec![],
            }
        }
    };
    Json(response)
}
