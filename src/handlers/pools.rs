use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{NewPool, Pool, PoolFilter};
use crate::services::availability::{booked_ranges, BookedRange};
use crate::state::AppState;

// POST /api/pools
pub async fn create_pool(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPool>,
) -> Result<Json<serde_json::Value>, AppError> {
    body.validate()?;

    let pool = Pool {
        id: Uuid::new_v4().to_string(),
        listing: body,
        created_at: queries::now(),
    };

    {
        let db = state.db()?;
        queries::create_pool(&db, &pool)?;
    }

    tracing::info!(pool_id = %pool.id, title = %pool.listing.title, "pool listed");
    Ok(Json(serde_json::json!({ "id": pool.id })))
}

// GET /api/pools?q=&min_price=&max_price=
pub async fn list_pools(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PoolFilter>,
) -> Result<Json<Vec<Pool>>, AppError> {
    let db = state.db()?;
    let pools = queries::list_pools(&db, &filter)?;
    Ok(Json(pools))
}

// GET /api/pools/:id
pub async fn get_pool(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Pool>, AppError> {
    let pool = {
        let db = state.db()?;
        queries::get_pool(&db, &id)?
    };
    pool.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("pool {id}")))
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

// GET /api/pools/:id/availability?date=YYYY-MM-DD
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<BookedRange>>, AppError> {
    let db = state.db()?;
    let ranges = booked_ranges(&db, &id, &query.date)?;
    Ok(Json(ranges))
}
