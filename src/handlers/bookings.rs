use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::services::booking;
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBooking>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = {
        let mut db = state.db()?;
        booking::create_booking(&mut db, &body)
    };

    match result {
        Ok(created) => Ok(Json(serde_json::json!({ "id": created.id }))),
        Err(e) => {
            tracing::info!(
                pool_id = %body.pool_id,
                date = %body.date,
                start = %body.start_time,
                end = %body.end_time,
                reason = e.kind(),
                "booking rejected"
            );
            Err(e)
        }
    }
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = {
        let db = state.db()?;
        queries::get_booking(&db, &id)?
    };
    booking
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// POST /api/bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let mut db = state.db()?;
    let updated = booking::transition_booking(&mut db, &id, BookingStatus::Confirmed)?;
    Ok(Json(updated))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let mut db = state.db()?;
    let updated = booking::transition_booking(&mut db, &id, BookingStatus::Cancelled)?;
    Ok(Json(updated))
}
