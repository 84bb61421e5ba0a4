//! Reservation workflow on top of the SQLite store.
//!
//! Double-booking is prevented by single-writer serialization: callers hold
//! the process-wide connection mutex, and the read-check-write sequence runs
//! in a `BEGIN IMMEDIATE` transaction, which takes SQLite's write lock before
//! the conflict read. Other processes opening the same database file queue
//! behind that lock (bounded by the connection's busy timeout).

use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::{AppError, ValidationError};
use crate::models::{Booking, BookingStatus, NewBooking, Pool, Slot};
use crate::services::conflict::ConflictChecker;

/// Validates, conflict-checks and persists a reservation as `pending`.
pub fn create_booking(conn: &mut Connection, request: &NewBooking) -> Result<Booking, AppError> {
    request.validate()?;
    // Reject malformed or inverted ranges before touching the store.
    Slot::parse(&request.start_time, &request.end_time)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let pool = queries::get_pool(&tx, &request.pool_id)?
        .ok_or_else(|| AppError::NotFound(format!("pool {}", request.pool_id)))?;

    let slot = ConflictChecker::new(&*tx).check(
        &request.pool_id,
        &request.date,
        &request.start_time,
        &request.end_time,
    )?;

    let total_price = match request.total_price {
        Some(price) => price,
        None => quote_price(&pool, slot)?,
    };

    let now = queries::now();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        pool_id: request.pool_id.clone(),
        guest_name: request.guest_name.trim().to_string(),
        guest_email: request.guest_email.clone(),
        date: request.date.clone(),
        start_time: request.start_time.clone(),
        end_time: request.end_time.clone(),
        total_price,
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    queries::create_booking(&tx, &booking, slot)?;
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        pool_id = %booking.pool_id,
        date = %booking.date,
        start = %booking.start_time,
        end = %booking.end_time,
        "booking created"
    );
    Ok(booking)
}

/// Moves a booking to `next` if the transition is allowed.
pub fn transition_booking(
    conn: &mut Connection,
    id: &str,
    next: BookingStatus,
) -> Result<Booking, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let not_found = || AppError::NotFound(format!("booking {id}"));
    let current = queries::get_booking(&tx, id)?.ok_or_else(not_found)?;

    if !current.status.can_transition_to(next) {
        return Err(AppError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }

    queries::update_booking_status(&tx, id, next)?;
    let updated = queries::get_booking(&tx, id)?.ok_or_else(not_found)?;
    tx.commit()?;

    tracing::info!(booking_id = %id, from = %current.status, to = %next, "booking status changed");
    Ok(updated)
}

/// Hourly price prorated to the minute, rounded to cents.
pub fn quote_price(pool: &Pool, slot: Slot) -> Result<f64, ValidationError> {
    let raw = pool.listing.price_per_hour * f64::from(slot.duration_minutes()) / 60.0;
    let price = (raw * 100.0).round() / 100.0;
    if !price.is_finite() {
        return Err(ValidationError::NotFinite("total_price"));
    }
    Ok(price)
}
