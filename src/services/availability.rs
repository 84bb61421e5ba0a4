use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::{AppError, BookingError};
use crate::models::booking::validate_date;

/// An occupied range on a pool's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedRange {
    pub start_time: String,
    pub end_time: String,
    pub start_minute: u32,
    pub end_minute: u32,
}

/// Occupied ranges of `pool_id` on `date`, ordered by start time.
pub fn booked_ranges(conn: &Connection, pool_id: &str, date: &str) -> Result<Vec<BookedRange>, AppError> {
    validate_date(date)?;
    if queries::get_pool(conn, pool_id)?.is_none() {
        return Err(AppError::NotFound(format!("pool {pool_id}")));
    }

    let bookings = queries::get_active_bookings(conn, pool_id, date)?;
    let mut ranges = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let slot = booking.slot().map_err(|e| {
            BookingError::StoreUnavailable(format!("booking {} has unreadable times: {e}", booking.id))
        })?;
        ranges.push(BookedRange {
            start_time: booking.start_time,
            end_time: booking.end_time,
            start_minute: slot.start(),
            end_minute: slot.end(),
        });
    }
    Ok(ranges)
}
