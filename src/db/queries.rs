use chrono::{NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::BookingError;
use crate::models::{Booking, BookingStatus, NewPool, Pool, PoolFilter, Slot};
use crate::services::conflict::BookingLookup;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const POOL_COLUMNS: &str = "id, title, description, host_name, location, latitude, longitude, \
     price_per_hour, capacity, amenities, photos, rating, created_at";

const BOOKING_COLUMNS: &str = "id, pool_id, guest_name, guest_email, date, start_time, end_time, \
     total_price, status, created_at, updated_at";

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ── Pools ──

pub fn create_pool(conn: &Connection, pool: &Pool) -> rusqlite::Result<()> {
    let listing = &pool.listing;
    conn.execute(
        "INSERT INTO pools (id, title, description, host_name, location, latitude, longitude,
                            price_per_hour, capacity, amenities, photos, rating, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            pool.id,
            listing.title,
            listing.description,
            listing.host_name,
            listing.location,
            listing.latitude,
            listing.longitude,
            listing.price_per_hour,
            listing.capacity,
            to_json(&listing.amenities)?,
            to_json(&listing.photos)?,
            listing.rating,
            pool.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_pool(conn: &Connection, id: &str) -> rusqlite::Result<Option<Pool>> {
    conn.query_row(
        &format!("SELECT {POOL_COLUMNS} FROM pools WHERE id = ?1"),
        params![id],
        parse_pool_row,
    )
    .optional()
}

/// Listings matching `filter`, oldest first. The text match runs in Rust so
/// that case folding is not limited to ASCII.
pub fn list_pools(conn: &Connection, filter: &PoolFilter) -> rusqlite::Result<Vec<Pool>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POOL_COLUMNS} FROM pools
         WHERE (?1 IS NULL OR price_per_hour >= ?1) AND (?2 IS NULL OR price_per_hour <= ?2)
         ORDER BY created_at ASC, rowid ASC"
    ))?;

    let rows = stmt.query_map(params![filter.min_price, filter.max_price], parse_pool_row)?;

    let mut pools = vec![];
    for row in rows {
        let pool = row?;
        if filter.matches(&pool.listing) {
            pools.push(pool);
        }
    }
    Ok(pools)
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking, slot: Slot) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, pool_id, guest_name, guest_email, date, start_time, end_time,
                               start_minute, end_minute, total_price, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            booking.id,
            booking.pool_id,
            booking.guest_name,
            booking.guest_email,
            booking.date,
            booking.start_time,
            booking.end_time,
            slot.start(),
            slot.end(),
            booking.total_price,
            booking.status.as_str(),
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
            booking.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    )
    .optional()
}

/// Pending and confirmed bookings of one pool on one date, by start time.
pub fn get_active_bookings(
    conn: &Connection,
    pool_id: &str,
    date: &str,
) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE pool_id = ?1 AND date = ?2 AND status IN (?3, ?4)
         ORDER BY start_minute ASC, end_minute ASC"
    ))?;

    let [pending, confirmed] = BookingStatus::ACTIVE;
    let rows = stmt.query_map(
        params![pool_id, date, pending.as_str(), confirmed.as_str()],
        parse_booking_row,
    )?;
    rows.collect()
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> rusqlite::Result<bool> {
    let now = now().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '\\_%' ESCAPE '\\'
         ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

impl BookingLookup for Connection {
    fn active_bookings(&self, pool_id: &str, date: &str) -> Result<Vec<Booking>, BookingError> {
        Ok(get_active_bookings(self, pool_id, date)?)
    }
}

// ── Row mapping ──

fn parse_pool_row(row: &Row) -> rusqlite::Result<Pool> {
    let amenities: String = row.get(9)?;
    let photos: String = row.get(10)?;
    let created_at: String = row.get(12)?;

    Ok(Pool {
        id: row.get(0)?,
        listing: NewPool {
            title: row.get(1)?,
            description: row.get(2)?,
            host_name: row.get(3)?,
            location: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
            price_per_hour: row.get(7)?,
            capacity: row.get(8)?,
            amenities: from_json(9, &amenities)?,
            photos: from_json(10, &photos)?,
            rating: row.get(11)?,
        },
        created_at: parse_timestamp(12, &created_at)?,
    })
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    let status: String = row.get(8)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    let status = BookingStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            Type::Text,
            format!("unknown booking status: {status}").into(),
        )
    })?;

    Ok(Booking {
        id: row.get(0)?,
        pool_id: row.get(1)?,
        guest_name: row.get(2)?,
        guest_email: row.get(3)?,
        date: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        total_price: row.get(7)?,
        status,
        created_at: parse_timestamp(9, &created_at)?,
        updated_at: parse_timestamp(10, &updated_at)?,
    })
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn to_json(values: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(values).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_json(idx: usize, s: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
