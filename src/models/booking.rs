use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{first_failure, BookingError, ValidationError};
use crate::models::Slot;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub pool_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn slot(&self) -> Result<Slot, BookingError> {
        Slot::parse(&self.start_time, &self.end_time)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a booking in this status occupies its slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Cancelled is terminal, so a transition never re-activates a slot.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest's reservation request as received from the API.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBooking {
    pub pool_id: String,
    pub guest_name: String,
    #[validate(email)]
    pub guest_email: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Computed from the pool's hourly price when omitted.
    #[validate(range(min = 0.0))]
    pub total_price: Option<f64>,
}

impl NewBooking {
    /// Checks the guest-supplied fields. Time strings are left to the
    /// conflict checker so that they surface as booking errors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pool_id.trim().is_empty() {
            return Err(ValidationError::Blank("pool_id"));
        }
        if self.guest_name.trim().is_empty() {
            return Err(ValidationError::Blank("guest_name"));
        }
        if let Err(report) = Validate::validate(self) {
            return Err(match first_failure(&report, &["guest_email", "total_price"]) {
                Some(("guest_email", _)) => ValidationError::InvalidEmail(self.guest_email.clone()),
                Some(("total_price", _)) => ValidationError::Negative("total_price"),
                _ => ValidationError::Invalid(report.to_string()),
            });
        }
        if matches!(self.total_price, Some(price) if !price.is_finite()) {
            return Err(ValidationError::NotFinite("total_price"));
        }
        validate_date(&self.date)
    }
}

pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    // chrono accepts unpadded fields, so also pin the length
    if date.len() != 10 || NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
        return Err(ValidationError::InvalidDate(date.to_string()));
    }
    Ok(())
}
