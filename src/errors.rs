use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

/// Outcomes of a reservation attempt that stop the request. None of these
/// are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("end time must be after start time ({start} >= {end} minutes)")]
    InvalidRange { start: u32, end: u32 },

    #[error("invalid time format: {0:?} (expected HH:MM)")]
    InvalidTimeFormat(String),

    #[error("time slot already booked")]
    SlotTaken { booking_id: Option<String> },

    #[error("booking store unavailable: {0}")]
    StoreUnavailable(String),
}

impl BookingError {
    /// Client-caused rejections must not be retried by the caller;
    /// infrastructure failures may be.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, BookingError::StoreUnavailable(_))
    }
}

impl From<rusqlite::Error> for BookingError {
    fn from(e: rusqlite::Error) -> Self {
        BookingError::StoreUnavailable(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("{0} must be greater than or equal to 0")]
    Negative(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid photo url: {0}")]
    InvalidPhotoUrl(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("invalid request: {0}")]
    Invalid(String),
}

/// First field of `fields` with a derive-level failure, with that failure's
/// message if it set one. `fields` fixes the reporting order.
pub(crate) fn first_failure(
    report: &validator::ValidationErrors,
    fields: &[&'static str],
) -> Option<(&'static str, Option<String>)> {
    let errors = report.field_errors();
    fields.iter().find_map(|&field| {
        let failure = errors.get(field).copied()?.first()?;
        Some((field, failure.message.as_ref().map(|m| m.to_string())))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Booking(e.into())
    }
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Booking(BookingError::InvalidRange { .. }) => "invalid_range",
            AppError::Booking(BookingError::InvalidTimeFormat(_)) => "invalid_time_format",
            AppError::Booking(BookingError::SlotTaken { .. }) => "slot_taken",
            AppError::Booking(BookingError::StoreUnavailable(_)) => "store_unavailable",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidTransition { .. } => "invalid_transition",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Booking(BookingError::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingError::InvalidTimeFormat(_)) => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingError::SlotTaken { .. }) => StatusCode::CONFLICT,
            AppError::Booking(BookingError::StoreUnavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = serde_json::json!({ "error": self.to_string(), "kind": self.kind() });
        if let AppError::Booking(BookingError::SlotTaken {
            booking_id: Some(id),
        }) = &self
        {
            body["conflicting_booking_id"] = serde_json::Value::from(id.as_str());
        }
        (status, axum::Json(body)).into_response()
    }
}
