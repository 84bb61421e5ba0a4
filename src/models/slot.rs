use crate::errors::BookingError;

/// Converts an `HH:MM` string into minutes since midnight.
///
/// Both components must be exactly two ASCII digits. Hour and minute ranges
/// are not checked, so `"25:00"` yields `1500`.
pub fn to_minutes(s: &str) -> Result<u32, BookingError> {
    let invalid = || BookingError::InvalidTimeFormat(s.to_string());

    let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
    if hour.len() != 2 || minute.len() != 2 {
        return Err(invalid());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    Ok(hour * 60 + minute)
}

/// A half-open `[start, end)` range of minutes on a single date.
///
/// Only constructible through [`Slot::new`], so `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    start: u32,
    end: u32,
}

impl Slot {
    /// Builds a slot, rejecting empty or inverted ranges.
    pub fn new(start: u32, end: u32) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start_time: &str, end_time: &str) -> Result<Self, BookingError> {
        Self::new(to_minutes(start_time)?, to_minutes(end_time)?)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    // Strict on both sides: back-to-back slots share only the boundary minute.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }
}
