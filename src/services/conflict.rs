use crate::errors::BookingError;
use crate::models::{Booking, Slot};

/// Read access to existing reservations, injected into [`ConflictChecker`].
///
/// Implementations should return only active bookings for the given pool and
/// date, but the checker does not rely on it.
pub trait BookingLookup {
    fn active_bookings(&self, pool_id: &str, date: &str) -> Result<Vec<Booking>, BookingError>;
}

/// In-memory lookup over a fixed set of bookings.
impl BookingLookup for [Booking] {
    fn active_bookings(&self, pool_id: &str, date: &str) -> Result<Vec<Booking>, BookingError> {
        Ok(self
            .iter()
            .filter(|b| b.pool_id == pool_id && b.date == date && b.status.is_active())
            .cloned()
            .collect())
    }
}

impl<L: BookingLookup + ?Sized> BookingLookup for &L {
    fn active_bookings(&self, pool_id: &str, date: &str) -> Result<Vec<Booking>, BookingError> {
        (**self).active_bookings(pool_id, date)
    }
}

pub struct ConflictChecker<L> {
    lookup: L,
}

impl<L: BookingLookup> ConflictChecker<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Accepts `(start_time, end_time)` on `pool_id`/`date` if no active
    /// booking overlaps it, returning the parsed slot.
    pub fn check(
        &self,
        pool_id: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<Slot, BookingError> {
        let slot = Slot::parse(start_time, end_time)?;
        let existing = self.lookup.active_bookings(pool_id, date)?;
        let candidates = existing
            .iter()
            .filter(|b| b.pool_id == pool_id && b.date == date && b.status.is_active());
        check_conflict(slot, candidates)?;
        Ok(slot)
    }
}

/// Rejects `slot` if it overlaps any of `existing`. The caller is expected to
/// have narrowed `existing` to active bookings of one pool and date.
///
/// A stored booking whose own times do not parse fails the check as a store
/// fault, since the range it occupies is unknown.
pub fn check_conflict<'a>(
    slot: Slot,
    existing: impl IntoIterator<Item = &'a Booking>,
) -> Result<(), BookingError> {
    for booking in existing {
        let taken = booking.slot().map_err(|e| {
            tracing::error!(booking_id = %booking.id, error = %e, "stored booking has unreadable times");
            BookingError::StoreUnavailable(format!("booking {} has unreadable times", booking.id))
        })?;
        if slot.overlaps(&taken) {
            return Err(BookingError::SlotTaken {
                booking_id: Some(booking.id.clone()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    fn booking(id: &str, pool_id: &str, date: &str, start: &str, end: &str, status: BookingStatus) -> Booking {
        let now = chrono::Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            pool_id: pool_id.to_string(),
            guest_name: "Alice".to_string(),
            guest_email: "alice@example.com".to_string(),
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            total_price: 40.0,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn existing(start: &str, end: &str) -> Vec<Booking> {
        vec![booking("existing-1", "pool-1", "2025-07-04", start, end, BookingStatus::Confirmed)]
    }

    fn check(store: &[Booking], start: &str, end: &str) -> Result<Slot, BookingError> {
        ConflictChecker::new(store).check("pool-1", "2025-07-04", start, end)
    }

    fn assert_taken(result: Result<Slot, BookingError>) {
        match result {
            Err(BookingError::SlotTaken { booking_id }) => {
                assert_eq!(booking_id.as_deref(), Some("existing-1"));
            }
            other => panic!("expected SlotTaken, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_empty_pool() {
        let slot = check(&[], "09:00", "10:00").unwrap();
        assert_eq!(slot, Slot::new(540, 600).unwrap());
    }

    #[test]
    fn test_rejects_empty_range() {
        assert!(matches!(
            check(&[], "10:00", "10:00"),
            Err(BookingError::InvalidRange { start: 600, end: 600 })
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(matches!(
            check(&[], "11:00", "10:00"),
            Err(BookingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_check_precedes_lookup() {
        struct Unreachable;
        impl BookingLookup for Unreachable {
            fn active_bookings(&self, _: &str, _: &str) -> Result<Vec<Booking>, BookingError> {
                Err(BookingError::StoreUnavailable("offline".into()))
            }
        }
        let checker = ConflictChecker::new(Unreachable);
        assert!(matches!(
            checker.check("pool-1", "2025-07-04", "10:00", "09:00"),
            Err(BookingError::InvalidRange { .. })
        ));
        assert!(matches!(
            checker.check("pool-1", "2025-07-04", "09:00", "10:00"),
            Err(BookingError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_malformed_times() {
        for (start, end) in [("9:5", "10:00"), ("09:00", "ten"), ("", "10:00"), ("09-00", "10-00")] {
            assert!(
                matches!(check(&[], start, end), Err(BookingError::InvalidTimeFormat(_))),
                "{start:?}-{end:?}"
            );
        }
    }

    #[test]
    fn test_adjacent_after_is_accepted() {
        assert!(check(&existing("09:00", "10:00"), "10:00", "11:00").is_ok());
    }

    #[test]
    fn test_adjacent_before_is_accepted() {
        assert!(check(&existing("09:00", "10:00"), "08:00", "09:00").is_ok());
    }

    #[test]
    fn test_exact_overlap_is_rejected() {
        assert_taken(check(&existing("09:00", "10:00"), "09:00", "10:00"));
    }

    #[test]
    fn test_partial_overlap_at_end_is_rejected() {
        assert_taken(check(&existing("09:00", "10:00"), "09:30", "10:30"));
    }

    #[test]
    fn test_partial_overlap_at_start_is_rejected() {
        assert_taken(check(&existing("09:00", "10:00"), "08:30", "09:30"));
    }

    #[test]
    fn test_one_minute_overlap_is_rejected() {
        assert_taken(check(&existing("09:00", "10:00"), "09:59", "11:00"));
        assert_taken(check(&existing("09:00", "10:00"), "08:00", "09:01"));
    }

    #[test]
    fn test_contained_range_is_rejected() {
        assert_taken(check(&existing("09:00", "12:00"), "10:00", "11:00"));
    }

    #[test]
    fn test_containing_range_is_rejected() {
        assert_taken(check(&existing("10:00", "11:00"), "09:00", "12:00"));
    }

    #[test]
    fn test_shared_start_or_end_is_rejected() {
        assert_taken(check(&existing("09:00", "12:00"), "09:00", "10:00"));
        assert_taken(check(&existing("09:00", "12:00"), "11:00", "12:00"));
    }

    #[test]
    fn test_disjoint_is_accepted() {
        assert!(check(&existing("09:00", "10:00"), "13:00", "14:00").is_ok());
    }

    #[test]
    fn test_pending_blocks() {
        let store = vec![booking("p", "pool-1", "2025-07-04", "09:00", "10:00", BookingStatus::Pending)];
        assert!(matches!(
            check(&store, "09:00", "10:00"),
            Err(BookingError::SlotTaken { .. })
        ));
    }

    #[test]
    fn test_cancelled_never_blocks() {
        let store = vec![booking("c", "pool-1", "2025-07-04", "09:00", "10:00", BookingStatus::Cancelled)];
        assert!(check(&store, "09:00", "10:00").is_ok());
    }

    #[test]
    fn test_other_pool_or_date_never_conflicts() {
        let store = vec![
            booking("a", "pool-2", "2025-07-04", "09:00", "10:00", BookingStatus::Confirmed),
            booking("b", "pool-1", "2025-07-05", "09:00", "10:00", BookingStatus::Confirmed),
        ];
        assert!(check(&store, "09:00", "10:00").is_ok());
    }

    #[test]
    fn test_filters_unfiltered_lookup_results() {
        // Lookup that ignores its arguments and returns everything.
        struct Everything(Vec<Booking>);
        impl BookingLookup for Everything {
            fn active_bookings(&self, _: &str, _: &str) -> Result<Vec<Booking>, BookingError> {
                Ok(self.0.clone())
            }
        }
        let lookup = Everything(vec![
            booking("c", "pool-1", "2025-07-04", "09:00", "10:00", BookingStatus::Cancelled),
            booking("o", "pool-2", "2025-07-04", "09:00", "10:00", BookingStatus::Confirmed),
            booking("d", "pool-1", "2025-07-05", "09:00", "10:00", BookingStatus::Pending),
        ]);
        let checker = ConflictChecker::new(lookup);
        assert!(checker.check("pool-1", "2025-07-04", "09:00", "10:00").is_ok());
    }

    #[test]
    fn test_reports_first_conflicting_booking() {
        let store = vec![
            booking("early", "pool-1", "2025-07-04", "08:00", "09:00", BookingStatus::Confirmed),
            booking("late", "pool-1", "2025-07-04", "10:00", "11:00", BookingStatus::Pending),
        ];
        match check(&store, "10:30", "12:00") {
            Err(BookingError::SlotTaken { booking_id }) => assert_eq!(booking_id.as_deref(), Some("late")),
            other => panic!("expected SlotTaken, got {other:?}"),
        }
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let times = ["08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00"];
        let mut ranges = vec![];
        for (i, start) in times.iter().enumerate() {
            for end in &times[i + 1..] {
                ranges.push(Slot::parse(start, end).unwrap());
            }
        }
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
                let intersect = a.start().max(b.start()) < a.end().min(b.end());
                assert_eq!(a.overlaps(b), intersect, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_inverted_range_never_reaches_overlap_check() {
        let taken = existing("09:00", "11:00");
        assert!(matches!(
            Slot::new(600, 500),
            Err(BookingError::InvalidRange { start: 600, end: 500 })
        ));
        let inside = Slot::new(570, 600).unwrap();
        assert!(matches!(
            check_conflict(inside, &taken),
            Err(BookingError::SlotTaken { .. })
        ));
        assert!(matches!(
            check(&taken, "10:00", "08:20"),
            Err(BookingError::InvalidRange { start: 600, end: 500 })
        ));
    }

    #[test]
    fn test_unreadable_stored_booking_fails_closed() {
        let store = vec![booking("bad", "pool-1", "2025-07-04", "9am", "10am", BookingStatus::Confirmed)];
        assert!(matches!(
            check(&store, "09:00", "10:00"),
            Err(BookingError::StoreUnavailable(_))
        ));
    }
}
