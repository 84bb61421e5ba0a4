pub mod booking;
pub mod pool;
pub mod slot;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use pool::{NewPool, Pool, PoolFilter};
pub use slot::{to_minutes, Slot};
