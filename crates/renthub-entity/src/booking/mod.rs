//! Booking entities: the booking row, its lifecycle state machine, and
//! the per-booking message thread.

pub mod message;
pub mod model;
pub mod status;

pub use message::{BookingMessage, CreateMessage};
pub use model::{Booking, BookingView, CreateBooking};
pub use status::{BookingAction, BookingStatus};
