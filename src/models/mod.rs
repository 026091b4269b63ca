pub mod booking;
pub mod event;
pub mod ticket;
pub mod user;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use event::Event;
pub use ticket::{NewTicketType, TicketCategory, TicketType, TicketTypePatch};
pub use user::{User, UserRole};
