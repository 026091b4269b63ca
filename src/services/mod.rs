pub mod availability;
pub mod bookings;
pub mod pricing;
pub mod tickets;

pub use availability::CapacityLedger;
pub use bookings::BookingService;
pub use tickets::TicketRegistry;
