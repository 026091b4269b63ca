use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Event, NewBooking, TicketType, User};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of an atomic admission attempt. A denial carries the remaining
/// units observed inside the atomic region so the caller can report an exact
/// number without a second lookup.
#[derive(Debug)]
pub enum Admission {
    Admitted(Booking),
    TicketTypeExhausted { available: i64 },
    EventFull { remaining: i64 },
}

/// Storage port for the booking core. Services receive an `Arc<dyn
/// EventStore>` at construction; no module-level handles exist.
///
/// Contract for `admit_booking`: the per-type and per-event capacity checks
/// and the insert of the new row must form one atomic unit. Two concurrent
/// admissions against the same ticket type must serialize so that the sum of
/// Booked quantities can never exceed the type's limit nor the event's
/// capacity. How each backend achieves this is its own business (row locks
/// in Postgres, a single write lock in memory), but the check-then-act gap
/// must not be observable through this trait.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<User>;
    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event>;

    async fn get_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<TicketType>;
    /// Ticket types of an event, oldest first.
    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>>;
    async fn create_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType>;
    async fn update_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType>;
    async fn delete_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<()>;

    /// Number of booking rows referencing a ticket type, regardless of
    /// status. Used by the registry's delete guard.
    async fn booking_rows_for_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<i64>;
    /// Sum of quantities over Booked rows for one ticket type.
    async fn booked_units(&self, ticket_type_id: Uuid) -> StoreResult<i64>;
    /// Sum of quantities over Booked rows across all of an event's types.
    async fn event_booked_units(&self, event_id: Uuid) -> StoreResult<i64>;

    /// Atomic conditional insert; see the trait-level contract.
    async fn admit_booking(&self, request: NewBooking) -> StoreResult<Admission>;

    async fn get_booking_for_user(&self, booking_id: Uuid, user_id: Uuid) -> StoreResult<Booking>;
    async fn set_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> StoreResult<Booking>;
    /// A user's bookings, newest first.
    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<Booking>>;
    /// An event's bookings across all ticket types, newest first.
    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<Booking>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
