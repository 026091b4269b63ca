//! Booking admission control and lifecycle.
//!
//! `create_booking` is the single gate through which a booking comes into
//! existence. Existence and input validation happen here; the two capacity
//! checks and the insert happen inside the store's atomic admission, so
//! concurrent requests racing for the same ticket type cannot both slip
//! through a stale read.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Booking, BookingStatus, NewBooking, UserRole};
use crate::services::pricing;
use crate::store::{Admission, EventStore};
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn EventStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn create_booking(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
        quantity: i32,
    ) -> Result<Booking, AppError> {
        let user = self.store.get_user(user_id).await?;
        let event = self.store.get_event(event_id).await?;
        let ticket_type = self.store.get_ticket_type(ticket_type_id).await?;
        if ticket_type.event_id != event.id {
            return Err(AppError::NotFound(
                "Ticket type not found for this event".to_string(),
            ));
        }

        if quantity < 1 {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        // Price snapshot, taken once; the row keeps this value even if the
        // ticket type is repriced later.
        let total_price = pricing::compute_total(ticket_type.price, quantity);

        let admission = self
            .store
            .admit_booking(NewBooking {
                booked_by: user.id,
                event_id: event.id,
                ticket_type_id: ticket_type.id,
                quantity,
                total_price,
            })
            .await?;

        match admission {
            Admission::Admitted(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    event_id = %event.id,
                    ticket_type_id = %ticket_type.id,
                    quantity,
                    "Booking admitted"
                );
                Ok(booking)
            }
            Admission::TicketTypeExhausted { available } => Err(AppError::CapacityError(format!(
                "Only {available} tickets available for this ticket type"
            ))),
            Admission::EventFull { remaining } => Err(AppError::CapacityError(format!(
                "Only {remaining} tickets remaining for this event"
            ))),
        }
    }

    /// Cancels a booking owned by `user_id`. Cancelling a booking that is
    /// already Cancelled succeeds without touching the row: the requested
    /// end state already holds, and a retried cancel should not error.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Booking, AppError> {
        let booking = self.store.get_booking_for_user(booking_id, user_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let cancelled = self
            .store
            .set_booking_status(booking.id, BookingStatus::Cancelled)
            .await?;
        tracing::info!(booking_id = %cancelled.id, "Booking cancelled");
        Ok(cancelled)
    }

    pub async fn get_user_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, AppError> {
        self.store.get_user(user_id).await?;
        Ok(self.store.list_user_bookings(user_id).await?)
    }

    /// Bookings across an event, visible only to the event's creator or an
    /// admin. The one role check inside the core: it protects booking data,
    /// which the core owns.
    pub async fn get_event_bookings(
        &self,
        event_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Vec<Booking>, AppError> {
        let event = self.store.get_event(event_id).await?;
        let requester = self.store.get_user(requester_id).await?;

        if event.created_by != requester.id && requester.role != UserRole::Admin {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(self.store.list_event_bookings(event_id).await?)
    }
}
