//! In-memory implementation of the booking store.
//!
//! Exists for tests and dependency-free local development; nothing survives
//! a restart. All state sits behind a single `tokio::sync::RwLock`, so every
//! mutation is serialized: `admit_booking` re-aggregates and inserts while
//! holding the write lock, which is exactly the single-writer arbiter the
//! admission contract asks the backend to provide. Aggregates scan the
//! booking map on every call; fine at test scale.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Admission, EventStore, StoreError, StoreResult};
use crate::models::{Booking, BookingStatus, Event, NewBooking, TicketType, User};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    ticket_types: HashMap<Uuid, TicketType>,
    bookings: HashMap<Uuid, Booking>,
}

impl State {
    fn booked_units(&self, ticket_type_id: Uuid) -> i64 {
        self.bookings
            .values()
            .filter(|b| b.ticket_type_id == ticket_type_id && b.status == BookingStatus::Booked)
            .map(|b| i64::from(b.quantity))
            .sum()
    }

    fn event_booked_units(&self, event_id: Uuid) -> i64 {
        self.bookings
            .values()
            .filter(|b| b.event_id == event_id && b.status == BookingStatus::Booked)
            .map(|b| i64::from(b.quantity))
            .sum()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user. Users are owned by the authentication collaborator in
    /// the full system; tests and dev harnesses plant them directly.
    pub async fn put_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Seed an event. Events are owned by the event-management collaborator;
    /// the booking core treats them as read-only.
    pub async fn put_event(&self, event: Event) {
        self.state.write().await.events.insert(event.id, event);
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<User> {
        self.state
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        self.state
            .read()
            .await
            .events
            .get(&event_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Event not found".to_string()))
    }

    async fn get_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<TicketType> {
        self.state
            .read()
            .await
            .ticket_types
            .get(&ticket_type_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))
    }

    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>> {
        let state = self.state.read().await;
        let mut types: Vec<TicketType> = state
            .ticket_types
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect();
        types.sort_by_key(|t| t.created_at);
        Ok(types)
    }

    async fn create_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType> {
        let mut state = self.state.write().await;
        state.ticket_types.insert(ticket_type.id, ticket_type.clone());
        Ok(ticket_type)
    }

    async fn update_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType> {
        let mut state = self.state.write().await;
        if !state.ticket_types.contains_key(&ticket_type.id) {
            return Err(StoreError::NotFound("Ticket type not found".to_string()));
        }
        state.ticket_types.insert(ticket_type.id, ticket_type.clone());
        Ok(ticket_type)
    }

    async fn delete_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .ticket_types
            .remove(&ticket_type_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))
    }

    async fn booking_rows_for_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .bookings
            .values()
            .filter(|b| b.ticket_type_id == ticket_type_id)
            .count() as i64)
    }

    async fn booked_units(&self, ticket_type_id: Uuid) -> StoreResult<i64> {
        Ok(self.state.read().await.booked_units(ticket_type_id))
    }

    async fn event_booked_units(&self, event_id: Uuid) -> StoreResult<i64> {
        Ok(self.state.read().await.event_booked_units(event_id))
    }

    async fn admit_booking(&self, request: NewBooking) -> StoreResult<Admission> {
        // Checks and insert all happen under the one write lock; concurrent
        // admissions serialize here.
        let mut state = self.state.write().await;

        let ticket_type = state
            .ticket_types
            .get(&request.ticket_type_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))?;
        let event = state
            .events
            .get(&request.event_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Event not found".to_string()))?;

        let available = i64::from(ticket_type.limit) - state.booked_units(ticket_type.id);
        if i64::from(request.quantity) > available {
            return Ok(Admission::TicketTypeExhausted {
                available: available.max(0),
            });
        }

        let remaining = i64::from(event.capacity) - state.event_booked_units(event.id);
        if i64::from(request.quantity) > remaining {
            return Ok(Admission::EventFull {
                remaining: remaining.max(0),
            });
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            booked_by: request.booked_by,
            event_id: request.event_id,
            ticket_type_id: request.ticket_type_id,
            quantity: request.quantity,
            total_price: request.total_price,
            status: BookingStatus::Booked,
            created_at: Utc::now(),
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(Admission::Admitted(booking))
    }

    async fn get_booking_for_user(&self, booking_id: Uuid, user_id: Uuid) -> StoreResult<Booking> {
        self.state
            .read()
            .await
            .bookings
            .get(&booking_id)
            .filter(|b| b.booked_by == user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Booking not found".to_string()))
    }

    async fn set_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> StoreResult<Booking> {
        let mut state = self.state.write().await;
        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| StoreError::NotFound("Booking not found".to_string()))?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<Booking>> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.booked_by == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<Booking>> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
