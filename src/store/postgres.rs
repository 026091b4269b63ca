//! Postgres implementation of the booking store.
//!
//! Reads are plain aggregate queries; nothing is cached between calls.
//! `admit_booking` wraps its checks and the insert in one transaction and
//! takes `FOR UPDATE` row locks — the event row first, then the ticket-type
//! row, always in that order — so concurrent admissions against the same
//! event serialize at the database and the re-aggregated sums cannot go
//! stale between check and insert.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Admission, EventStore, StoreError, StoreResult};
use crate::models::{Booking, BookingStatus, Event, NewBooking, TicketType, User};

const SELECT_EVENT: &str = "SELECT id, created_by, title, description, location, category, \
     capacity, start_time, created_at, updated_at FROM events WHERE id = $1";

const SELECT_TICKET_TYPE: &str = "SELECT id, event_id, category, price, unit_limit, \
     dynamic_pricing_rules, created_at, updated_at FROM ticket_types WHERE id = $1";

const SELECT_BOOKING: &str = "SELECT id, booked_by, event_id, ticket_type_id, quantity, \
     total_price, status, created_at FROM bookings";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        sqlx::query_as::<_, Event>(SELECT_EVENT)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Event not found".to_string()))
    }

    async fn get_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<TicketType> {
        sqlx::query_as::<_, TicketType>(SELECT_TICKET_TYPE)
            .bind(ticket_type_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))
    }

    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>> {
        let types = sqlx::query_as::<_, TicketType>(
            "SELECT id, event_id, category, price, unit_limit, dynamic_pricing_rules, \
             created_at, updated_at FROM ticket_types WHERE event_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    async fn create_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType> {
        let created = sqlx::query_as::<_, TicketType>(
            "INSERT INTO ticket_types \
             (id, event_id, category, price, unit_limit, dynamic_pricing_rules, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, event_id, category, price, unit_limit, dynamic_pricing_rules, \
             created_at, updated_at",
        )
        .bind(ticket_type.id)
        .bind(ticket_type.event_id)
        .bind(ticket_type.category)
        .bind(ticket_type.price)
        .bind(ticket_type.limit)
        .bind(ticket_type.dynamic_pricing_rules)
        .bind(ticket_type.created_at)
        .bind(ticket_type.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_ticket_type(&self, ticket_type: TicketType) -> StoreResult<TicketType> {
        sqlx::query_as::<_, TicketType>(
            "UPDATE ticket_types SET category = $2, price = $3, unit_limit = $4, \
             dynamic_pricing_rules = $5, updated_at = $6 WHERE id = $1 \
             RETURNING id, event_id, category, price, unit_limit, dynamic_pricing_rules, \
             created_at, updated_at",
        )
        .bind(ticket_type.id)
        .bind(ticket_type.category)
        .bind(ticket_type.price)
        .bind(ticket_type.limit)
        .bind(ticket_type.dynamic_pricing_rules)
        .bind(ticket_type.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))
    }

    async fn delete_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(ticket_type_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Ticket type not found".to_string()));
        }
        Ok(())
    }

    async fn booking_rows_for_ticket_type(&self, ticket_type_id: Uuid) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE ticket_type_id = $1")
                .bind(ticket_type_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn booked_units(&self, ticket_type_id: Uuid) -> StoreResult<i64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM bookings \
             WHERE ticket_type_id = $1 AND status = 'Booked'",
        )
        .bind(ticket_type_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    async fn event_booked_units(&self, event_id: Uuid) -> StoreResult<i64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM bookings \
             WHERE event_id = $1 AND status = 'Booked'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    async fn admit_booking(&self, request: NewBooking) -> StoreResult<Admission> {
        let mut tx = self.pool.begin().await?;

        // Lock order is fixed (event, then ticket type) so concurrent
        // admissions cannot deadlock against each other.
        let event = sqlx::query_as::<_, Event>(&format!("{SELECT_EVENT} FOR UPDATE"))
            .bind(request.event_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound("Event not found".to_string()))?;
        let ticket_type =
            sqlx::query_as::<_, TicketType>(&format!("{SELECT_TICKET_TYPE} FOR UPDATE"))
                .bind(request.ticket_type_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::NotFound("Ticket type not found".to_string()))?;

        let booked: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM bookings \
             WHERE ticket_type_id = $1 AND status = 'Booked'",
        )
        .bind(ticket_type.id)
        .fetch_one(&mut *tx)
        .await?;
        let available = i64::from(ticket_type.limit) - booked;
        if i64::from(request.quantity) > available {
            // Dropping the transaction rolls it back.
            return Ok(Admission::TicketTypeExhausted {
                available: available.max(0),
            });
        }

        let event_booked: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM bookings \
             WHERE event_id = $1 AND status = 'Booked'",
        )
        .bind(event.id)
        .fetch_one(&mut *tx)
        .await?;
        let remaining = i64::from(event.capacity) - event_booked;
        if i64::from(request.quantity) > remaining {
            return Ok(Admission::EventFull {
                remaining: remaining.max(0),
            });
        }

        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings \
             (id, booked_by, event_id, ticket_type_id, quantity, total_price, status, created_at) \
             VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, 'Booked', now()) \
             RETURNING id, booked_by, event_id, ticket_type_id, quantity, total_price, \
             status, created_at",
        )
        .bind(request.booked_by)
        .bind(request.event_id)
        .bind(request.ticket_type_id)
        .bind(request.quantity)
        .bind(request.total_price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Admission::Admitted(booking))
    }

    async fn get_booking_for_user(&self, booking_id: Uuid, user_id: Uuid) -> StoreResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING} WHERE id = $1 AND booked_by = $2"
        ))
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Booking not found".to_string()))
    }

    async fn set_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> StoreResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 \
             RETURNING id, booked_by, event_id, ticket_type_id, quantity, total_price, \
             status, created_at",
        )
        .bind(booking_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Booking not found".to_string()))
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING} WHERE booked_by = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "{SELECT_BOOKING} WHERE event_id = $1 ORDER BY created_at DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
