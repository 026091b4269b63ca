//! The capacity ledger: read-side aggregation over booking rows.
//!
//! Counts are re-derived from the booking table on every call. No counter is
//! cached anywhere, so a read is always consistent with whatever the storage
//! backend has committed at that instant.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, TicketType};
use crate::store::EventStore;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct CapacityLedger {
    store: Arc<dyn EventStore>,
}

/// Availability of a single ticket type, as served to prospective buyers.
#[derive(Debug, Serialize)]
pub struct TierAvailability {
    pub ticket_type: TicketType,
    pub booked: i64,
    pub available: i64,
}

impl CapacityLedger {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Units of a ticket type currently committed by Booked rows.
    pub async fn booked_units(&self, ticket_type_id: Uuid) -> Result<i64, AppError> {
        Ok(self.store.booked_units(ticket_type_id).await?)
    }

    /// `limit − booked`, clamped at zero.
    pub async fn available_units(&self, ticket_type: &TicketType) -> Result<i64, AppError> {
        let booked = self.store.booked_units(ticket_type.id).await?;
        Ok((i64::from(ticket_type.limit) - booked).max(0))
    }

    /// Units committed across all of an event's ticket types.
    pub async fn event_booked_units(&self, event_id: Uuid) -> Result<i64, AppError> {
        Ok(self.store.event_booked_units(event_id).await?)
    }

    /// `capacity − booked`, unclamped. Callers clamp at the display edge.
    pub async fn event_remaining_capacity(&self, event: &Event) -> Result<i64, AppError> {
        let booked = self.store.event_booked_units(event.id).await?;
        Ok(i64::from(event.capacity) - booked)
    }

    pub async fn ticket_type_availability(
        &self,
        ticket_type_id: Uuid,
    ) -> Result<TierAvailability, AppError> {
        let ticket_type = self.store.get_ticket_type(ticket_type_id).await?;
        let booked = self.store.booked_units(ticket_type.id).await?;
        let available = (i64::from(ticket_type.limit) - booked).max(0);
        Ok(TierAvailability {
            ticket_type,
            booked,
            available,
        })
    }
}
