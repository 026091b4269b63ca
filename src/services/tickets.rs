//! The ticket-type registry.
//!
//! Owns the structural invariant that an event's ticket-type limits can
//! never add up to more than the event's capacity, independent of how many
//! bookings actually exist. Both capacity checks run on every create and
//! update; updates exclude the type's own prior contribution from the sum.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{NewTicketType, TicketType, TicketTypePatch};
use crate::store::EventStore;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct TicketRegistry {
    store: Arc<dyn EventStore>,
}

impl TicketRegistry {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Ticket types of an event, oldest first.
    pub async fn list_event_ticket_types(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<TicketType>, AppError> {
        self.store.get_event(event_id).await?;
        Ok(self.store.list_ticket_types(event_id).await?)
    }

    pub async fn create_ticket_type(
        &self,
        event_id: Uuid,
        definition: NewTicketType,
    ) -> Result<TicketType, AppError> {
        let event = self.store.get_event(event_id).await?;

        if definition.limit <= 0 {
            return Err(AppError::ValidationError(
                "Ticket limit must be a positive integer".to_string(),
            ));
        }
        if definition.price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Ticket price cannot be negative".to_string(),
            ));
        }

        if definition.limit > event.capacity {
            return Err(AppError::CapacityError(format!(
                "Ticket limit cannot exceed event capacity ({})",
                event.capacity
            )));
        }

        let existing = self.store.list_ticket_types(event_id).await?;
        let existing_total: i64 = existing.iter().map(|t| i64::from(t.limit)).sum();
        let new_total = existing_total + i64::from(definition.limit);
        if new_total > i64::from(event.capacity) {
            return Err(AppError::CapacityError(format!(
                "Total ticket limit ({new_total}) exceeds event capacity ({})",
                event.capacity
            )));
        }

        let now = Utc::now();
        let ticket_type = TicketType {
            id: Uuid::new_v4(),
            event_id,
            category: definition.category,
            price: definition.price,
            limit: definition.limit,
            dynamic_pricing_rules: definition.dynamic_pricing_rules,
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.create_ticket_type(ticket_type).await?)
    }

    pub async fn update_ticket_type(
        &self,
        ticket_type_id: Uuid,
        patch: TicketTypePatch,
    ) -> Result<TicketType, AppError> {
        let mut current = self.store.get_ticket_type(ticket_type_id).await?;
        let event = self.store.get_event(current.event_id).await?;

        let new_limit = patch.limit.unwrap_or(current.limit);
        if new_limit <= 0 {
            return Err(AppError::ValidationError(
                "Ticket limit must be a positive integer".to_string(),
            ));
        }
        if let Some(price) = patch.price {
            if price < Decimal::ZERO {
                return Err(AppError::ValidationError(
                    "Ticket price cannot be negative".to_string(),
                ));
            }
        }

        if new_limit > event.capacity {
            return Err(AppError::CapacityError(format!(
                "Ticket limit cannot exceed event capacity ({})",
                event.capacity
            )));
        }

        // Sum the siblings, excluding this type's own prior limit.
        let siblings = self.store.list_ticket_types(event.id).await?;
        let other_total: i64 = siblings
            .iter()
            .filter(|t| t.id != ticket_type_id)
            .map(|t| i64::from(t.limit))
            .sum();
        let new_total = other_total + i64::from(new_limit);
        if new_total > i64::from(event.capacity) {
            return Err(AppError::CapacityError(format!(
                "Total ticket limits ({new_total}) exceed event capacity ({})",
                event.capacity
            )));
        }

        if let Some(category) = patch.category {
            current.category = category;
        }
        if let Some(price) = patch.price {
            current.price = price;
        }
        current.limit = new_limit;
        if let Some(rules) = patch.dynamic_pricing_rules {
            current.dynamic_pricing_rules = Some(rules);
        }
        current.updated_at = Utc::now();

        Ok(self.store.update_ticket_type(current).await?)
    }

    /// Deletes a ticket type and returns the event capacity that becomes
    /// free, a derived value for caller display. Any booking row referencing
    /// the type blocks deletion, Cancelled ones included: the row is still
    /// an audit record even though its units no longer count.
    pub async fn delete_ticket_type(&self, ticket_type_id: Uuid) -> Result<i64, AppError> {
        let ticket_type = self.store.get_ticket_type(ticket_type_id).await?;
        let event = self.store.get_event(ticket_type.event_id).await?;

        let rows = self
            .store
            .booking_rows_for_ticket_type(ticket_type_id)
            .await?;
        if rows > 0 {
            return Err(AppError::Conflict(
                "Cannot delete ticket type because bookings exist for this ticket type".to_string(),
            ));
        }

        self.store.delete_ticket_type(ticket_type_id).await?;

        let committed = self.store.event_booked_units(event.id).await?;
        Ok((i64::from(event.capacity) - committed) + i64::from(ticket_type.limit))
    }
}
