use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_category")]
pub enum TicketCategory {
    #[serde(rename = "VIP")]
    #[sqlx(rename = "VIP")]
    Vip,
    Regular,
    Student,
}

/// A priced tier of tickets for an event. `limit` caps the units of this
/// tier that can ever be in Booked state at once; the registry keeps the sum
/// of all limits for an event within the event's capacity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub category: TicketCategory,
    pub price: Decimal,
    #[sqlx(rename = "unit_limit")]
    pub limit: i32,
    /// Opaque dynamic-pricing rule blob; stored and returned verbatim, never
    /// interpreted by the booking core.
    pub dynamic_pricing_rules: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a ticket type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTicketType {
    pub category: TicketCategory,
    pub price: Decimal,
    pub limit: i32,
    pub dynamic_pricing_rules: Option<Value>,
}

/// Allow-listed update for a ticket type. Unknown fields are rejected at
/// deserialization; anything not named here is immutable through the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketTypePatch {
    pub category: Option<TicketCategory>,
    pub price: Option<Decimal>,
    pub limit: Option<i32>,
    pub dynamic_pricing_rules: Option<Value>,
}
