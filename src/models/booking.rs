use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

/// A committed booking. Everything except `status` is immutable once the row
/// exists; `total_price` is the price snapshot taken at admission time and
/// survives later ticket-type price changes. Only Booked rows count toward
/// capacity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub booked_by: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// An admission request handed to the storage layer. The store assigns the
/// id and timestamp and sets the status to Booked, but only after the
/// capacity checks pass inside its atomic region.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booked_by: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}
