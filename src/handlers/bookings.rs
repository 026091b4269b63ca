use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::utils::error::AppError;
use crate::utils::identity::CallerIdentity;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookingPayload {
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub quantity: i32,
}

pub async fn create_booking(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<Response, AppError> {
    let booking = state
        .bookings
        .create_booking(
            caller.user_id,
            payload.event_id,
            payload.ticket_type_id,
            payload.quantity,
        )
        .await?;
    Ok(created(booking, "Booking created successfully").into_response())
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    caller: CallerIdentity,
) -> Result<Response, AppError> {
    let booking = state
        .bookings
        .cancel_booking(booking_id, caller.user_id)
        .await?;
    Ok(success(booking, "Booking cancelled successfully").into_response())
}

pub async fn get_user_bookings(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Response, AppError> {
    let bookings = state.bookings.get_user_bookings(caller.user_id).await?;
    Ok(success(bookings, "Bookings retrieved successfully").into_response())
}

pub async fn get_event_bookings(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    caller: CallerIdentity,
) -> Result<Response, AppError> {
    let bookings = state
        .bookings
        .get_event_bookings(event_id, caller.user_id)
        .await?;
    Ok(success(bookings, "Event bookings retrieved successfully").into_response())
}
