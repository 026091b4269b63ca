use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::AppState;
use crate::models::{NewTicketType, TicketTypePatch};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn create_ticket_type(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<NewTicketType>,
) -> Result<Response, AppError> {
    let ticket_type = state.registry.create_ticket_type(event_id, payload).await?;
    Ok(created(ticket_type, "Ticket type created successfully").into_response())
}

pub async fn list_event_ticket_types(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket_types = state.registry.list_event_ticket_types(event_id).await?;
    Ok(success(ticket_types, "Ticket types retrieved successfully").into_response())
}

pub async fn update_ticket_type(
    State(state): State<AppState>,
    Path(ticket_type_id): Path<Uuid>,
    Json(patch): Json<TicketTypePatch>,
) -> Result<Response, AppError> {
    let ticket_type = state
        .registry
        .update_ticket_type(ticket_type_id, patch)
        .await?;
    Ok(success(ticket_type, "Ticket type updated successfully").into_response())
}

#[derive(Serialize)]
struct DeletedTicketType {
    remaining_capacity: i64,
}

pub async fn delete_ticket_type(
    State(state): State<AppState>,
    Path(ticket_type_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let remaining_capacity = state.registry.delete_ticket_type(ticket_type_id).await?;
    Ok(success(
        DeletedTicketType { remaining_capacity },
        "Ticket type deleted successfully",
    )
    .into_response())
}

pub async fn ticket_type_availability(
    State(state): State<AppState>,
    Path(ticket_type_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let availability = state.ledger.ticket_type_availability(ticket_type_id).await?;
    Ok(success(availability, "Availability retrieved successfully").into_response())
}
