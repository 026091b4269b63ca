use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::services::{BookingService, CapacityLedger, TicketRegistry};
use crate::store::EventStore;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod bookings;
pub mod tickets;

/// Shared application state: the three core services over one storage port.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub ledger: CapacityLedger,
    pub registry: TicketRegistry,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            ledger: CapacityLedger::new(store.clone()),
            registry: TicketRegistry::new(store.clone()),
            bookings: BookingService::new(store.clone()),
            store,
        }
    }
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    backend: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.health_check().await {
        Ok(()) => success(
            HealthPayload {
                status: "ok",
                service: "tessera-api",
                backend: state.store.backend_name(),
            },
            "Health check successful",
        )
        .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
