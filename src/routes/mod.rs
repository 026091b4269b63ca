use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{bookings, health_check, tickets, AppState};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/events/:event_id/ticket-types",
            post(tickets::create_ticket_type).get(tickets::list_event_ticket_types),
        )
        .route(
            "/ticket-types/:ticket_type_id",
            patch(tickets::update_ticket_type).delete(tickets::delete_ticket_type),
        )
        .route(
            "/ticket-types/:ticket_type_id/availability",
            get(tickets::ticket_type_availability),
        )
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::get_user_bookings),
        )
        .route("/bookings/:booking_id/cancel", patch(bookings::cancel_booking))
        .route("/events/:event_id/bookings", get(bookings::get_event_bookings))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
