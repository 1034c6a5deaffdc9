use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app_state::AppState;

use super::handlers;

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/availability", post(handlers::set_availability))
        .route(
            "/professor/{id}/availability",
            get(handlers::get_availability),
        )
        .route("/appointments/book", post(handlers::book_appointment))
        .route("/appointments/mine", get(handlers::my_appointments))
        .route(
            "/appointments/professor",
            get(handlers::professor_appointments),
        )
        .route("/appointments/{id}", get(handlers::appointment_by_id))
        .route(
            "/appointments/{id}/cancel",
            put(handlers::cancel_appointment),
        )
}
