// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::models::AppointmentState;

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route("/slots", get(handlers::get_available_slots))
        .with_state(state)
}
