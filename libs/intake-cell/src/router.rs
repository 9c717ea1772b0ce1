// libs/intake-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::models::IntakeState;

pub fn intake_routes(state: Arc<IntakeState>) -> Router {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::close_session),
        )
        .route("/sessions/{session_id}/role", post(handlers::choose_role))
        .route("/sessions/{session_id}/doctor-login", post(handlers::doctor_login))
        .route("/sessions/{session_id}/info", post(handlers::submit_info))
        .route(
            "/sessions/{session_id}/appointment",
            post(handlers::submit_appointment).patch(handlers::update_appointment),
        )
        .route("/sessions/{session_id}/complaint", post(handlers::submit_complaint))
        .route("/sessions/{session_id}/answers", post(handlers::submit_answer))
        .route("/sessions/{session_id}/follow-up", post(handlers::submit_follow_up))
        .route(
            "/sessions/{session_id}/acknowledge-error",
            post(handlers::acknowledge_error),
        )
        .route("/sessions/{session_id}/logout", post(handlers::logout))
        .route("/sessions/{session_id}/dashboard", get(handlers::get_dashboard))
        .route(
            "/sessions/{session_id}/dashboard/{booking_id}",
            get(handlers::get_dashboard_entry),
        )
        .with_state(state)
}
