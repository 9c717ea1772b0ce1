// libs/intake-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

use appointment_cell::DashboardEntry;
use shared_models::{AppError, PatientInfo};

use crate::models::{
    AnswerRequest, AppointmentDraftUpdate, ComplaintRequest, DoctorLoginRequest, FollowUpRequest,
    IntakeState, RoleRequest, SessionView,
};
use crate::services::flow::AnswerOutcome;

// Lock order everywhere below: session first, then the roster. Neither lock
// is held across a call to the assistant.

// ==============================================================================
// SESSION LIFECYCLE
// ==============================================================================

#[axum::debug_handler]
pub async fn create_session(
    State(state): State<Arc<IntakeState>>,
) -> (StatusCode, Json<SessionView>) {
    let (_, flow) = state.sessions.create().await;
    let flow = flow.lock().await;
    let roster = state.roster.read().await;
    (StatusCode::CREATED, Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let flow = flow.lock().await;
    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn close_session(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let flow = state.sessions.remove(session_id).await?;
    let mut flow = flow.lock().await;
    let mut roster = state.roster.write().await;
    flow.logout(&mut roster);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    let mut roster = state.roster.write().await;
    flow.logout(&mut roster);
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn acknowledge_error(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    flow.acknowledge_error();
    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

// ==============================================================================
// PATIENT AND DOCTOR ENTRY
// ==============================================================================

#[axum::debug_handler]
pub async fn choose_role(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    flow.choose_role(request.role)?;

    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn doctor_login(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DoctorLoginRequest>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    flow.doctor_login(&state.directory, &request.email, &request.password)?;

    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn submit_info(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(info): Json<PatientInfo>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    flow.submit_info(info)?;

    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

// ==============================================================================
// APPOINTMENT BOOKING
// ==============================================================================

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<AppointmentDraftUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    let roster = state.roster.read().await;

    let slots = flow.update_draft(&roster, &state.directory, update)?;
    debug!("Session {} has {} slots on offer", session_id, slots.len());

    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn submit_appointment(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<AppointmentDraftUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    let mut roster = state.roster.write().await;

    flow.submit_appointment(&mut roster, &state.directory, update)?;
    Ok(Json(flow.view(&roster)))
}

// ==============================================================================
// COMPLAINT, QUESTIONS AND SUMMARY
// ==============================================================================

#[axum::debug_handler]
pub async fn submit_complaint(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ComplaintRequest>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let call = flow.lock().await.begin_complaint(&request.complaint)?;

    let result = state.assistant.generate_questions(&call.complaint).await;

    let mut flow = flow.lock().await;
    flow.finish_complaint(call.ticket, result)?;

    let roster = state.roster.read().await;
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let outcome = flow.lock().await.submit_answer(&request.answer)?;

    let call = match outcome {
        AnswerOutcome::Next { .. } => {
            let flow = flow.lock().await;
            let roster = state.roster.read().await;
            return Ok(Json(flow.view(&roster)));
        }
        AnswerOutcome::Summarize(call) => call,
    };

    let result = state.assistant.generate_summary(&call.request).await;

    let mut flow = flow.lock().await;
    let mut roster = state.roster.write().await;
    flow.finish_summary(&mut roster, call.ticket, result)?;

    info!("Session {} finished intake for {}", session_id, call.request.patient_id);
    Ok(Json(flow.view(&roster)))
}

#[axum::debug_handler]
pub async fn submit_follow_up(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<FollowUpRequest>,
) -> Result<Json<SessionView>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let mut flow = flow.lock().await;
    let mut roster = state.roster.write().await;

    flow.submit_follow_up(&mut roster, &request.question)?;
    Ok(Json(flow.view(&roster)))
}

// ==============================================================================
// DOCTOR DASHBOARD
// ==============================================================================

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<IntakeState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<DashboardEntry>>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let flow = flow.lock().await;
    let roster = state.roster.read().await;

    Ok(Json(flow.dashboard(&roster)?))
}

#[axum::debug_handler]
pub async fn get_dashboard_entry(
    State(state): State<Arc<IntakeState>>,
    Path((session_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DashboardEntry>, AppError> {
    let flow = state.sessions.get(session_id).await?;
    let flow = flow.lock().await;
    let roster = state.roster.read().await;

    Ok(Json(flow.dashboard_entry(&roster, booking_id)?))
}
