// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use auth_cell::models::DoctorListing;
use shared_models::AppError;

use crate::models::{AppointmentError, AppointmentState, SlotQuery, SlotsResponse};
use crate::services::slots::SlotAllocator;

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppointmentState>>,
) -> Json<Vec<DoctorListing>> {
    Json(state.directory.listings())
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let doctor = query.doctor.filter(|d| !d.trim().is_empty());
    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_date(&d))
        .transpose()?
        .map(|d| SlotAllocator::check_date(d, Utc::now().date_naive()))
        .transpose()?;

    if let Some(doctor) = &doctor {
        if !state.directory.is_bookable(doctor) {
            return Err(AppointmentError::UnknownDoctor(doctor.clone()).into());
        }
    }

    debug!("Listing slots for doctor {:?} on {:?}", doctor, date);

    let roster = state.roster.read().await;
    let slots = roster.available_slots(doctor.as_deref(), date);

    Ok(Json(SlotsResponse {
        total: slots.len(),
        doctor,
        date,
        slots,
    }))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppointmentError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppointmentError::InvalidDate(raw.to_string()))
}
