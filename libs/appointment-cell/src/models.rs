// libs/appointment-cell/src/models.rs
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth_cell::DoctorDirectory;
use shared_models::{AppError, BookingRecord, TimeSlot};

use crate::services::roster::SharedRoster;

/// Identifies the intake session that owns a slot hold.
pub type SessionKey = Uuid;

#[derive(Clone)]
pub struct AppointmentState {
    pub roster: SharedRoster,
    pub directory: Arc<DoctorDirectory>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Query for the slot listing. Empty strings count as "not chosen yet".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotQuery {
    pub doctor: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotsResponse {
    pub doctor: Option<String>,
    pub date: Option<NaiveDate>,
    pub slots: Vec<TimeSlot>,
    pub total: usize,
}

/// A booking as shown on a doctor's dashboard, joined with the follow-up
/// question the patient left after their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardEntry {
    #[serde(flatten)]
    pub record: BookingRecord,
    pub follow_up_question: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("{time} on {date} with {doctor} is no longer available")]
    SlotNotAvailable {
        doctor: String,
        date: NaiveDate,
        time: TimeSlot,
    },

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Booking {0} already exists")]
    DuplicateBooking(Uuid),

    #[error("A follow-up question was already recorded for booking {0}")]
    FollowUpAlreadyRecorded(Uuid),

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Invalid appointment date: {0}")]
    InvalidDate(String),

    #[error("{0} has already passed. Please select a date from today onward.")]
    PastDate(NaiveDate),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::SlotNotAvailable { .. }
            | AppointmentError::DuplicateBooking(_)
            | AppointmentError::FollowUpAlreadyRecorded(_) => AppError::Conflict(err.to_string()),
            AppointmentError::BookingNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::UnknownDoctor(_)
            | AppointmentError::InvalidDate(_)
            | AppointmentError::PastDate(_) => {
                AppError::ValidationError(err.to_string())
            }
        }
    }
}
