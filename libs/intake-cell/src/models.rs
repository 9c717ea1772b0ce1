// libs/intake-cell/src/models.rs
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use appointment_cell::{SessionKey, SharedRoster};
use assistant_cell::IntakeAssistant;
use auth_cell::DoctorDirectory;
use shared_models::{AppointmentDetails, ConsultType, PatientInfo, TimeSlot};

use crate::services::store::SessionStore;

// ==============================================================================
// STEPS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    #[default]
    Login,
    DoctorLogin,
    Info,
    AppointmentBooking,
    Complaint,
    Questions,
    Summary,
    Complete,
    DoctorDashboard,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Login => "LOGIN",
            Step::DoctorLogin => "DOCTOR_LOGIN",
            Step::Info => "INFO",
            Step::AppointmentBooking => "APPOINTMENT_BOOKING",
            Step::Complaint => "COMPLAINT",
            Step::Questions => "QUESTIONS",
            Step::Summary => "SUMMARY",
            Step::Complete => "COMPLETE",
            Step::DoctorDashboard => "DOCTOR_DASHBOARD",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Patient,
    Doctor,
}

/// What the front-end shows instead of the step while a collaborator call is
/// outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyIndicator {
    PreparingQuestions,
    GeneratingSummary,
    Thinking,
}

impl BusyIndicator {
    pub fn for_step(step: Step) -> Self {
        match step {
            Step::Complaint => BusyIndicator::PreparingQuestions,
            Step::Questions => BusyIndicator::GeneratingSummary,
            _ => BusyIndicator::Thinking,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusyIndicator::PreparingQuestions => "Preparing relevant questions...",
            BusyIndicator::GeneratingSummary => "Generating your summary and tips...",
            BusyIndicator::Thinking => "Thinking...",
        }
    }
}

// ==============================================================================
// SESSION STATE
// ==============================================================================

/// The booking form as filled in so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub doctor: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub consult_type: Option<ConsultType>,
}

/// A collaborator call the session is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    Questions { ticket: u64, complaint: String },
    Summary { ticket: u64, final_answer: String },
}

/// Everything one login session has collected. `Session::default()` is the
/// freshly initialised state that logout returns to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub step: Step,
    pub patient_id: Option<String>,
    pub patient_info: PatientInfo,
    pub chief_complaint: String,
    pub draft: AppointmentDraft,
    pub appointment: Option<AppointmentDetails>,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub current_question: usize,
    pub self_care_tips: String,
    pub error: Option<String>,
    pub doctor: Option<String>,
    pub booking_id: Option<Uuid>,
    pub pending: Option<PendingCall>,
}

// ==============================================================================
// SHARED STATE
// ==============================================================================

#[derive(Clone)]
pub struct IntakeState {
    pub sessions: SessionStore,
    pub roster: SharedRoster,
    pub directory: Arc<DoctorDirectory>,
    pub assistant: Arc<dyn IntakeAssistant>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorLoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial booking form update. An absent field keeps its current value, an
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDraftUpdate {
    #[serde(default, deserialize_with = "explicit_null")]
    pub doctor: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub time: Option<Option<TimeSlot>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub consult_type: Option<Option<ConsultType>>,
}

/// Only runs for keys present in the body, so `null` becomes `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintRequest {
    pub complaint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowUpRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusyView {
    pub indicator: BusyIndicator,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingFormView {
    pub draft: AppointmentDraft,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub text: String,
}

/// What the front-end needs to render the current step.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionKey,
    pub step: Step,
    pub busy: Option<BusyView>,
    pub error: Option<String>,
    pub patient_id: Option<String>,
    pub doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_form: Option<BookingFormView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_care_tips: Option<String>,
}
