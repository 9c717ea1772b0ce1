use thiserror::Error;
use uuid::Uuid;

use appointment_cell::AppointmentError;
use assistant_cell::AssistantError;
use shared_models::{AppError, FieldError};

use crate::models::{BusyIndicator, Step};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const QUESTIONS_FAILED: &str = "Sorry, I had trouble generating questions. Please start over.";
pub const SUMMARY_FAILED: &str = "Sorry, I had trouble generating the summary. Please try again.";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Cannot {action} while on step {step}")]
    InvalidTransition { step: Step, action: &'static str },

    #[error("Session is busy: {}", .0.label())]
    Busy(BusyIndicator),

    #[error("Invalid input")]
    Validation(Vec<FieldError>),

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{message}")]
    Assistant {
        message: &'static str,
        #[source]
        source: AssistantError,
    },

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error("The session was reset before the assistant replied")]
    StaleResult,

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Intake contract violated: {0}")]
    ContractViolation(&'static str),
}

impl IntakeError {
    pub fn field(field: &str, message: &str) -> Self {
        IntakeError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::InvalidTransition { .. } | IntakeError::Busy(_) | IntakeError::StaleResult => {
                AppError::Conflict(err.to_string())
            }
            IntakeError::Validation(fields) => AppError::InvalidFields(fields),
            IntakeError::InvalidCredentials => AppError::Auth(err.to_string()),
            IntakeError::Assistant { message, .. } => AppError::ExternalService(message.to_string()),
            IntakeError::Appointment(inner) => inner.into(),
            IntakeError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            IntakeError::ContractViolation(_) => AppError::Internal(err.to_string()),
        }
    }
}
