use serde::{Deserialize, Serialize};

use shared_models::{AppError, DoctorSummary, PatientInfo, QaPair};

/// Closing sentence every doctor summary paragraph is asked to end with.
pub const READY_FOR_REVIEW: &str = "Ready for review.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRequest {
    pub patient_id: String,
    pub info: PatientInfo,
    pub chief_complaint: String,
    pub qa_pairs: Vec<QaPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub doctor_summary: DoctorSummary,
    pub self_care_tips: String,
}

// Wire shape of the summarization output.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryPayload {
    pub doctor_summary: DoctorSummaryPayload,
    pub self_care_tips: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DoctorSummaryPayload {
    pub summary_paragraph: String,
    pub allergies: Vec<String>,
}

impl From<SummaryPayload> for SummaryResult {
    fn from(payload: SummaryPayload) -> Self {
        Self {
            doctor_summary: DoctorSummary {
                summary_paragraph: payload.doctor_summary.summary_paragraph,
                allergies: payload.doctor_summary.allergies,
            },
            self_care_tips: payload.self_care_tips,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("Assistant request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistant returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Assistant returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::NotConfigured(msg) => AppError::Internal(msg),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}
