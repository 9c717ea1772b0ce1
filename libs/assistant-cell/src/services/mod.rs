use async_trait::async_trait;

use crate::models::{AssistantError, SummaryRequest, SummaryResult};

pub mod gemini;
pub mod prompts;

/// Request/response contract of the intake collaborator.
#[async_trait]
pub trait IntakeAssistant: Send + Sync {
    /// Follow-up questions for a chief complaint, in the order they should be asked.
    async fn generate_questions(&self, complaint: &str) -> Result<Vec<String>, AssistantError>;

    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryResult, AssistantError>;
}
