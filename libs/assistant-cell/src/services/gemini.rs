use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::models::{
    AssistantError, SummaryPayload, SummaryRequest, SummaryResult, READY_FOR_REVIEW,
};
use crate::services::prompts;
use crate::services::IntakeAssistant;

const MIN_QUESTIONS: usize = 5;
const MAX_QUESTIONS: usize = 8;

pub struct GeminiAssistant {
    api_key: String,
    model: String,
    base_url: String,
    http_client: Client,
}

impl GeminiAssistant {
    pub fn new(config: &AppConfig) -> Result<Self, AssistantError> {
        let http_client = Client::builder()
            .timeout(config.ai_request_timeout())
            .build()?;

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends one JSON-mode prompt and deserializes the model's text output.
    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> Result<T, AssistantError> {
        if self.api_key.is_empty() {
            return Err(AssistantError::NotConfigured(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, error_text);
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let ai_response: Value = response.json().await?;
        let text = ai_response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AssistantError::MalformedResponse("response has no candidate text".to_string())
            })?;

        serde_json::from_str(text.trim())
            .map_err(|e| AssistantError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl IntakeAssistant for GeminiAssistant {
    async fn generate_questions(&self, complaint: &str) -> Result<Vec<String>, AssistantError> {
        debug!("Generating intake questions for complaint of {} chars", complaint.len());

        let questions: Vec<String> = self
            .generate_json(prompts::questions_prompt(complaint), prompts::questions_schema())
            .await?;

        if questions.is_empty() {
            return Err(AssistantError::MalformedResponse(
                "no questions were generated".to_string(),
            ));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&questions.len()) {
            warn!(
                "Expected {}-{} questions, got {}",
                MIN_QUESTIONS,
                MAX_QUESTIONS,
                questions.len()
            );
        }

        Ok(questions)
    }

    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryResult, AssistantError> {
        debug!(
            "Generating summary for patient {} from {} answers",
            request.patient_id,
            request.qa_pairs.len()
        );

        let payload: SummaryPayload = self
            .generate_json(prompts::summary_prompt(request), prompts::summary_schema())
            .await?;

        if !payload.doctor_summary.summary_paragraph.trim_end().ends_with(READY_FOR_REVIEW) {
            warn!("Summary for patient {} is missing the review sentinel", request.patient_id);
        }

        Ok(payload.into())
    }
}
