//! # Assistant Cell
//!
//! The generative-AI collaborator behind the intake flow. It turns a chief
//! complaint into follow-up questions and turns the finished questionnaire
//! into a doctor summary plus self-care tips.
//!
//! The flow only depends on the [`IntakeAssistant`] trait; [`GeminiAssistant`]
//! implements it against the Gemini `generateContent` REST endpoint in JSON
//! mode.
pub mod models;
pub mod services;

pub use models::{AssistantError, SummaryRequest, SummaryResult, READY_FOR_REVIEW};
pub use services::gemini::GeminiAssistant;
pub use services::IntakeAssistant;
