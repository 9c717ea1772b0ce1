use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    AppointmentDetails, BookingRecord, ConsultType, DoctorSummary, PatientInfo, QaPair, TimeSlot,
};

pub struct TestConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: "test-gemini-key".to_string(),
            gemini_model: "gemini-test".to_string(),
            gemini_base_url: "http://localhost:8089".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            gemini_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            ai_request_timeout_secs: 5,
            server_port: 0,
            ..AppConfig::default()
        }
    }
}

pub struct TestPatient;

impl TestPatient {
    pub fn info() -> PatientInfo {
        PatientInfo {
            name: "Jane Doe".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "jane.doe@example.com".to_string(),
        }
    }

    pub fn json() -> Value {
        json!({
            "name": "Jane Doe",
            "phone": "(555) 123-4567",
            "email": "jane.doe@example.com"
        })
    }
}

pub struct TestBooking;

impl TestBooking {
    pub fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date must be YYYY-MM-DD")
    }

    /// A bookable date `days` from today, as `YYYY-MM-DD`.
    pub fn days_ahead(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    pub fn slot(raw: &str) -> TimeSlot {
        raw.parse().expect("test slot must be on the grid")
    }

    pub fn appointment(doctor: &str, date: &str, time: &str) -> AppointmentDetails {
        AppointmentDetails {
            doctor: doctor.to_string(),
            date: Self::date(date),
            time: Self::slot(time),
            consult_type: ConsultType::InPerson,
        }
    }

    pub fn record(doctor: &str, date: &str, time: &str) -> BookingRecord {
        BookingRecord {
            id: Uuid::new_v4(),
            patient_id: "P123456".to_string(),
            info: TestPatient::info(),
            chief_complaint: "Persistent headache".to_string(),
            appointment: Self::appointment(doctor, date, time),
            qa_pairs: vec![QaPair {
                question: "Do you have any allergies?".to_string(),
                answer: "Penicillin".to_string(),
            }],
            doctor_summary: DoctorSummary {
                summary_paragraph: "Headache for three days. Ready for review.".to_string(),
                allergies: vec!["Penicillin".to_string()],
            },
            self_care_tips: "- Rest\n- Stay hydrated".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Canned Gemini `generateContent` bodies.
pub struct MockGeminiResponses;

impl MockGeminiResponses {
    /// Wraps `payload` the way Gemini returns JSON-mode output: as text inside
    /// the first candidate.
    pub fn wrap(payload: &Value) -> Value {
        Self::wrap_text(&payload.to_string())
    }

    pub fn wrap_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                },
                "finishReason": "STOP"
            }]
        })
    }

    pub fn questions(questions: &[&str]) -> Value {
        Self::wrap(&json!(questions))
    }

    pub fn default_questions() -> Vec<&'static str> {
        vec![
            "How long have you had the headache?",
            "On a scale of 1 to 10, how severe is the pain?",
            "Do you have any allergies to medicines, food, or other substances?",
            "Have you taken anything for the pain?",
            "Does light or noise make it worse?",
        ]
    }

    pub fn summary(paragraph: &str, allergies: &[&str], tips: &str) -> Value {
        Self::wrap(&json!({
            "doctorSummary": {
                "summaryParagraph": paragraph,
                "allergies": allergies
            },
            "selfCareTips": tips
        }))
    }

    pub fn default_summary() -> Value {
        Self::summary(
            "Patient reports a three-day headache rated 6/10, worse with light. Ready for review.",
            &["Penicillin"],
            "- Rest in a dark room\n- Stay hydrated\n- Limit screen time",
        )
    }
}
