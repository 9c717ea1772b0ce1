use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::TimeSlot;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsultType {
    InPerson,
    Teleconsult,
}

impl fmt::Display for ConsultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsultType::InPerson => write!(f, "In-Person"),
            ConsultType::Teleconsult => write!(f, "Teleconsult"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub doctor: String,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub consult_type: ConsultType,
}

impl AppointmentDetails {
    /// True when both appointments occupy the same (doctor, date, slot) triple.
    pub fn same_slot(&self, other: &AppointmentDetails) -> bool {
        self.doctor == other.doctor && self.date == other.date && self.time == other.time
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub summary_paragraph: String,
    pub allergies: Vec<String>,
}

/// The artifact produced once a patient completes intake. Never mutated after
/// it has been appended to the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub patient_id: String,
    pub info: PatientInfo,
    pub chief_complaint: String,
    pub appointment: AppointmentDetails,
    pub qa_pairs: Vec<QaPair>,
    pub doctor_summary: DoctorSummary,
    pub self_care_tips: String,
    pub created_at: DateTime<Utc>,
}
