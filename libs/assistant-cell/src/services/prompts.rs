use serde_json::{json, Value};

use crate::models::{SummaryRequest, READY_FOR_REVIEW};

pub fn questions_prompt(complaint: &str) -> String {
    format!(
        "You are a medical intake assistant. A patient reports the following chief complaint: \"{complaint}\".\n\
         Generate between 5 and 8 concise, medically relevant follow-up questions to ask the patient one at a time.\n\
         Include one specific question about allergies to medicines, food, or other substances.\n\
         Do not ask for PII. The questions should be about symptoms, duration, pain level, and lifestyle factors.\n\
         Return the questions as a JSON array of strings."
    )
}

pub fn questions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

pub fn summary_prompt(request: &SummaryRequest) -> String {
    let qa_text = request
        .qa_pairs
        .iter()
        .map(|pair| format!("Q: {}\nA: {}", pair.question, pair.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a professional pre-appointment intake assistant for a medical clinic.\n\
         Based on the following patient information, generate two distinct pieces of content:\n\
         1. A \"Doctor Summary\": An object containing a paragraph summary and a list of identified allergies.\n\
         2. \"Pre-Appointment Self-Care Tips\": 3-5 very basic, non-medical suggestions for the patient.\n\n\
         Do not diagnose, prescribe, or mention urgency levels. Keep all outputs short and easy to read.\n\n\
         Patient Information:\n\
         - Patient ID: {patient_id}\n\
         - Name: {name}\n\
         - Contact: {phone}, {email}\n\
         - Chief Complaint: {complaint}\n\n\
         Questions & Answers:\n\
         {qa_text}\n\n\
         ---\n\n\
         Generate the response in a JSON object format with two keys: \"doctorSummary\" and \"selfCareTips\".\n\n\
         The \"doctorSummary\" key should correspond to an object with two keys:\n\
         - \"summaryParagraph\": A concise paragraph containing only the most critical information derived from the patient's complaint and answers. \
         Focus on symptoms, duration, and relevant context. Do not use a list format. End with \"{sentinel}\"\n\
         - \"allergies\": An array of strings, where each string is a specific allergy mentioned by the patient in their answers. \
         If no allergies are mentioned, return an empty array.\n\n\
         The \"selfCareTips\" key should correspond to a string containing a simple, bulleted list of advice like resting or staying hydrated.",
        patient_id = request.patient_id,
        name = request.info.name,
        phone = request.info.phone,
        email = request.info.email,
        complaint = request.chief_complaint,
        qa_text = qa_text,
        sentinel = READY_FOR_REVIEW,
    )
}

pub fn summary_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "doctorSummary": {
                "type": "OBJECT",
                "properties": {
                    "summaryParagraph": {
                        "type": "STRING",
                        "description": "A short and structured note for the doctor in paragraph form."
                    },
                    "allergies": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "A list of patient's allergies."
                    }
                },
                "required": ["summaryParagraph", "allergies"]
            },
            "selfCareTips": {
                "type": "STRING",
                "description": "3-5 basic, non-medical self-care suggestions."
            }
        },
        "required": ["doctorSummary", "selfCareTips"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::{PatientInfo, QaPair};

    #[test]
    fn summary_prompt_lists_pairs_in_order() {
        let request = SummaryRequest {
            patient_id: "P654321".to_string(),
            info: PatientInfo {
                name: "Sam Lee".to_string(),
                phone: "555-000-1111".to_string(),
                email: "sam@example.com".to_string(),
            },
            chief_complaint: "Sore throat".to_string(),
            qa_pairs: vec![
                QaPair { question: "How long?".to_string(), answer: "Two days".to_string() },
                QaPair { question: "Allergies?".to_string(), answer: "None".to_string() },
            ],
        };

        let prompt = summary_prompt(&request);

        assert!(prompt.contains("- Patient ID: P654321"));
        assert!(prompt.contains("Q: How long?\nA: Two days\n\nQ: Allergies?\nA: None"));
        assert!(prompt.contains(READY_FOR_REVIEW));
    }

    #[test]
    fn questions_prompt_quotes_complaint() {
        assert!(questions_prompt("back pain").contains("\"back pain\""));
    }
}
