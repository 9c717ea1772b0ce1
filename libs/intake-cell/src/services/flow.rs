// libs/intake-cell/src/services/flow.rs
use chrono::Utc;
use rand::Rng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use appointment_cell::{AppointmentError, BookingRoster, DashboardEntry, SessionKey, SlotAllocator};
use assistant_cell::{AssistantError, SummaryRequest, SummaryResult};
use auth_cell::DoctorDirectory;
use shared_models::{AppointmentDetails, BookingRecord, FieldError, PatientInfo, QaPair, TimeSlot};
use shared_utils::validation::{require_text, validate_patient_info};

use crate::error::{IntakeError, INVALID_CREDENTIALS, QUESTIONS_FAILED, SUMMARY_FAILED};
use crate::models::{
    AppointmentDraft, AppointmentDraftUpdate, BookingFormView, BusyIndicator, BusyView,
    PendingCall, QuestionView, Role, Session, SessionView, Step,
};

const DOCTOR_REQUIRED: &str = "Please select a doctor.";
const UNKNOWN_DOCTOR: &str = "Please select one of the clinic's doctors.";
const DATE_REQUIRED: &str = "Please select a date.";
const DATE_PASSED: &str = "Please select a date from today onward.";
const TIME_REQUIRED: &str = "Please select a time.";
const TIME_TAKEN: &str = "That time is no longer available. Please choose another.";
const CONSULT_TYPE_REQUIRED: &str = "Please select a consultation type.";
const COMPLAINT_REQUIRED: &str = "Please describe your main concern.";
const ANSWER_REQUIRED: &str = "Please enter an answer.";
const SLOT_LOST: &str =
    "Sorry, your appointment time was taken while your intake was open. Please choose another time.";

/// `P` followed by a uniformly drawn six-digit number.
pub fn generate_patient_id() -> String {
    format!("P{}", rand::thread_rng().gen_range(100_000..1_000_000))
}

/// Question generation the handler should run for a `COMPLAINT` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionsCall {
    pub ticket: u64,
    pub complaint: String,
}

/// Summarization the handler should run once the last answer is in.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCall {
    pub ticket: u64,
    pub request: SummaryRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The answer was stored; `index` is the question now being asked.
    Next { index: usize },
    /// That was the last answer; run the summary call.
    Summarize(SummaryCall),
}

/// One intake session's state machine.
///
/// Every transition checks the current step first and leaves the session
/// untouched when the action does not belong to it. The roster and the doctor
/// directory are passed in by the caller rather than owned.
#[derive(Debug)]
pub struct IntakeFlow {
    key: SessionKey,
    session: Session,
    next_ticket: u64,
}

impl Default for IntakeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeFlow {
    pub fn new() -> Self {
        Self::with_key(Uuid::new_v4())
    }

    pub fn with_key(key: SessionKey) -> Self {
        Self {
            key,
            session: Session::default(),
            next_ticket: 1,
        }
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step
    }

    pub fn busy(&self) -> Option<BusyIndicator> {
        self.session
            .pending
            .as_ref()
            .map(|_| BusyIndicator::for_step(self.session.step))
    }

    // ==========================================================================
    // PATIENT AND DOCTOR ENTRY
    // ==========================================================================

    pub fn choose_role(&mut self, role: Role) -> Result<Step, IntakeError> {
        self.expect_step(Step::Login, "choose a role")?;

        match role {
            Role::Patient => self.enter(Step::Info),
            Role::Doctor => self.enter(Step::DoctorLogin),
        }
        Ok(self.session.step)
    }

    /// A wrong email or password keeps the session on `DOCTOR_LOGIN` with an
    /// error message and returns [`IntakeError::InvalidCredentials`].
    pub fn doctor_login(
        &mut self,
        directory: &DoctorDirectory,
        email: &str,
        password: &str,
    ) -> Result<Step, IntakeError> {
        self.expect_step(Step::DoctorLogin, "sign in as a doctor")?;

        let mut missing = Vec::new();
        if email.trim().is_empty() {
            missing.push(FieldError::new("email", "Email is required."));
        }
        if password.is_empty() {
            missing.push(FieldError::new("password", "Password is required."));
        }
        if !missing.is_empty() {
            return Err(IntakeError::Validation(missing));
        }

        match directory.authenticate(email, password) {
            Some(account) => {
                self.session.doctor = Some(account.name.clone());
                self.enter(Step::DoctorDashboard);
                Ok(self.session.step)
            }
            None => {
                self.session.error = Some(INVALID_CREDENTIALS.to_string());
                Err(IntakeError::InvalidCredentials)
            }
        }
    }

    pub fn submit_info(&mut self, info: PatientInfo) -> Result<Step, IntakeError> {
        self.expect_step(Step::Info, "submit patient details")?;

        let errors = validate_patient_info(&info);
        if !errors.is_empty() {
            return Err(IntakeError::Validation(errors));
        }

        let patient_id = generate_patient_id();
        info!("Patient {} registered for intake session {}", patient_id, self.key);

        self.session.patient_info = PatientInfo {
            name: info.name.trim().to_string(),
            phone: info.phone.trim().to_string(),
            email: info.email.trim().to_string(),
        };
        self.session.patient_id = Some(patient_id);
        self.enter(Step::AppointmentBooking);
        Ok(self.session.step)
    }

    // ==========================================================================
    // APPOINTMENT BOOKING
    // ==========================================================================

    /// Slots the booking form should offer for the current draft.
    pub fn available_slots(&self, roster: &BookingRoster) -> Vec<TimeSlot> {
        let draft = &self.session.draft;
        roster.available_slots(draft.doctor.as_deref(), draft.date)
    }

    /// Applies a partial form update and returns the slots now on offer.
    ///
    /// A time picked in this update must be available; a time picked earlier
    /// that has since been taken is silently cleared.
    pub fn update_draft(
        &mut self,
        roster: &BookingRoster,
        directory: &DoctorDirectory,
        update: AppointmentDraftUpdate,
    ) -> Result<Vec<TimeSlot>, IntakeError> {
        self.expect_step(Step::AppointmentBooking, "change the booking form")?;

        let draft = merge_draft(&self.session.draft, directory, update)?;
        let available = roster.available_slots(draft.doctor.as_deref(), draft.date);

        let picked_now = draft.time != self.session.draft.time;
        let time = SlotAllocator::retain_selection(draft.time, &available);
        if picked_now && draft.time.is_some() && time.is_none() {
            return Err(IntakeError::field("time", TIME_TAKEN));
        }

        if draft.time.is_some() && time.is_none() {
            debug!("Cleared unavailable slot from draft in session {}", self.key);
        }
        self.session.draft = AppointmentDraft { time, ..draft };
        Ok(available)
    }

    /// Validates the completed form against the current roster, holds the
    /// slot for this session and moves on to the complaint. A session sent back
    /// here after losing its slot returns to its last question instead.
    pub fn submit_appointment(
        &mut self,
        roster: &mut BookingRoster,
        directory: &DoctorDirectory,
        update: AppointmentDraftUpdate,
    ) -> Result<Step, IntakeError> {
        self.update_draft(roster, directory, update)?;

        let draft = &self.session.draft;
        let mut missing = Vec::new();
        if draft.doctor.is_none() {
            missing.push(FieldError::new("doctor", DOCTOR_REQUIRED));
        }
        if draft.date.is_none() {
            missing.push(FieldError::new("date", DATE_REQUIRED));
        }
        if draft.time.is_none() {
            missing.push(FieldError::new("time", TIME_REQUIRED));
        }
        if draft.consult_type.is_none() {
            missing.push(FieldError::new("consult_type", CONSULT_TYPE_REQUIRED));
        }

        let appointment = match (&draft.doctor, draft.date, draft.time, draft.consult_type) {
            (Some(doctor), Some(date), Some(time), Some(consult_type)) => AppointmentDetails {
                doctor: doctor.clone(),
                date,
                time,
                consult_type,
            },
            _ => return Err(IntakeError::Validation(missing)),
        };

        match roster.hold(self.key, appointment.clone()) {
            Ok(()) => {}
            Err(AppointmentError::SlotNotAvailable { .. }) => {
                self.session.draft.time = None;
                return Err(IntakeError::field("time", TIME_TAKEN));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "Session {} booked {} on {} at {} ({})",
            self.key, appointment.doctor, appointment.date, appointment.time, appointment.consult_type
        );
        self.session.appointment = Some(appointment);
        if self.session.questions.is_empty() {
            self.enter(Step::Complaint);
        } else {
            self.enter(Step::Questions);
        }
        Ok(self.session.step)
    }

    // ==========================================================================
    // COMPLAINT AND QUESTIONS
    // ==========================================================================

    pub fn begin_complaint(&mut self, complaint: &str) -> Result<QuestionsCall, IntakeError> {
        self.expect_step(Step::Complaint, "submit a complaint")?;

        let complaint = require_text("complaint", complaint, COMPLAINT_REQUIRED)
            .map_err(|e| IntakeError::Validation(vec![e]))?;

        let ticket = self.issue_ticket();
        self.session.error = None;
        self.session.pending = Some(PendingCall::Questions {
            ticket,
            complaint: complaint.clone(),
        });

        debug!("Session {} waiting on questions (ticket {})", self.key, ticket);
        Ok(QuestionsCall { ticket, complaint })
    }

    /// Applies the question generator's reply. On failure the session stays on
    /// `COMPLAINT` with nothing from the attempt retained.
    pub fn finish_complaint(
        &mut self,
        ticket: u64,
        result: Result<Vec<String>, AssistantError>,
    ) -> Result<Step, IntakeError> {
        let complaint = match self.session.pending.take() {
            Some(PendingCall::Questions { ticket: pending, complaint }) if pending == ticket => complaint,
            other => {
                self.session.pending = other;
                warn!("Discarding stale question result (ticket {}) in session {}", ticket, self.key);
                return Err(IntakeError::StaleResult);
            }
        };

        let questions = match result {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                return Err(self.assistant_failed(
                    QUESTIONS_FAILED,
                    AssistantError::MalformedResponse("no questions were generated".to_string()),
                ))
            }
            Err(e) => return Err(self.assistant_failed(QUESTIONS_FAILED, e)),
        };

        info!("Session {} received {} questions", self.key, questions.len());
        self.session.chief_complaint = complaint;
        self.session.questions = questions;
        self.session.answers.clear();
        self.session.current_question = 0;
        self.enter(Step::Questions);
        Ok(self.session.step)
    }

    /// Records one answer. The last answer is held back until the summary
    /// comes back, so a failed summary can be retried by resubmitting it.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, IntakeError> {
        self.expect_step(Step::Questions, "answer a question")?;

        let answer = require_text("answer", answer, ANSWER_REQUIRED)
            .map_err(|e| IntakeError::Validation(vec![e]))?;

        let index = self.session.current_question;
        let last = self.session.questions.len().saturating_sub(1);

        if index < last {
            self.session.answers.push(answer);
            self.session.current_question = index + 1;
            self.session.error = None;
            return Ok(AnswerOutcome::Next { index: index + 1 });
        }

        let patient_id = match (&self.session.appointment, &self.session.patient_id) {
            (Some(_), Some(patient_id)) => patient_id.clone(),
            _ => {
                error!("Session {} reached the last question without an appointment", self.key);
                return Err(IntakeError::ContractViolation(
                    "appointment details missing when finalizing a booking",
                ));
            }
        };

        let mut qa_pairs = self.qa_pairs();
        qa_pairs.push(QaPair {
            question: self.session.questions[index].clone(),
            answer: answer.clone(),
        });

        let ticket = self.issue_ticket();
        self.session.error = None;
        self.session.pending = Some(PendingCall::Summary {
            ticket,
            final_answer: answer,
        });

        debug!("Session {} waiting on summary (ticket {})", self.key, ticket);
        Ok(AnswerOutcome::Summarize(SummaryCall {
            ticket,
            request: SummaryRequest {
                patient_id,
                info: self.session.patient_info.clone(),
                chief_complaint: self.session.chief_complaint.clone(),
                qa_pairs,
            },
        }))
    }

    /// Applies the summarizer's reply: appends the booking record and moves to
    /// `SUMMARY`, or stays on `QUESTIONS` with the earlier answers intact.
    ///
    /// If the slot hold lapsed and the time went to someone else, the session
    /// goes back to `APPOINTMENT_BOOKING` with the time cleared and nothing
    /// is appended.
    pub fn finish_summary(
        &mut self,
        roster: &mut BookingRoster,
        ticket: u64,
        result: Result<SummaryResult, AssistantError>,
    ) -> Result<Step, IntakeError> {
        let final_answer = match self.session.pending.take() {
            Some(PendingCall::Summary { ticket: pending, final_answer }) if pending == ticket => final_answer,
            other => {
                self.session.pending = other;
                warn!("Discarding stale summary result (ticket {}) in session {}", ticket, self.key);
                return Err(IntakeError::StaleResult);
            }
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => return Err(self.assistant_failed(SUMMARY_FAILED, e)),
        };

        let (appointment, patient_id) = match (&self.session.appointment, &self.session.patient_id) {
            (Some(appointment), Some(patient_id)) => (appointment.clone(), patient_id.clone()),
            _ => {
                error!("Session {} finalizing without an appointment", self.key);
                return Err(IntakeError::ContractViolation(
                    "appointment details missing when finalizing a booking",
                ));
            }
        };

        let mut answers = self.session.answers.clone();
        answers.push(final_answer);
        let qa_pairs = pair_up(&self.session.questions, &answers);

        let record = BookingRecord {
            id: Uuid::new_v4(),
            patient_id,
            info: self.session.patient_info.clone(),
            chief_complaint: self.session.chief_complaint.clone(),
            appointment,
            qa_pairs,
            doctor_summary: summary.doctor_summary,
            self_care_tips: summary.self_care_tips.clone(),
            created_at: Utc::now(),
        };

        let booking_id = match roster.append(self.key, record) {
            Ok(record) => record.id,
            Err(e @ AppointmentError::SlotNotAvailable { .. }) => {
                warn!("Session {} lost its slot before the booking was saved", self.key);
                roster.release(self.key);
                self.session.appointment = None;
                self.session.draft.time = None;
                self.enter(Step::AppointmentBooking);
                self.session.error = Some(SLOT_LOST.to_string());
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        self.session.answers = answers;
        self.session.booking_id = Some(booking_id);
        self.session.self_care_tips = summary.self_care_tips;
        self.enter(Step::Summary);
        Ok(self.session.step)
    }

    /// Question/answer pairs for every question answered so far.
    pub fn qa_pairs(&self) -> Vec<QaPair> {
        pair_up(&self.session.questions, &self.session.answers)
    }

    // ==========================================================================
    // SUMMARY AND DASHBOARD
    // ==========================================================================

    /// Records the optional follow-up question against this session's booking.
    pub fn submit_follow_up(
        &mut self,
        roster: &mut BookingRoster,
        question: &str,
    ) -> Result<Step, IntakeError> {
        self.expect_step(Step::Summary, "leave a follow-up question")?;

        let booking_id = self.session.booking_id.ok_or(IntakeError::ContractViolation(
            "summary step reached without a booking",
        ))?;

        let question = question.trim();
        if !question.is_empty() {
            roster.record_follow_up(booking_id, question.to_string())?;
        }

        self.enter(Step::Complete);
        Ok(self.session.step)
    }

    pub fn dashboard(&self, roster: &BookingRoster) -> Result<Vec<DashboardEntry>, IntakeError> {
        let doctor = self.dashboard_doctor()?;
        Ok(roster.for_doctor(doctor))
    }

    pub fn dashboard_entry(
        &self,
        roster: &BookingRoster,
        booking_id: Uuid,
    ) -> Result<DashboardEntry, IntakeError> {
        let doctor = self.dashboard_doctor()?;
        roster
            .entry_for_doctor(doctor, booking_id)
            .ok_or(IntakeError::Appointment(AppointmentError::BookingNotFound(booking_id)))
    }

    fn dashboard_doctor(&self) -> Result<&str, IntakeError> {
        if self.session.step != Step::DoctorDashboard {
            return Err(IntakeError::InvalidTransition {
                step: self.session.step,
                action: "view the dashboard",
            });
        }
        self.session
            .doctor
            .as_deref()
            .ok_or(IntakeError::ContractViolation("dashboard reached without a doctor"))
    }

    // ==========================================================================
    // SESSION-WIDE ACTIONS
    // ==========================================================================

    pub fn acknowledge_error(&mut self) {
        if self.session.error.take().is_some() {
            debug!("Error acknowledged in session {}", self.key);
        }
    }

    /// Back to a fresh `LOGIN`, from any step. Releases any slot hold; a
    /// collaborator reply still in flight will be discarded when it lands.
    pub fn logout(&mut self, roster: &mut BookingRoster) {
        roster.release(self.key);
        if self.session.pending.is_some() {
            warn!("Session {} logged out while waiting on the assistant", self.key);
        }
        info!("Session {} logged out from {}", self.key, self.session.step);
        self.session = Session::default();
    }

    pub fn view(&self, roster: &BookingRoster) -> SessionView {
        let session = &self.session;

        let booking_form = (session.step == Step::AppointmentBooking).then(|| BookingFormView {
            draft: session.draft.clone(),
            available_slots: self.available_slots(roster),
        });

        let question = (session.step == Step::Questions)
            .then(|| {
                session.questions.get(session.current_question).map(|text| QuestionView {
                    number: session.current_question + 1,
                    total: session.questions.len(),
                    text: text.clone(),
                })
            })
            .flatten();

        let self_care_tips = matches!(session.step, Step::Summary | Step::Complete)
            .then(|| session.self_care_tips.clone());

        SessionView {
            session_id: self.key,
            step: session.step,
            busy: self.busy().map(|indicator| BusyView {
                indicator,
                label: indicator.label(),
            }),
            error: session.error.clone(),
            patient_id: session.patient_id.clone(),
            doctor: session.doctor.clone(),
            booking_form,
            appointment: session.appointment.clone(),
            question,
            self_care_tips,
        }
    }

    // ==========================================================================
    // INTERNALS
    // ==========================================================================

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), IntakeError> {
        if let Some(indicator) = self.busy() {
            return Err(IntakeError::Busy(indicator));
        }
        if self.session.step != expected {
            warn!(
                "Session {} rejected '{}' on step {}",
                self.key, action, self.session.step
            );
            return Err(IntakeError::InvalidTransition {
                step: self.session.step,
                action,
            });
        }
        Ok(())
    }

    /// Entering a step always clears the previous step's error.
    fn enter(&mut self, step: Step) {
        debug!("Session {}: {} -> {}", self.key, self.session.step, step);
        self.session.step = step;
        self.session.error = None;
    }

    fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn assistant_failed(&mut self, message: &'static str, source: AssistantError) -> IntakeError {
        warn!("Assistant call failed in session {}: {}", self.key, source);
        self.session.error = Some(message.to_string());
        IntakeError::Assistant { message, source }
    }
}

fn merge_draft(
    current: &AppointmentDraft,
    directory: &DoctorDirectory,
    update: AppointmentDraftUpdate,
) -> Result<AppointmentDraft, IntakeError> {
    let doctor = match update.doctor {
        Some(Some(doctor)) => {
            let doctor = doctor.trim().to_string();
            if doctor.is_empty() {
                None
            } else if directory.is_bookable(&doctor) {
                Some(doctor)
            } else {
                return Err(IntakeError::field("doctor", UNKNOWN_DOCTOR));
            }
        }
        Some(None) => None,
        None => current.doctor.clone(),
    };

    let date = update.date.unwrap_or(current.date);
    if let Some(date) = date {
        SlotAllocator::check_date(date, Utc::now().date_naive())
            .map_err(|_| IntakeError::field("date", DATE_PASSED))?;
    }

    Ok(AppointmentDraft {
        doctor,
        date,
        time: update.time.unwrap_or(current.time),
        consult_type: update.consult_type.unwrap_or(current.consult_type),
    })
}

fn pair_up(questions: &[String], answers: &[String]) -> Vec<QaPair> {
    questions
        .iter()
        .zip(answers)
        .map(|(question, answer)| QaPair {
            question: question.clone(),
            answer: answer.clone(),
        })
        .collect()
}
