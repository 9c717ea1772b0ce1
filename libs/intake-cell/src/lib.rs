//! # Intake Cell
//!
//! The patient intake wizard as a server-side state machine.
//!
//! Each browser session owns one [`IntakeFlow`], which walks
//! `LOGIN → INFO → APPOINTMENT_BOOKING → COMPLAINT → QUESTIONS → SUMMARY →
//! COMPLETE` for patients and `LOGIN → DOCTOR_LOGIN → DOCTOR_DASHBOARD` for
//! doctors. Steps that need the AI collaborator are split into a `begin_*`
//! call, which marks the session busy and returns a ticket, and a `finish_*`
//! call that applies the result, so no lock is held while waiting on the
//! network.
//!
//! ```text
//! +-----------------------------------------------------+
//! |  handlers.rs     |  HTTP endpoints, one per action   |
//! |  router.rs       |  Route definitions                |
//! |  models.rs       |  Steps, session state, views      |
//! |  error.rs        |  IntakeError -> AppError          |
//! |  services/       |                                   |
//! |    flow.rs       |  The step state machine           |
//! |    store.rs      |  Live sessions by id              |
//! +-----------------------------------------------------+
//! ```
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::IntakeError;
pub use models::{BusyIndicator, IntakeState, Role, Session, SessionView, Step};
pub use router::intake_routes;
pub use services::flow::{AnswerOutcome, IntakeFlow, QuestionsCall, SummaryCall};
pub use services::store::SessionStore;
