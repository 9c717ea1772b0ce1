use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, AppointmentState, SharedRoster};
use assistant_cell::IntakeAssistant;
use auth_cell::DoctorDirectory;
use intake_cell::{intake_routes, IntakeState, SessionStore};

/// Process-wide state shared by every cell.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub roster: SharedRoster,
    pub directory: Arc<DoctorDirectory>,
    pub assistant: Arc<dyn IntakeAssistant>,
}

pub fn create_router(state: AppState) -> Router {
    let intake_state = Arc::new(IntakeState {
        sessions: state.sessions,
        roster: state.roster.clone(),
        directory: state.directory.clone(),
        assistant: state.assistant.clone(),
    });
    let appointment_state = Arc::new(AppointmentState {
        roster: state.roster,
        directory: state.directory,
    });

    Router::new()
        .route("/", get(|| async { "Patient intake API is running!" }))
        .nest("/intake", intake_routes(intake_state))
        .nest("/appointments", appointment_routes(appointment_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use appointment_cell::BookingRoster;
    use assistant_cell::GeminiAssistant;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use shared_config::AppConfig;
    use shared_utils::test_utils::TestBooking;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let assistant = GeminiAssistant::new(&AppConfig::default()).unwrap();
        create_router(AppState {
            sessions: SessionStore::new(),
            roster: BookingRoster::shared(),
            directory: Arc::new(DoctorDirectory::seeded()),
            assistant: Arc::new(assistant),
        })
    }

    #[tokio::test]
    async fn root_reports_running() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Patient intake API is running!");
    }

    #[tokio::test]
    async fn intake_and_appointment_routes_are_mounted() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/intake/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let uri = format!(
            "/appointments/slots?doctor=Dr.%20Chloe%20Davis&date={}",
            TestBooking::days_ahead(7)
        );
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
