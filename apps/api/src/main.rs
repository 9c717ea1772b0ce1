use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::BookingRoster;
use assistant_cell::GeminiAssistant;
use auth_cell::DoctorDirectory;
use intake_cell::SessionStore;
use shared_config::AppConfig;

use crate::router::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting patient intake API server");

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("GEMINI_API_KEY is empty; question and summary generation will fail");
    }

    let assistant =
        GeminiAssistant::new(&config).context("failed to build the Gemini HTTP client")?;

    // Create shared state
    let roster = BookingRoster::with_hold_ttl(config.slot_hold_ttl()).into_shared();
    let sessions = SessionStore::new();

    // Evict abandoned sessions so their slot holds go back on offer
    sessions.spawn_sweeper(
        roster.clone(),
        config.session_idle_ttl(),
        config.session_sweep_interval(),
    );
    info!(
        "Slot holds last {:?}; idle sessions are evicted after {:?}",
        config.slot_hold_ttl(),
        config.session_idle_ttl()
    );

    let state = AppState {
        sessions,
        roster,
        directory: Arc::new(DoctorDirectory::seeded()),
        assistant: Arc::new(assistant),
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
