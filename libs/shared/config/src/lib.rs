use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_request_timeout_secs: u64,
    pub server_port: u16,
    pub slot_hold_ttl_secs: u64,
    pub session_idle_ttl_secs: u64,
    pub session_sweep_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            ai_request_timeout_secs: 30,
            server_port: 3000,
            slot_hold_ttl_secs: 30 * 60,
            session_idle_ttl_secs: 60 * 60,
            session_sweep_interval_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            gemini_api_key: env::var("GEMINI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_API_KEY not set, using empty value");
                    String::new()
                }),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_MODEL not set, using default");
                    defaults.gemini_model.clone()
                }),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_BASE_URL not set, using default");
                    defaults.gemini_base_url.clone()
                }),
            ai_request_timeout_secs: parse_or_default(
                "AI_REQUEST_TIMEOUT_SECS",
                defaults.ai_request_timeout_secs,
            ),
            server_port: parse_or_default("SERVER_PORT", defaults.server_port),
            slot_hold_ttl_secs: parse_or_default("SLOT_HOLD_TTL_SECS", defaults.slot_hold_ttl_secs),
            session_idle_ttl_secs: parse_or_default(
                "SESSION_IDLE_TTL_SECS",
                defaults.session_idle_ttl_secs,
            ),
            session_sweep_interval_secs: parse_or_default(
                "SESSION_SWEEP_INTERVAL_SECS",
                defaults.session_sweep_interval_secs,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.gemini_api_key.is_empty()
            && !self.gemini_model.is_empty()
            && !self.gemini_base_url.is_empty()
    }

    pub fn ai_request_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_request_timeout_secs)
    }

    /// How long a booked-but-unfinished slot stays reserved for its session.
    pub fn slot_hold_ttl(&self) -> Duration {
        Duration::from_secs(self.slot_hold_ttl_secs)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}
