pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod hours;
pub mod openai_types;
pub mod signature;
pub mod tasks;
pub mod twilio_types;
pub mod types;
pub mod utils;
pub mod voices;

use crate::types::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod consts {
    /// Ring timeout for bridging to the forward target, enforced by Twilio.
    pub const DIAL_TIMEOUT_SECS: u16 = 25;
    /// Upper bound on a voicemail recording, in seconds.
    pub const RECORDING_MAX_SECS: u16 = 120;
    /// How many dial outcomes the diagnostics log retains.
    pub const DIAL_LOG_CAPACITY: usize = 8;
}

/// Assemble the full HTTP surface: health checks, the Twilio webhook routes
/// (with their historical aliases), the diagnostics endpoint, and the SPA
/// bundle with client-side-routing fallback.
pub fn router(app_state: Arc<AppState>) -> Router {
    let dist = app_state.config.dist_dir.clone();
    let spa = ServeDir::new(&dist).fallback(ServeFile::new(Path::new(&dist).join("index.html")));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/twilioz", get(handlers::dial_log))
        .route("/voice/answer", post(handlers::voice_answer))
        .route("/voice/inbound", post(handlers::voice_answer))
        .route("/voice/after-dial", post(handlers::after_dial))
        .route("/voice/recording-status", post(handlers::recording_status))
        .route("/voice/recording", post(handlers::recording_status))
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
