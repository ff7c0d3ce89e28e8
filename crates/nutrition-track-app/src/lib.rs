#![warn(missing_docs)]
//! # nutrition-track-app
//!
//! ## Purpose
//! Orchestrates session, upload, analysis, and view state for
//! `nutrition-track`.
//!
//! ## Responsibilities
//! - Own all mutable page state in one [`AppController`] context object.
//! - Re-render the auth/main screen after every session change.
//! - Guarantee the analyze button returns to idle after every attempt.
//! - Turn every recoverable failure into a user notification.
//! - Load [`AppConfig`] and expose the build version.
//!
//! ## Data flow
//! Shell event -> [`AppController`] method -> session store / upload handler /
//! analysis client -> [`nutrition_track_ui::UiState`] -> shell re-render.
//!
//! ## Concurrency
//! Single-threaded and event driven. The only suspension point is the network
//! round trip between [`AppController::begin_analysis`] and
//! [`AppController::finish_analysis`]; a second analysis cannot begin until
//! the first finishes.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. None is fatal: each is
//! reported as a notification and the page stays usable.
//!
//! ## Example
//! ```rust
//! use nutrition_track_app::{AppConfig, AppController};
//! use nutrition_track_auth::MemoryStorage;
//! use nutrition_track_upload::{AnalysisRequest, AnalysisTransport, TransportError, TransportResponse};
//!
//! struct Offline;
//!
//! impl AnalysisTransport for Offline {
//!     async fn send(&self, _request: &AnalysisRequest) -> Result<TransportResponse, TransportError> {
//!         Err(TransportError("offline".to_string()))
//!     }
//! }
//!
//! let mut app = AppController::new(AppConfig::default(), MemoryStorage::new(), Offline).unwrap();
//! app.login("alice@example.com", "secret1", 9).unwrap();
//! assert_eq!(
//!     app.ui().greeting.greeting.as_ref().map(|greeting| greeting.text()),
//!     Some("Good Morning, Alice ☀️".to_string())
//! );
//! ```

mod config;
mod controller;

pub use config::{
    AppConfig, ConfigError, ENV_ENDPOINT, ENV_MAX_UPLOAD_BYTES, ENV_NOTIFICATION_TTL_MS,
    ENV_REVEAL_DELAY_MS, ENV_STORAGE_KEY,
};
pub use controller::AppController;

use nutrition_track_auth::SessionError;
use nutrition_track_intake::UploadError;
use nutrition_track_upload::AnalysisError;
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("NUTRITION_TRACK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// App integration error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Login/signup rejected or session not saved.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    /// File selection rejected.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    /// Analysis failed.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    /// Configuration invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// An analysis request is already outstanding.
    #[error("analysis already in progress")]
    AnalysisInFlight,
}

impl AppError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Session(error) => error.user_message(),
            AppError::Upload(error) => error.user_message(),
            AppError::Analysis(error) => error.user_message(),
            AppError::Config(error) => error.to_string(),
            AppError::AnalysisInFlight => "Analysis already in progress".to_string(),
        }
    }

    /// Subsystem label used in log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::Session(_) => "auth",
            AppError::Upload(_) => "intake",
            AppError::Analysis(_) | AppError::AnalysisInFlight => "analysis",
            AppError::Config(_) => "config",
        }
    }
}
