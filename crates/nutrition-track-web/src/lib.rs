#![warn(missing_docs)]
//! # nutrition-track-web
//!
//! ## Purpose
//! Browser shell for `nutrition-track`, built with yew for
//! `wasm32-unknown-unknown`.
//!
//! ## Responsibilities
//! - Back the session store with `window.localStorage`.
//! - Send analysis requests with `fetch` and a `FormData` body.
//! - Read picked and dropped files into memory.
//! - Render the controller's view model and drive its deferred transitions.
//! - Forward `tracing` output to the browser console.
//!
//! ## Data flow
//! DOM event -> [`app::App`] callback -> `AppController` method ->
//! force re-render from the updated view model.

pub mod app;
pub mod logging;
pub mod storage;
pub mod transport;

use nutrition_track_app::{
    AppConfig, AppController, AppError, ConfigError, ENV_ENDPOINT, ENV_MAX_UPLOAD_BYTES,
    ENV_NOTIFICATION_TTL_MS, ENV_REVEAL_DELAY_MS, ENV_STORAGE_KEY,
};
use wasm_bindgen::prelude::*;

use crate::app::{App, AppProps, ControllerHandle};
use crate::storage::LocalStorage;
use crate::transport::FetchTransport;

/// Reads overrides baked in at compile time.
///
/// # Errors
/// Returns [`ConfigError`] when an override is invalid.
pub fn compile_time_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| {
        match key {
            ENV_ENDPOINT => option_env!("NUTRITION_TRACK_ENDPOINT"),
            ENV_STORAGE_KEY => option_env!("NUTRITION_TRACK_STORAGE_KEY"),
            ENV_MAX_UPLOAD_BYTES => option_env!("NUTRITION_TRACK_MAX_UPLOAD_BYTES"),
            ENV_REVEAL_DELAY_MS => option_env!("NUTRITION_TRACK_REVEAL_DELAY_MS"),
            ENV_NOTIFICATION_TTL_MS => option_env!("NUTRITION_TRACK_NOTIFICATION_TTL_MS"),
            _ => None,
        }
        .map(str::to_string)
    })
}

fn build_controller() -> Result<ControllerHandle, AppError> {
    let config = compile_time_config()?;
    let controller = AppController::new(config, LocalStorage, FetchTransport)?;
    Ok(ControllerHandle::new(controller))
}

/// Page entry point.
#[wasm_bindgen(start)]
pub fn run_app() {
    logging::init();

    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("root"))
    else {
        tracing::error!(stage = "startup", action = "mount", "#root element not found");
        return;
    };

    match build_controller() {
        Ok(handle) => {
            tracing::info!(
                stage = "startup",
                action = "mount",
                version = nutrition_track_app::app_version(),
                "starting nutrition-track"
            );
            yew::Renderer::<App>::with_root_and_props(root, AppProps { handle }).render();
        }
        Err(error) => {
            tracing::error!(stage = "startup", action = "configure", error = %error, "startup failed");
            root.set_text_content(Some(&format!("Nutrition Track failed to start: {error}")));
        }
    }
}
