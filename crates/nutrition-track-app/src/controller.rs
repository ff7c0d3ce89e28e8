//! The application context object.
//!
//! [`AppController`] owns the session store, the upload handler, the
//! analysis client, and the view model. Every user action is a method on it,
//! and each method leaves [`UiState`] consistent with the stores it touched.

use nutrition_track_analysis_contract::{AnalysisResult, render_result};
use nutrition_track_auth::{KeyValueStore, SessionState, SessionStore};
use nutrition_track_core::{PendingFile, SessionRecord};
use nutrition_track_intake::{UploadError, UploadHandler};
use nutrition_track_ui::{Greeting, NotificationKind, UiState};
use nutrition_track_upload::{AnalysisClient, AnalysisError, AnalysisRequest, AnalysisTransport};

use crate::{AppConfig, AppError, app_version};

/// Owner of all mutable page state.
#[derive(Debug)]
pub struct AppController<S, T> {
    config: AppConfig,
    session: SessionStore<S>,
    intake: UploadHandler,
    client: AnalysisClient<T>,
    ui: UiState,
    // Bumped whenever the pending file changes or is cleared.
    upload_epoch: u64,
    in_flight: Option<u64>,
}

impl<S: KeyValueStore, T: AnalysisTransport> AppController<S, T> {
    /// Wires the controller from a config, a storage backend, and a transport.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the config is invalid.
    pub fn new(config: AppConfig, storage: S, transport: T) -> Result<Self, AppError> {
        config.validate()?;
        let client = AnalysisClient::new(config.endpoint.clone(), transport)?;
        Ok(Self {
            session: SessionStore::with_key(storage, config.storage_key.clone()),
            intake: UploadHandler::new(config.max_upload_bytes),
            client,
            ui: UiState::new(app_version()),
            config,
            upload_epoch: 0,
            in_flight: None,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current view model.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Session store.
    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Upload handler.
    pub fn intake(&self) -> &UploadHandler {
        &self.intake
    }

    /// Analysis client, for callers that await the request outside a borrow of
    /// the controller.
    pub fn client(&self) -> &AnalysisClient<T> {
        &self.client
    }

    /// Shows the main screen when a session exists, otherwise the auth screen.
    ///
    /// `hour` is the local hour (0-23) used for the greeting.
    pub fn render_for_auth_state(&mut self, hour: u32) {
        if self.session.is_logged_in() {
            let name = self.session.display_name();
            self.ui.show_main(Greeting::new(name, hour));
        } else {
            self.ui.show_auth();
        }
    }

    /// Switches between the login and signup forms.
    pub fn toggle_auth_mode(&mut self, show_login: bool) {
        self.ui.toggle_auth_mode(show_login);
    }

    /// Logs in and re-renders.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] on validation or storage failure; an
    /// error notification is queued as well.
    pub fn login(&mut self, email: &str, password: &str, hour: u32) -> Result<SessionRecord, AppError> {
        match self.session.login(email, password) {
            Ok(record) => {
                self.ui.clear_forms();
                self.ui.notify("Welcome back!", NotificationKind::Success);
                self.render_for_auth_state(hour);
                Ok(record)
            }
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Signs up and re-renders.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] on validation or storage failure; an
    /// error notification is queued as well.
    pub fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        hour: u32,
    ) -> Result<SessionRecord, AppError> {
        match self.session.signup(name, email, password) {
            Ok(record) => {
                self.ui.clear_forms();
                self.ui
                    .notify("Account created successfully!", NotificationKind::Success);
                self.render_for_auth_state(hour);
                Ok(record)
            }
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Clears the session and the pending upload, then re-renders.
    pub fn logout(&mut self, hour: u32) {
        self.session.logout();
        self.reset();
        self.ui.notify("Logged out successfully", NotificationKind::Success);
        self.render_for_auth_state(hour);
    }

    /// Projects the stored session.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Toggles the drag-hover highlight on the upload box.
    pub fn set_drag_active(&mut self, active: bool) {
        self.ui.set_drag_active(active);
    }

    /// Accepts a picked or dropped file.
    ///
    /// # Errors
    /// Returns [`AppError::Upload`] for non-image or oversized files. The
    /// previous selection and the analyze button are left as they were.
    pub fn select_file(&mut self, file: PendingFile) -> Result<(), AppError> {
        match self.intake.select_file(file) {
            Ok(preview) => {
                let src = preview.data_url().to_string();
                self.upload_epoch = self.upload_epoch.wrapping_add(1);
                self.ui.show_preview(src);
                Ok(())
            }
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Handles a drop on the upload box. An empty drop is ignored.
    ///
    /// # Errors
    /// See [`AppController::select_file`].
    pub fn drop_file(&mut self, file: Option<PendingFile>) -> Result<(), AppError> {
        self.ui.set_drag_active(false);
        match file {
            Some(file) => self.select_file(file),
            None => Ok(()),
        }
    }

    /// Reports a picked or dropped file whose bytes could not be read. The
    /// previous selection is kept.
    pub fn file_unreadable(&mut self, reason: impl Into<String>) -> AppError {
        self.ui.set_drag_active(false);
        self.report(UploadError::Unreadable(reason.into()).into())
    }

    /// Clears the pending file and returns the upload area to idle.
    pub fn reset(&mut self) {
        self.upload_epoch = self.upload_epoch.wrapping_add(1);
        self.intake.reset();
        self.ui.clear_upload();
    }

    /// Runs one full analysis round trip.
    ///
    /// # Errors
    /// Returns [`AppError::Analysis`] for a missing file, a failure status, a
    /// transport failure, or an undecodable body. The analyze button is back
    /// to idle in every case.
    pub async fn analyze(&mut self) -> Result<AnalysisResult, AppError> {
        let request = self.begin_analysis()?;
        let outcome = self.client.submit(&request).await;
        self.finish_analysis(outcome)
    }

    /// First half of [`AppController::analyze`]: checks for a pending file,
    /// enters the busy state, and builds the request.
    ///
    /// # Errors
    /// Returns [`AnalysisError::NoFile`] (with a notification and no busy
    /// state) when nothing is selected, and [`AppError::AnalysisInFlight`]
    /// when a request is already outstanding.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, AppError> {
        if self.in_flight.is_some() {
            tracing::warn!(stage = "analysis", action = "begin", "request already in flight");
            return Err(AppError::AnalysisInFlight);
        }

        let Some(file) = self.intake.pending() else {
            return Err(self.report(AnalysisError::NoFile.into()));
        };

        let request = self.client.build_request(file);
        self.in_flight = Some(self.upload_epoch);
        self.ui.begin_analysis();
        tracing::info!(stage = "analysis", action = "begin", "analysis started");
        Ok(request)
    }

    /// Second half of [`AppController::analyze`]: restores the idle button,
    /// then renders the result or reports the failure.
    ///
    /// When the pending file was replaced or cleared while the request was in
    /// flight, the outcome is returned but neither rendered nor notified.
    ///
    /// # Errors
    /// Returns the failure from `outcome` as [`AppError::Analysis`].
    pub fn finish_analysis(
        &mut self,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<AnalysisResult, AppError> {
        let started_at = self.in_flight.take();
        self.ui.finish_analysis(self.intake.has_pending());

        if started_at != Some(self.upload_epoch) {
            tracing::info!(
                stage = "analysis",
                action = "finish",
                "pending file changed during analysis; outcome discarded"
            );
            return outcome.map_err(AppError::from);
        }

        match outcome {
            Ok(result) => {
                self.render(&result);
                self.ui.notify("Analysis complete!", NotificationKind::Success);
                tracing::info!(stage = "analysis", action = "finish", "analysis complete");
                Ok(result)
            }
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Writes a result into the results panel and asks for it to be revealed.
    pub fn render(&mut self, result: &AnalysisResult) {
        self.ui.show_results(render_result(result));
    }

    /// Completes the greeting fade-in.
    pub fn complete_greeting_reveal(&mut self) {
        self.ui.complete_greeting_reveal();
    }

    /// Completes the results fade-in.
    pub fn complete_results_reveal(&mut self) {
        self.ui.complete_results_reveal();
    }

    /// Consumes a pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        self.ui.take_scroll_request()
    }

    /// Removes a notification.
    pub fn dismiss_notification(&mut self, id: u64) {
        self.ui.dismiss(id);
    }

    fn report(&mut self, error: AppError) -> AppError {
        tracing::warn!(stage = error.stage(), action = "failed", error = %error, "action failed");
        self.ui.notify(error.user_message(), NotificationKind::Error);
        error
    }
}
