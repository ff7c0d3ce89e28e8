#![warn(missing_docs)]
//! # nutrition-track-ui
//!
//! ## Purpose
//! Defines the UI-facing view model for `nutrition-track`.
//!
//! ## Responsibilities
//! - Represent the visible screen, auth form, greeting, upload panel, analyze
//!   button, results panel, and transient notifications.
//! - Compute the time-of-day greeting.
//! - Model deferred visual transitions as explicit [`Reveal`] states.
//!
//! ## Data flow
//! Controller operations mutate [`UiState`]; the browser shell renders it and
//! completes pending reveals and notification dismissals on timers.
//!
//! ## Ownership and lifetimes
//! `UiState` owns every string it shows so the shell can render from a plain
//! snapshot.
//!
//! ## Error model
//! This crate has no fallible operations. Failures elsewhere surface here as
//! [`NotificationKind::Error`] notifications.

use nutrition_track_analysis_contract::RenderedResult;

/// Idle label of the analyze button.
pub const ANALYZE_IDLE_LABEL: &str = "Analyze Nutrition";

/// Label of the analyze button while a request is in flight.
pub const ANALYZE_BUSY_LABEL: &str = "Analyzing with AI...";

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Login/signup forms.
    Auth,
    /// Upload and results.
    Main,
}

/// Which auth form is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    /// Login form.
    Login,
    /// Signup form.
    Signup,
}

/// Progress of a deferred fade-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Not shown.
    Hidden,
    /// Mounted, transition not yet applied.
    Pending,
    /// Fully shown.
    Revealed,
}

impl Reveal {
    /// Returns `true` when the region is mounted.
    pub fn is_visible(self) -> bool {
        !matches!(self, Reveal::Hidden)
    }

    fn complete(self) -> Self {
        match self {
            Reveal::Pending => Reveal::Revealed,
            other => other,
        }
    }
}

/// Time-of-day band used by the greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// 05:00 to 11:59.
    Morning,
    /// 12:00 to 16:59.
    Afternoon,
    /// 17:00 to 20:59.
    Evening,
    /// 21:00 to 04:59.
    Night,
}

impl TimeOfDay {
    /// Band for a local hour (0-23). Out-of-range hours count as night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Greeting phrase.
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Good Morning",
            TimeOfDay::Afternoon => "Good Afternoon",
            TimeOfDay::Evening => "Good Evening",
            TimeOfDay::Night => "Good Night",
        }
    }

    /// Decorative emoji.
    pub fn emoji(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "☀️",
            TimeOfDay::Afternoon => "🌤️",
            TimeOfDay::Evening => "🌆",
            TimeOfDay::Night => "🌙",
        }
    }
}

/// Greeting addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Band the greeting was computed for.
    pub time_of_day: TimeOfDay,
    /// Display name.
    pub name: String,
}

impl Greeting {
    /// Builds the greeting for `name` at local `hour`.
    pub fn new(name: impl Into<String>, hour: u32) -> Self {
        Self {
            time_of_day: TimeOfDay::from_hour(hour),
            name: name.into(),
        }
    }

    /// Full text, for example `Good Morning, Alice ☀️`.
    pub fn text(&self) -> String {
        format!(
            "{}, {} {}",
            self.time_of_day.label(),
            self.name,
            self.time_of_day.emoji()
        )
    }
}

/// Greeting header state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingPanel {
    /// Current greeting, if on the main screen.
    pub greeting: Option<Greeting>,
    /// Fade-in progress.
    pub reveal: Reveal,
}

/// Upload box and preview state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPanel {
    /// Preview `data:` URL; the upload box shows while this is `None`.
    pub preview_src: Option<String>,
    /// A drag is hovering the upload box.
    pub drag_active: bool,
}

impl UploadPanel {
    /// Returns `true` when the preview replaces the upload box.
    pub fn preview_visible(&self) -> bool {
        self.preview_src.is_some()
    }
}

/// Analyze button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeButton {
    /// Clickable.
    pub enabled: bool,
    /// Spinner shown and busy label in use.
    pub loading: bool,
}

impl AnalyzeButton {
    /// Current label.
    pub fn label(&self) -> &'static str {
        if self.loading {
            ANALYZE_BUSY_LABEL
        } else {
            ANALYZE_IDLE_LABEL
        }
    }
}

/// Results panel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPanel {
    /// Last rendered result.
    pub content: Option<RenderedResult>,
    /// Fade-in progress.
    pub reveal: Reveal,
    /// The shell should scroll the panel into view.
    pub scroll_requested: bool,
}

/// Notification style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Completed action.
    Success,
    /// Recoverable failure.
    Error,
    /// Neutral information.
    Info,
}

/// Transient toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier used for dismissal.
    pub id: u64,
    /// Human-readable text.
    pub message: String,
    /// Style.
    pub kind: NotificationKind,
}

/// Aggregate UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// App version shown in the footer.
    pub version: String,
    /// Visible screen.
    pub screen: Screen,
    /// Visible auth form.
    pub auth_form: AuthForm,
    /// Greeting header.
    pub greeting: GreetingPanel,
    /// Upload box and preview.
    pub upload: UploadPanel,
    /// Analyze button.
    pub analyze: AnalyzeButton,
    /// Results panel.
    pub results: ResultsPanel,
    /// Active notifications, oldest first.
    pub notifications: Vec<Notification>,
    /// Bumped whenever submitted form inputs should be emptied.
    pub form_generation: u64,
    next_notification_id: u64,
}

impl UiState {
    /// Creates the initial state: auth screen, login form, nothing selected.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            screen: Screen::Auth,
            auth_form: AuthForm::Login,
            greeting: GreetingPanel {
                greeting: None,
                reveal: Reveal::Hidden,
            },
            upload: UploadPanel::default(),
            analyze: AnalyzeButton {
                enabled: false,
                loading: false,
            },
            results: ResultsPanel {
                content: None,
                reveal: Reveal::Hidden,
                scroll_requested: false,
            },
            notifications: Vec::new(),
            form_generation: 0,
            next_notification_id: 0,
        }
    }

    /// Shows the auth screen and drops the greeting.
    pub fn show_auth(&mut self) {
        self.screen = Screen::Auth;
        self.greeting = GreetingPanel {
            greeting: None,
            reveal: Reveal::Hidden,
        };
    }

    /// Shows the main screen with a greeting awaiting its fade-in.
    pub fn show_main(&mut self, greeting: Greeting) {
        self.screen = Screen::Main;
        self.greeting = GreetingPanel {
            greeting: Some(greeting),
            reveal: Reveal::Pending,
        };
    }

    /// Finishes the greeting fade-in.
    pub fn complete_greeting_reveal(&mut self) {
        self.greeting.reveal = self.greeting.reveal.complete();
    }

    /// Shows the login form when `show_login`, otherwise the signup form.
    pub fn toggle_auth_mode(&mut self, show_login: bool) {
        self.auth_form = if show_login {
            AuthForm::Login
        } else {
            AuthForm::Signup
        };
    }

    /// Requests that submitted form inputs be emptied.
    pub fn clear_forms(&mut self) {
        self.form_generation = self.form_generation.wrapping_add(1);
    }

    /// Sets the drag-hover highlight.
    pub fn set_drag_active(&mut self, active: bool) {
        self.upload.drag_active = active;
    }

    /// Shows a preview, enables analysis unless a request is in flight, and
    /// hides stale results.
    pub fn show_preview(&mut self, src: impl Into<String>) {
        self.upload.preview_src = Some(src.into());
        self.analyze.enabled = !self.analyze.loading;
        self.hide_results();
    }

    /// Returns the upload area to idle: box visible, no preview, no results,
    /// analysis disabled. An in-flight spinner keeps running until
    /// [`UiState::finish_analysis`].
    pub fn clear_upload(&mut self) {
        self.upload.preview_src = None;
        self.upload.drag_active = false;
        self.analyze.enabled = false;
        self.hide_results();
    }

    /// Enters the in-progress state.
    pub fn begin_analysis(&mut self) {
        self.analyze = AnalyzeButton {
            enabled: false,
            loading: true,
        };
        self.hide_results();
    }

    /// Leaves the in-progress state. `enabled` is whether a file is still
    /// available to analyze.
    pub fn finish_analysis(&mut self, enabled: bool) {
        self.analyze = AnalyzeButton {
            enabled,
            loading: false,
        };
    }

    /// Shows a result awaiting its fade-in and asks for a scroll.
    pub fn show_results(&mut self, content: RenderedResult) {
        self.results = ResultsPanel {
            content: Some(content),
            reveal: Reveal::Pending,
            scroll_requested: true,
        };
    }

    /// Hides the results panel. The last content is kept for re-display.
    pub fn hide_results(&mut self) {
        self.results.reveal = Reveal::Hidden;
        self.results.scroll_requested = false;
    }

    /// Finishes the results fade-in.
    pub fn complete_results_reveal(&mut self) {
        self.results.reveal = self.results.reveal.complete();
    }

    /// Consumes a pending scroll request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.results.scroll_requested)
    }

    /// Queues a notification and returns its id.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id = self.next_notification_id.wrapping_add(1);
        self.notifications.push(Notification {
            id,
            message: message.into(),
            kind,
        });
        id
    }

    /// Removes a notification. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.notifications.retain(|notification| notification.id != id);
    }

    /// Most recent notification.
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for greeting bands and panel transitions.

    use super::*;

    #[test]
    fn greeting_bands_cover_the_day() {
        let expected = [
            (0, TimeOfDay::Night),
            (4, TimeOfDay::Night),
            (5, TimeOfDay::Morning),
            (11, TimeOfDay::Morning),
            (12, TimeOfDay::Afternoon),
            (16, TimeOfDay::Afternoon),
            (17, TimeOfDay::Evening),
            (20, TimeOfDay::Evening),
            (21, TimeOfDay::Night),
            (23, TimeOfDay::Night),
        ];
        for (hour, band) in expected {
            assert_eq!(TimeOfDay::from_hour(hour), band, "hour {hour}");
        }
        assert_eq!(Greeting::new("Alice", 9).text(), "Good Morning, Alice ☀️");
    }

    #[test]
    fn analysis_cycle_restores_idle_button() {
        let mut state = UiState::new("0.1.0");
        state.show_preview("data:image/png;base64,AA==");
        assert!(state.analyze.enabled);

        state.begin_analysis();
        assert!(!state.analyze.enabled);
        assert_eq!(state.analyze.label(), ANALYZE_BUSY_LABEL);

        state.finish_analysis(true);
        assert!(state.analyze.enabled);
        assert_eq!(state.analyze.label(), ANALYZE_IDLE_LABEL);
    }

    #[test]
    fn reveal_completes_only_when_pending() {
        let mut state = UiState::new("0.1.0");
        state.complete_results_reveal();
        assert_eq!(state.results.reveal, Reveal::Hidden);

        state.show_results(RenderedResult {
            food_name: "Rice".to_string(),
            calories: "130".to_string(),
            protein: "--".to_string(),
            carbs: "--".to_string(),
            fats: "--".to_string(),
            health_tip: "Enjoy your meal!".to_string(),
            detected_labels: "Detected items: Rice".to_string(),
        });
        assert!(state.take_scroll_request());
        assert!(!state.take_scroll_request());
        state.complete_results_reveal();
        assert_eq!(state.results.reveal, Reveal::Revealed);
    }

    #[test]
    fn notifications_dismiss_by_id() {
        let mut state = UiState::new("0.1.0");
        let first = state.notify("one", NotificationKind::Info);
        let second = state.notify("two", NotificationKind::Error);
        state.dismiss(first);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].id, second);
        state.dismiss(first);
        assert_eq!(state.notifications.len(), 1);
    }
}
