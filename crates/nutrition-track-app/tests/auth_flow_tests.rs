//! Integration tests for login, signup, and logout.

mod common;

use nutrition_track_app::{AppConfig, AppController, AppError};
use nutrition_track_auth::{
    KeyValueStore, MemoryStorage, SESSION_STORAGE_KEY, SessionError, StorageError, ValidationError,
};
use nutrition_track_core::{FileSource, SessionRecord};
use nutrition_track_ui::{AuthForm, NotificationKind, Screen};

use common::ScriptedTransport;

#[test]
fn auth_flow_tests_login_derives_name_and_shows_main_screen() {
    let storage = MemoryStorage::new();
    let mut app = common::controller_with_storage(storage.clone(), ScriptedTransport::reply(200, "{}"));

    let record = app
        .login("  alice@example.com ", "secret1", 9)
        .expect("login should succeed");

    assert_eq!(record, SessionRecord::new("alice@example.com", "Alice"));
    assert!(app.session().is_logged_in());
    assert_eq!(app.session().display_name(), "Alice");
    assert_eq!(app.ui().screen, Screen::Main);
    assert_eq!(
        storage.get(SESSION_STORAGE_KEY).as_deref(),
        Some(r#"{"email":"alice@example.com","name":"Alice"}"#)
    );
    let last = app.ui().last_notification().expect("login should notify");
    assert_eq!(last.message, "Welcome back!");
    assert_eq!(last.kind, NotificationKind::Success);
}

#[test]
fn auth_flow_tests_login_rejects_blank_fields() {
    let storage = MemoryStorage::new();
    let mut app = common::controller_with_storage(storage.clone(), ScriptedTransport::reply(200, "{}"));
    app.render_for_auth_state(9);

    for (email, password) in [("", "secret1"), ("alice@example.com", ""), ("   ", "   ")] {
        let error = app.login(email, password, 9).expect_err("blank field should fail");
        assert_eq!(
            error,
            AppError::Session(SessionError::Validation(ValidationError::MissingField))
        );
    }

    assert!(storage.is_empty());
    assert_eq!(app.ui().screen, Screen::Auth);
    let last = app.ui().last_notification().expect("failure should notify");
    assert_eq!(last.message, "Please fill in all fields");
    assert_eq!(last.kind, NotificationKind::Error);
}

#[test]
fn auth_flow_tests_signup_validation_never_persists() {
    let storage = MemoryStorage::new();
    let mut app = common::controller_with_storage(storage.clone(), ScriptedTransport::reply(200, "{}"));

    let cases = [
        ("", "bob@example.com", "hunter22"),
        ("Bob", "", "hunter22"),
        ("Bob", "bob@example.com", ""),
        ("Bob", "bob@example.com", "short"),
    ];
    for (name, email, password) in cases {
        assert!(app.signup(name, email, password, 14).is_err());
        assert!(!app.session().is_logged_in());
    }

    assert!(storage.is_empty());
    assert_eq!(
        app.ui().last_notification().map(|n| n.message.as_str()),
        Some("Password must be at least 6 characters")
    );
}

#[test]
fn auth_flow_tests_signup_keeps_name_verbatim() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.toggle_auth_mode(false);
    assert_eq!(app.ui().auth_form, AuthForm::Signup);

    let record = app
        .signup(" Bobby Tables ", "bob@example.com", "123456", 14)
        .expect("six characters is enough");

    assert_eq!(record.name, "Bobby Tables");
    assert_eq!(app.session().display_name(), "Bobby Tables");
    assert_eq!(
        app.ui().greeting.greeting.as_ref().map(|greeting| greeting.text()),
        Some("Good Afternoon, Bobby Tables 🌤️".to_string())
    );
}

#[test]
fn auth_flow_tests_logout_clears_session_and_pending_file() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.login("alice@example.com", "secret1", 9).expect("login should succeed");
    app.select_file(common::jpeg("lunch.jpg", FileSource::ManualPick))
        .expect("image should be accepted");
    assert!(app.ui().analyze.enabled);

    app.logout(9);

    assert!(!app.session().is_logged_in());
    assert!(app.intake().pending().is_none());
    assert!(!app.ui().analyze.enabled);
    assert!(!app.ui().upload.preview_visible());
    assert_eq!(app.ui().screen, Screen::Auth);
    assert!(app.ui().greeting.greeting.is_none());
    assert_eq!(
        app.ui().last_notification().map(|n| n.message.as_str()),
        Some("Logged out successfully")
    );
}

#[test]
fn auth_flow_tests_successful_submit_clears_forms() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    let before = app.ui().form_generation;
    let _ = app.login("", "", 9);
    assert_eq!(app.ui().form_generation, before);
    app.login("alice@example.com", "secret1", 9).expect("login should succeed");
    assert_ne!(app.ui().form_generation, before);
}

#[test]
fn auth_flow_tests_toggle_switches_forms_both_ways() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.render_for_auth_state(9);
    assert_eq!(app.ui().auth_form, AuthForm::Login);

    app.toggle_auth_mode(false);
    assert_eq!(app.ui().auth_form, AuthForm::Signup);
    app.toggle_auth_mode(true);
    assert_eq!(app.ui().auth_form, AuthForm::Login);
    app.toggle_auth_mode(true);
    assert_eq!(app.ui().auth_form, AuthForm::Login);
    assert_eq!(app.ui().screen, Screen::Auth);
}

struct FullStorage;

impl KeyValueStore for FullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError("QuotaExceededError".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[test]
fn auth_flow_tests_storage_failure_is_notified_and_stays_on_auth() {
    let mut app = AppController::new(
        AppConfig::default(),
        FullStorage,
        ScriptedTransport::reply(200, "{}"),
    )
    .expect("default config should build a controller");
    app.render_for_auth_state(9);

    let error = app
        .login("alice@example.com", "secret1", 9)
        .expect_err("write should fail");

    assert!(matches!(error, AppError::Session(SessionError::Storage(_))));
    assert_eq!(app.ui().screen, Screen::Auth);
    assert!(!app.session().is_logged_in());
    let last = app.ui().last_notification().expect("failure should notify");
    assert_eq!(last.message, "Could not save your session. Please try again.");
    assert_eq!(last.kind, NotificationKind::Error);
}
