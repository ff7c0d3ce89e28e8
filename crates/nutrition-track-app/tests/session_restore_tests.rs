//! Integration tests for the initial screen and stored-session handling.

mod common;

use nutrition_track_auth::{MemoryStorage, SESSION_STORAGE_KEY, SessionState};
use nutrition_track_ui::{Reveal, Screen, TimeOfDay};

use common::ScriptedTransport;

#[test]
fn session_restore_tests_existing_record_opens_main_screen() {
    let storage = MemoryStorage::with_entry(
        SESSION_STORAGE_KEY,
        r#"{"email":"carol@example.com","name":"Carol"}"#,
    );
    let mut app = common::controller_with_storage(storage, ScriptedTransport::reply(200, "{}"));

    app.render_for_auth_state(22);

    assert_eq!(app.ui().screen, Screen::Main);
    let greeting = app.ui().greeting.greeting.clone().expect("greeting should be set");
    assert_eq!(greeting.time_of_day, TimeOfDay::Night);
    assert!(greeting.text().starts_with("Good Night, Carol"));
    assert_eq!(app.ui().greeting.reveal, Reveal::Pending);

    app.complete_greeting_reveal();
    assert_eq!(app.ui().greeting.reveal, Reveal::Revealed);
}

#[test]
fn session_restore_tests_malformed_record_degrades_to_default_name() {
    let storage = MemoryStorage::with_entry(SESSION_STORAGE_KEY, "{not json");
    let mut app = common::controller_with_storage(storage, ScriptedTransport::reply(200, "{}"));

    assert_eq!(app.session().display_name(), "User");
    assert_eq!(app.session_state(), SessionState::Anonymous);

    app.render_for_auth_state(9);
    assert_eq!(
        app.ui().greeting.greeting.as_ref().map(|greeting| greeting.text()),
        Some("Good Morning, User ☀️".to_string())
    );
}

#[test]
fn session_restore_tests_empty_storage_shows_auth_screen() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.render_for_auth_state(9);

    assert!(!app.session().is_logged_in());
    assert_eq!(app.session().display_name(), "User");
    assert_eq!(app.ui().screen, Screen::Auth);
    assert!(app.ui().greeting.greeting.is_none());
}
