//! Integration tests for picking, dropping, and resetting the pending file.

mod common;

use futures::executor::block_on;
use nutrition_track_app::AppError;
use nutrition_track_core::{FileSource, PendingFile};
use nutrition_track_intake::UploadError;
use nutrition_track_ui::NotificationKind;

use common::ScriptedTransport;

#[test]
fn file_selection_tests_image_enables_analysis_with_preview() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    assert!(!app.ui().analyze.enabled);

    app.select_file(common::jpeg("dinner.jpg", FileSource::ManualPick))
        .expect("image should be accepted");

    assert_eq!(
        app.intake().pending().map(|file| file.name.as_str()),
        Some("dinner.jpg")
    );
    assert!(app.ui().analyze.enabled);
    assert_eq!(
        app.ui().upload.preview_src.as_deref(),
        Some("data:image/jpeg;base64,/9j/4A==")
    );
}

#[test]
fn file_selection_tests_non_image_leaves_pending_file_unchanged() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.select_file(common::jpeg("first.jpg", FileSource::ManualPick))
        .expect("image should be accepted");
    let before = app.ui().clone();

    let error = app
        .select_file(PendingFile::new(
            "menu.pdf",
            "application/pdf",
            b"%PDF".to_vec(),
            FileSource::ManualPick,
        ))
        .expect_err("pdf should be rejected");

    assert_eq!(
        error,
        AppError::Upload(UploadError::InvalidType("application/pdf".to_string()))
    );
    assert_eq!(
        app.intake().pending().map(|file| file.name.as_str()),
        Some("first.jpg")
    );
    assert_eq!(app.ui().upload, before.upload);
    assert_eq!(app.ui().analyze, before.analyze);
    let last = app.ui().last_notification().expect("rejection should notify");
    assert_eq!(last.message, "Please select an image file");
    assert_eq!(last.kind, NotificationKind::Error);
}

#[test]
fn file_selection_tests_drop_uses_same_validation_and_clears_highlight() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));

    app.set_drag_active(true);
    assert!(app.ui().upload.drag_active);
    let error = app
        .drop_file(Some(PendingFile::new(
            "notes.txt",
            "text/plain",
            b"rice".to_vec(),
            FileSource::DragDrop,
        )))
        .expect_err("text should be rejected");
    assert!(matches!(error, AppError::Upload(UploadError::InvalidType(_))));
    assert!(!app.ui().upload.drag_active);
    assert!(app.intake().pending().is_none());

    app.set_drag_active(true);
    app.drop_file(Some(common::jpeg("dropped.jpg", FileSource::DragDrop)))
        .expect("image should be accepted");
    assert!(!app.ui().upload.drag_active);
    assert_eq!(
        app.intake().pending().map(|file| file.source),
        Some(FileSource::DragDrop)
    );
}

#[test]
fn file_selection_tests_empty_drop_is_ignored() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    let notifications = app.ui().notifications.len();
    app.set_drag_active(true);

    app.drop_file(None).expect("empty drop is not an error");

    assert!(!app.ui().upload.drag_active);
    assert!(app.intake().pending().is_none());
    assert_eq!(app.ui().notifications.len(), notifications);
}

#[test]
fn file_selection_tests_oversized_image_is_rejected() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    let limit = app.config().max_upload_bytes;

    let error = app
        .select_file(PendingFile::new(
            "huge.png",
            "image/png",
            vec![0; limit + 1],
            FileSource::ManualPick,
        ))
        .expect_err("oversized image should be rejected");

    assert!(matches!(error, AppError::Upload(UploadError::TooLarge { .. })));
    assert_eq!(
        app.ui().last_notification().map(|n| n.message.as_str()),
        Some("Image is too large (max 16 MB)")
    );
}

#[test]
fn file_selection_tests_reset_twice_matches_reset_once() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.select_file(common::jpeg("meal.jpg", FileSource::ManualPick))
        .expect("image should be accepted");

    app.reset();
    let once = app.ui().clone();
    app.reset();

    assert_eq!(app.ui(), &once);
    assert!(app.intake().pending().is_none());
    assert!(!app.ui().analyze.enabled);
    assert!(!app.ui().upload.preview_visible());
    assert!(!app.ui().results.reveal.is_visible());
}

#[test]
fn file_selection_tests_new_selection_hides_previous_results() {
    let mut app = common::controller(ScriptedTransport::reply(200, r#"{"food_name":"Salad"}"#));
    app.select_file(common::jpeg("lunch.jpg", FileSource::ManualPick))
        .expect("image should be accepted");
    block_on(app.analyze()).expect("analysis should succeed");
    app.complete_results_reveal();
    assert!(app.ui().results.reveal.is_visible());

    app.drop_file(Some(common::jpeg("dinner.jpg", FileSource::DragDrop)))
        .expect("image should be accepted");

    assert!(!app.ui().results.reveal.is_visible());
    assert!(app.ui().analyze.enabled);
    assert_eq!(
        app.intake().pending().map(|file| file.name.as_str()),
        Some("dinner.jpg")
    );
}

#[test]
fn file_selection_tests_unreadable_file_is_notified_and_keeps_selection() {
    let mut app = common::controller(ScriptedTransport::reply(200, "{}"));
    app.select_file(common::jpeg("first.jpg", FileSource::ManualPick))
        .expect("image should be accepted");
    app.set_drag_active(true);

    let error = app.file_unreadable("NotReadableError");

    assert_eq!(
        error,
        AppError::Upload(UploadError::Unreadable("NotReadableError".to_string()))
    );
    assert!(!app.ui().upload.drag_active);
    assert!(app.ui().analyze.enabled);
    assert_eq!(
        app.intake().pending().map(|file| file.name.as_str()),
        Some("first.jpg")
    );
    let last = app.ui().last_notification().expect("read failure should notify");
    assert_eq!(last.message, "Could not read that file. Please try another image.");
    assert_eq!(last.kind, NotificationKind::Error);
}
