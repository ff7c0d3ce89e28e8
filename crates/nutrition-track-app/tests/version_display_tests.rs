//! Integration tests for VERSION propagation into the page footer.

mod common;

use std::fs;

use nutrition_track_app::app_version;

use common::ScriptedTransport;

#[test]
fn version_display_tests_matches_root_version_file() {
    let root_version_path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../VERSION");
    let root_version = fs::read_to_string(root_version_path).expect("VERSION should be readable");
    assert_eq!(app_version(), root_version.trim());

    let app = common::controller(ScriptedTransport::reply(200, "{}"));
    assert_eq!(app.ui().version, root_version.trim());
}
