#![allow(dead_code)]

use backend::config::AppConfig;
use backend::db::places::NewPlace;
use backend::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const BOUNDARY: &str = "----places-test-boundary";

/// Application state backed by a fresh database file. Keep the `TempDir`
/// alive for the duration of the test.
pub fn temp_state() -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig::default();
    config.database.path = dir.path().join("places.sqlite");
    let state = AppState::new(config);
    state.db.migrate().expect("migrate");
    (dir, state)
}

pub fn place_json(title: &str) -> Value {
    json!({
        "title": title,
        "address": "Rue de Marseille",
        "category": "Restaurant",
        "governorate": "Tunis",
        "latitude": 36.8,
        "longitude": 10.18
    })
}

pub fn new_place(title: &str) -> NewPlace {
    NewPlace {
        title: title.to_string(),
        address: "Rue de Marseille".to_string(),
        category: "Restaurant".to_string(),
        governorate: "Tunis".to_string(),
        latitude: 36.8,
        longitude: 10.18,
        ..NewPlace::default()
    }
}

/// A `multipart/form-data` body with a single `file` part.
pub fn multipart_file(file_name: &str, content: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
