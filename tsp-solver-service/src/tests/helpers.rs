//! Test helpers for request files and temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::ResponseEnvelope;

/// Temporary directory addressed by a UTF-8 path.
pub(super) fn utf8_workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// A VRP request over `count` locations spaced one degree apart on the
/// equator, depot first.
pub(super) fn line_vrp_request(id: &str, count: u32) -> Value {
    let locations: Vec<Value> = (0..count)
        .map(|i| json!({"latitude": 0.0, "longitude": f64::from(i)}))
        .collect();
    json!({
        "message_type": "VRP",
        "id": id,
        "locations": locations,
        "depot": 0,
        "num_vehicles": 1,
        "max_distance": 1000,
        "cost_coefficient": 1
    })
}

/// Write `messages` as one JSON value per line.
pub(super) fn write_json_lines(path: &Utf8Path, messages: &[Value]) {
    let mut payload = String::new();
    for message in messages {
        payload.push_str(&serde_json::to_string(message).expect("serialize message"));
        payload.push('\n');
    }
    write_utf8(path, payload.as_bytes());
}

/// Decode newline-delimited envelopes.
pub(super) fn parse_envelopes(output: &[u8]) -> Vec<ResponseEnvelope> {
    std::str::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("envelope JSON"))
        .collect()
}
