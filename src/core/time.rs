//! Event stamps and the wrapper for `--format json` output.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use ulid::Ulid;

/// Unix-epoch seconds with a `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs}Z")
}

pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

/// One JSON report per CLI command. `body` fields sit next to the stamp fields.
#[derive(Debug, Serialize)]
pub struct Report<B> {
    pub ts: String,
    pub event_id: String,
    pub cmd: &'static str,
    pub status: &'static str,
    #[serde(flatten)]
    pub body: B,
}

impl<B: Serialize> Report<B> {
    pub fn ok(cmd: &'static str, body: B) -> Self {
        Self {
            ts: now_epoch_z(),
            event_id: new_event_id(),
            cmd,
            status: "ok",
            body,
        }
    }
}
