//! Append-only JSONL ledger of registry mutations.
//!
//! Each mutation of the license plate set writes one line, success or not,
//! so the file can be replayed to see how the set evolved.

use crate::core::error::GarageError;
use crate::core::time;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts: String,
    pub event_id: String,
    pub op: String,
    pub plate: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger path derived from a plate file: `plates.json` -> `plates.events.jsonl`.
    pub fn beside(plates_path: &Path) -> Self {
        let stem = plates_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "plates".to_string());
        Self::new(plates_path.with_file_name(format!("{}.events.jsonl", stem)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, op: &str, plate: Option<&str>, ok: bool) -> Result<(), GarageError> {
        let ev = AuditEvent {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            op: op.to_string(),
            plate: plate.map(|p| p.to_string()),
            status: if ok { "success" } else { "error" }.to_string(),
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{}", serde_json::to_string(&ev)?)?;
        Ok(())
    }

    /// Reads every event back. A missing ledger is an empty history.
    pub fn read_all(&self) -> Result<Vec<AuditEvent>, GarageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(GarageError::from))
            .collect()
    }
}
