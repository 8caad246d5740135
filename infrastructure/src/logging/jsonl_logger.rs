//! JSONL file writer for session events.
//!
//! Every [`SessionEvent`] becomes one line of the transcript. Lines are
//! flushed as they are written, so a transcript survives an interrupted run.

use chrono::{SecondsFormat, Utc};
use draftloop_application::{SessionEvent, SessionLogger};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL transcript of drafts, verdicts and provider attempts.
pub struct JsonlSessionLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSessionLogger {
    /// Open (or create) the transcript at `path` in append mode.
    ///
    /// Missing parent directories are created, so several runs can share one
    /// transcript. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match open_append(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Session log {} unavailable: {}", path.display(), e);
                None
            }
        }
    }

    /// Path of the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &Value) -> std::io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("session log writer poisoned"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Build one transcript line: the payload fields plus `type` and `timestamp`.
///
/// Non-object payloads are nested under `data`.
fn session_record(event: SessionEvent, timestamp: String) -> Value {
    match event.payload {
        Value::Object(mut fields) => {
            fields.insert("type".into(), Value::from(event.event_type));
            fields.insert("timestamp".into(), Value::from(timestamp));
            Value::Object(fields)
        }
        data => json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": data,
        }),
    }
}

impl SessionLogger for JsonlSessionLogger {
    fn log(&self, event: SessionEvent) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = session_record(event, timestamp);
        if let Err(e) = self.append(&record) {
            warn!("Dropped session log record for {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlSessionLogger {
    fn drop(&mut self) {
        if let Ok(writer) = self.writer.get_mut() {
            let _ = writer.flush();
        }
    }
}
