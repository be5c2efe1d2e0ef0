//! Append-only JSONL audit trail.
//!
//! Every [`AuditEvent`] becomes one line: the event payload plus `type` and an
//! RFC3339 `timestamp`. The file is opened in append mode so successive runs
//! against the same path accumulate instead of replacing earlier cases.

use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tnm_application::{AuditEvent, AuditLogger};
use tracing::warn;

/// Audit logger writing one JSON object per line.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open (or create) the trail at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("audit writer poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

/// Merge `type` and `timestamp` into an object payload; wrap anything else
/// under `data`.
fn audit_record(event: AuditEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert("timestamp".to_string(), Value::from(timestamp));
    Value::Object(record)
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let event_type = event.event_type;
        let record = audit_record(event, timestamp);

        let result = serde_json::to_string(&record)
            .map_err(io::Error::from)
            .and_then(|line| self.write_line(&line));
        if let Err(e) = result {
            warn!(
                "Dropped {} audit event for {}: {}",
                event_type,
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tnm_application::{StageCaseInput, StageCaseUseCase};
    use tnm_domain::{StagingPipeline, TranscriptMessage};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::open(&path).unwrap();

        logger.log(AuditEvent::new(
            "vote_completed",
            json!({"case_id": "1", "label": "T1,N0,M0"}),
        ));
        logger.log(AuditEvent::new("case_failed", json!("plain")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "vote_completed");
        assert_eq!(lines[0]["label"], "T1,N0,M0");
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "case_failed");
        assert_eq!(lines[1]["data"], "plain");
    }

    #[test]
    fn test_successive_runs_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let first = JsonlAuditLogger::open(&path).unwrap();
        first.log(AuditEvent::new("vote_completed", json!({"case_id": "1"})));
        drop(first);

        let second = JsonlAuditLogger::open(&path).unwrap();
        second.log(AuditEvent::new("vote_completed", json!({"case_id": "2"})));
        drop(second);

        let ids: Vec<Value> = read_lines(&path)
            .into_iter()
            .map(|v| v["case_id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("1"), json!("2")]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/audit.jsonl");
        let logger = JsonlAuditLogger::open(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlAuditLogger::open(dir.path()).is_err());
    }

    #[test]
    fn test_records_staging_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = Arc::new(JsonlAuditLogger::open(&path).unwrap());

        let use_case = StageCaseUseCase::new(Arc::new(StagingPipeline::default()))
            .with_audit_logger(logger.clone());
        let input = StageCaseInput::new("9", vec![TranscriptMessage::new("A", "T4 N3 M1")]);
        use_case.execute(&input).unwrap();

        let types: Vec<String> = read_lines(&path)
            .iter()
            .map(|v| v["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, vec!["proposals_extracted", "vote_completed"]);
    }
}
