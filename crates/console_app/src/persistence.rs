use std::fs;
use std::path::PathBuf;

use console_core::{LogEntry, LogStore, Severity, StoreError};
use console_engine::AtomicFileWriter;
use console_logging::console_warn;
use serde::{Deserialize, Serialize};

const ACTIVITY_FILENAME: &str = ".console_activity.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    timestamp: String,
    message: String,
    severity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedActivity {
    entries: Vec<PersistedEntry>,
}

/// Durable backing for the activity buffer: one RON document per session
/// directory, replaced wholesale on every save.
pub struct FileLogStore {
    dir: PathBuf,
}

impl FileLogStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(ACTIVITY_FILENAME)
    }
}

impl LogStore for FileLogStore {
    fn load(&self) -> Result<Vec<LogEntry>, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(err) => {
                console_warn!("Failed to read activity buffer from {:?}: {}", path, err);
                return Ok(Vec::new());
            }
        };

        let persisted: PersistedActivity = match ron::from_str(&content) {
            Ok(persisted) => persisted,
            Err(err) => {
                console_warn!("Failed to parse activity buffer from {:?}: {}", path, err);
                return Ok(Vec::new());
            }
        };

        Ok(persisted
            .entries
            .into_iter()
            .map(|entry| LogEntry {
                timestamp: entry.timestamp,
                message: entry.message,
                severity: severity_from_str(&entry.severity),
            })
            .collect())
    }

    fn save(&mut self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let persisted = PersistedActivity {
            entries: entries
                .iter()
                .map(|entry| PersistedEntry {
                    timestamp: entry.timestamp.clone(),
                    message: entry.message.clone(),
                    severity: entry.severity.to_string(),
                })
                .collect(),
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&persisted, pretty)
            .map_err(|err| StoreError(err.to_string()))?;

        let writer = AtomicFileWriter::new(self.dir.clone());
        writer
            .write(ACTIVITY_FILENAME, &content)
            .map_err(|err| StoreError(err.to_string()))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError(err.to_string())),
        }
    }
}

fn severity_from_str(raw: &str) -> Severity {
    match raw {
        "warn" => Severity::Warn,
        "error" => Severity::Error,
        "success" => Severity::Success,
        _ => Severity::Info,
    }
}
