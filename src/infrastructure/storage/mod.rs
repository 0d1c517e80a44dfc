//! Conversation log sinks

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::traits::{LogScope, LogSink};

/// Appends lines to `<base>/<scope>/<name>.log`
pub struct FileLogSink {
    base_path: PathBuf,
}

impl FileLogSink {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.base_path.join(LogScope::Channel.as_str()))?;
        fs::create_dir_all(self.base_path.join(LogScope::Query.as_str()))?;
        Ok(())
    }

    fn path_for(&self, scope: LogScope, name: &str) -> PathBuf {
        // Nicks and channel names may contain path separators
        let file_name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        self.base_path.join(scope.as_str()).join(format!("{}.log", file_name))
    }
}

impl LogSink for FileLogSink {
    fn append(&self, scope: LogScope, name: &str, line: &str) -> Result<(), StorageError> {
        let path = self.path_for(scope, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// A recorded log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub scope: LogScope,
    pub name: String,
    pub line: String,
}

/// In-memory sink
#[derive(Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, scope: LogScope, name: &str, line: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Poisoned("memory log sink".to_string()))?;
        entries.push(LogEntry {
            scope,
            name: name.to_string(),
            line: line.to_string(),
        });
        Ok(())
    }
}
