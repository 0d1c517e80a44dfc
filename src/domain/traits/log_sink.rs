use crate::application::errors::StorageError;

/// Which kind of conversation a log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogScope {
    Channel,
    Query,
}

impl LogScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogScope::Channel => "channels",
            LogScope::Query => "queries",
        }
    }
}

/// Sink - abstraction for conversation log persistence
pub trait LogSink: Send + Sync {
    /// Append one formatted line to the log of `name` (channel or nick)
    fn append(&self, scope: LogScope, name: &str, line: &str) -> Result<(), StorageError>;
}
