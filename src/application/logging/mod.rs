//! Conversation logging - one channel logger plus lazily created query loggers

use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::traits::{LogScope, LogSink};

/// Event kinds a conversation logger can record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Message,
    Notice,
    Action,
    Join,
    Part,
    Quit,
}

/// Who or what a logger is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSource {
    pub name: String,
    pub host: Option<String>,
}

impl LoggerSource {
    pub fn new(name: impl Into<String>, host: Option<String>) -> Self {
        Self {
            name: name.into(),
            host,
        }
    }
}

/// Writes formatted conversation lines to a sink
#[derive(Clone)]
pub struct ConversationLogger {
    scope: LogScope,
    source: LoggerSource,
    sink: Arc<dyn LogSink>,
    enabled: bool,
}

impl ConversationLogger {
    pub fn channel(name: impl Into<String>, sink: Arc<dyn LogSink>, enabled: bool) -> Self {
        Self {
            scope: LogScope::Channel,
            source: LoggerSource::new(name, None),
            sink,
            enabled,
        }
    }

    pub fn query(nick: impl Into<String>, host: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            scope: LogScope::Query,
            source: LoggerSource::new(nick, Some(host.into())),
            sink,
            enabled: true,
        }
    }

    pub fn scope(&self) -> LogScope {
        self.scope
    }

    pub fn source(&self) -> &LoggerSource {
        &self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one line. A disabled logger does nothing; sink failures are
    /// reported and swallowed.
    pub fn log(&self, kind: LogKind, nick: &str, host: Option<&str>, message: Option<&str>) {
        if !self.enabled {
            return;
        }

        let line = format!(
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            format_line(kind, nick, host, message)
        );

        if let Err(e) = self.sink.append(self.scope, &self.source.name, &line) {
            tracing::warn!("Failed to write {} log for {}: {}", self.scope.as_str(), self.source.name, e);
        }
    }
}

fn format_line(kind: LogKind, nick: &str, host: Option<&str>, message: Option<&str>) -> String {
    let who = match host {
        Some(host) if !host.is_empty() => format!("{} ({})", nick, host),
        _ => nick.to_string(),
    };
    let reason = message.map(|m| format!(" ({})", m)).unwrap_or_default();
    let text = message.unwrap_or_default();

    match kind {
        LogKind::Message => format!("<{}> {}", nick, text),
        LogKind::Notice => format!("-{}- {}", nick, text),
        LogKind::Action => format!("* {} {}", nick, text),
        LogKind::Join => format!("*** {} has joined", who),
        LogKind::Part => format!("*** {} has left{}", who, reason),
        LogKind::Quit => format!("*** {} has quit{}", who, reason),
    }
}

/// Owns the channel logger and the per-nick query loggers of one connection
pub struct LoggerRegistry {
    channel: ConversationLogger,
    queries: HashMap<String, ConversationLogger>,
    sink: Arc<dyn LogSink>,
}

impl LoggerRegistry {
    pub fn new(channel: impl Into<String>, sink: Arc<dyn LogSink>, channel_logging: bool) -> Self {
        Self {
            channel: ConversationLogger::channel(channel, sink.clone(), channel_logging),
            queries: HashMap::new(),
            sink,
        }
    }

    pub fn channel_logger(&self) -> &ConversationLogger {
        &self.channel
    }

    /// Logger for a conversation partner, created on first contact.
    /// Keyed by nick only: the host seen at creation is kept even if it changes.
    pub fn query_logger(&mut self, nick: &str, host: &str) -> &ConversationLogger {
        let sink = &self.sink;
        self.queries.entry(nick.to_string()).or_insert_with(|| {
            tracing::debug!("Creating query logger for {}", nick);
            ConversationLogger::query(nick, host, sink.clone())
        })
    }

    /// Number of query loggers created so far. Entries are never evicted.
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryLogSink;

    #[test]
    fn test_query_logger_created_once_per_nick() {
        let sink = Arc::new(MemoryLogSink::new());
        let mut registry = LoggerRegistry::new("#nano", sink, true);

        registry.query_logger("alice", "first.host");
        let logger = registry.query_logger("alice", "second.host");

        assert_eq!(logger.source().host.as_deref(), Some("first.host"));
        assert_eq!(registry.query_count(), 1);
    }

    #[test]
    fn test_disabled_channel_logger_is_noop() {
        let sink = Arc::new(MemoryLogSink::new());
        let registry = LoggerRegistry::new("#nano", sink.clone(), false);

        registry
            .channel_logger()
            .log(LogKind::Message, "alice", Some("host"), Some("hi"));

        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_line_formats() {
        assert_eq!(format_line(LogKind::Message, "bob", None, Some("hi")), "<bob> hi");
        assert_eq!(format_line(LogKind::Action, "bob", None, Some("waves")), "* bob waves");
        assert_eq!(
            format_line(LogKind::Part, "bob", Some("h.org"), None),
            "*** bob (h.org) has left"
        );
        assert_eq!(
            format_line(LogKind::Quit, "bob", Some("h.org"), Some("bye")),
            "*** bob (h.org) has quit (bye)"
        );
    }

    #[test]
    fn test_channel_log_written_to_sink() {
        let sink = Arc::new(MemoryLogSink::new());
        let registry = LoggerRegistry::new("#nano", sink.clone(), true);

        registry
            .channel_logger()
            .log(LogKind::Notice, "nano", None, Some("hello"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].scope, LogScope::Channel);
        assert_eq!(entries[0].name, "#nano");
        assert!(entries[0].line.ends_with("-nano- hello"));
    }
}
