//! Trigger matcher - decides whether text is an explicit command invocation

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Marker that opens a command invocation
pub const TRIGGER: &str = ">>>";

static COMMAND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^>>>( )?[a-zA-Z]+").expect("command pattern is valid"));

/// Stateless; one instance can be shared by every connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerMatcher;

impl TriggerMatcher {
    pub fn new() -> Self {
        Self
    }

    /// `>>>`, an optional single space, then at least one ASCII letter
    pub fn is_command(&self, text: &str) -> bool {
        COMMAND_PATTERN.is_match(text)
    }

    /// Remove the trigger and its optional space. `None` if `text` has no trigger.
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text.strip_prefix(TRIGGER)?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command_matches_trigger() {
        let matcher = TriggerMatcher::new();
        assert!(matcher.is_command(">>>foo"));
        assert!(matcher.is_command(">>> foo"));
        assert!(matcher.is_command(">>>date extra args"));
    }

    #[test]
    fn test_is_command_rejects_other_text() {
        let matcher = TriggerMatcher::new();
        assert!(!matcher.is_command("foo"));
        assert!(!matcher.is_command(">> foo"));
        assert!(!matcher.is_command(">>>123"));
        assert!(!matcher.is_command(">>>  foo"));
        assert!(!matcher.is_command(" >>>foo"));
        assert!(!matcher.is_command(""));
    }

    #[test]
    fn test_strip_trigger() {
        let matcher = TriggerMatcher::new();
        assert_eq!(matcher.strip(">>> date now"), Some("date now"));
        assert_eq!(matcher.strip(">>>date"), Some("date"));
        assert_eq!(matcher.strip("date"), None);
    }
}
