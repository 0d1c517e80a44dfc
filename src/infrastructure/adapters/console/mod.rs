//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::errors::BotError;
use crate::domain::entities::{Event, EventKind, Source};
use crate::domain::traits::Transport;

/// Console transport: typed lines become events from one local user, and
/// outbound messages are printed
pub struct ConsoleAdapter {
    nick: String,
    channel: String,
    user: Source,
}

impl ConsoleAdapter {
    pub fn new(nick: impl Into<String>, channel: impl Into<String>, user: Source) -> Self {
        Self {
            nick: nick.into(),
            channel: channel.into(),
            user,
        }
    }

    pub fn lines(&self) -> Lines<BufReader<Stdin>> {
        BufReader::new(tokio::io::stdin()).lines()
    }

    /// Turn one typed line into an event. Blank lines yield `None`.
    ///
    /// `/me`, `/msg`, `/notice`, `/pnotice`, `/join`, `/part`, `/quit`,
    /// `/kick` and `/features` map to their event kinds; anything else is a
    /// channel message.
    pub fn parse_line(&self, line: &str) -> Option<Event> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (command, rest) = match line.strip_prefix('/') {
            Some(stripped) => {
                let (command, rest) = stripped.split_once(' ').unwrap_or((stripped, ""));
                (Some(command), rest.trim())
            }
            None => (None, line),
        };

        let public = |kind: EventKind| Event::new(kind, self.user.clone(), self.channel.as_str());
        let private = |kind: EventKind| Event::new(kind, self.user.clone(), self.nick.as_str());
        let with_reason = |event: Event| {
            if rest.is_empty() {
                event
            } else {
                event.with_argument(rest)
            }
        };

        let event = match command {
            None => public(EventKind::Message).with_argument(rest),
            Some("me") => public(EventKind::Action).with_argument(rest),
            Some("msg") => private(EventKind::Message).with_argument(rest),
            Some("notice") => public(EventKind::Notice).with_argument(rest),
            Some("pnotice") => private(EventKind::Notice).with_argument(rest),
            Some("join") => public(EventKind::Join),
            Some("part") => with_reason(public(EventKind::Part)),
            Some("quit") => with_reason(Event::new(EventKind::Quit, self.user.clone(), "")),
            Some("kick") => public(EventKind::Kick)
                .with_arguments(rest.split_whitespace().map(String::from).collect()),
            Some("features") => {
                Event::new(EventKind::FeatureList, Source::new("server", ""), self.nick.as_str())
                    .with_arguments(rest.split_whitespace().map(String::from).collect())
            }
            // Unknown slash commands are ordinary text, so ">>>" triggers still work after them
            Some(_) => public(EventKind::Message).with_argument(line),
        };
        Some(event)
    }
}

#[async_trait]
impl Transport for ConsoleAdapter {
    fn nickname(&self) -> String {
        self.nick.clone()
    }

    async fn send_message(&self, target: &str, text: &str) -> Result<(), BotError> {
        println!("[{}] <{}> {}", target, self.nick, text);
        Ok(())
    }

    async fn send_notice(&self, target: &str, text: &str) -> Result<(), BotError> {
        println!("[{}] -{}- {}", target, self.nick, text);
        Ok(())
    }

    async fn send_action(&self, target: &str, text: &str) -> Result<(), BotError> {
        println!("[{}] * {} {}", target, self.nick, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ConsoleAdapter {
        ConsoleAdapter::new("Nano", "#nano", Source::new("console", "localhost"))
    }

    #[test]
    fn test_plain_line_is_public_message() {
        let event = adapter().parse_line(">>>help").expect("event");
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.target, "#nano");
        assert_eq!(event.payload(), Some(">>>help"));
    }

    #[test]
    fn test_msg_is_private() {
        let event = adapter().parse_line("/msg hello there").expect("event");
        assert_eq!(event.kind, EventKind::Message);
        assert!(!event.is_public("Nano"));
        assert_eq!(event.payload(), Some("hello there"));
    }

    #[test]
    fn test_part_without_reason_has_no_payload() {
        let event = adapter().parse_line("/part").expect("event");
        assert_eq!(event.kind, EventKind::Part);
        assert_eq!(event.payload(), None);
    }

    #[test]
    fn test_features_tokens() {
        let event = adapter().parse_line("/features NETWORK=Test EXCEPTS").expect("event");
        assert_eq!(event.kind, EventKind::FeatureList);
        assert_eq!(event.arguments, vec!["NETWORK=Test", "EXCEPTS"]);
    }

    #[test]
    fn test_blank_line_ignored() {
        assert!(adapter().parse_line("   ").is_none());
    }
}
