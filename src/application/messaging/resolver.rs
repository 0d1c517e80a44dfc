//! Reply resolver - normalizes raw replies into ordered delivery actions

use std::sync::Arc;
use std::time::Duration;

use super::parser::MessageParser;
use crate::application::errors::CommandError;
use crate::domain::entities::{DeliveryAction, DestinationKey, RawReply, ReplyItem, Source};
use crate::domain::traits::Commander;

/// Run a command under `timeout`. A timeout is reported as `CommandError::Timeout`.
pub async fn try_execute(
    commander: &dyn Commander,
    command: &str,
    source: &Source,
    public: bool,
    timeout: Duration,
) -> Result<Option<RawReply>, CommandError> {
    tracing::info!("Executing command {}", command);
    match tokio::time::timeout(timeout, commander.execute(command, source, public)).await {
        Ok(result) => result,
        Err(_) => Err(CommandError::Timeout(timeout.as_secs())),
    }
}

/// Run a command; failures are logged and become "no reply"
pub async fn execute_command(
    commander: &dyn Commander,
    command: &str,
    source: &Source,
    public: bool,
    timeout: Duration,
) -> Option<RawReply> {
    match try_execute(commander, command, source, public, timeout).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Error when executing command \"{}\": {}", command, e);
            None
        }
    }
}

/// Turns a raw reply into delivery actions, sanitizing each text exactly once
pub struct ReplyResolver {
    commander: Arc<dyn Commander>,
    parser: MessageParser,
    timeout: Duration,
}

impl ReplyResolver {
    pub fn new(commander: Arc<dyn Commander>, timeout: Duration) -> Self {
        Self {
            commander,
            parser: MessageParser::new(),
            timeout,
        }
    }

    /// Resolve `reply` for an event from `source`. Actions keep the order of
    /// the reply; a `command` element expands in place to the actions of its
    /// result, all routed to the default destination.
    pub async fn resolve(
        &self,
        reply: Option<RawReply>,
        source: &Source,
        public: bool,
    ) -> Vec<DeliveryAction> {
        let Some(reply) = reply else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        for item in reply.into_items() {
            match item {
                ReplyItem::Destination(DestinationKey::Command, command) => {
                    let nested = execute_command(
                        self.commander.as_ref(),
                        &command,
                        source,
                        public,
                        self.timeout,
                    )
                    .await;
                    actions.extend(self.resolve_nested(nested));
                }
                item => actions.push(self.resolve_item(item)),
            }
        }
        actions
    }

    /// Result of a `command` re-dispatch: never executes further commands
    fn resolve_nested(&self, reply: Option<RawReply>) -> Vec<DeliveryAction> {
        reply
            .map(RawReply::into_items)
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let mut action = self.resolve_item(item);
                action.key = DestinationKey::Default;
                action
            })
            .collect()
    }

    fn resolve_item(&self, item: ReplyItem) -> DeliveryAction {
        match item {
            ReplyItem::PlainText(text) => {
                DeliveryAction::new(DestinationKey::Default, self.parser.sanitize(&text))
            }
            ReplyItem::Destination(DestinationKey::Command, command) => {
                tracing::warn!("Nested command \"{}\" not executed, delivering as text", command);
                DeliveryAction::new(DestinationKey::Default, self.parser.sanitize(&command))
            }
            ReplyItem::Destination(key, text) => DeliveryAction::new(key, self.parser.sanitize(&text)),
        }
    }
}
