//! Postmaster - sends delivery actions to the right target and logs
//! what the bot says in the channel

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::logging::{ConversationLogger, LogKind};
use crate::domain::entities::{DeliveryAction, DestinationKey, Source};
use crate::domain::traits::Transport;

/// How a message goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    Message,
    Notice,
    Action,
}

/// Resolved target for one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub target: String,
    pub send: SendKind,
    /// Channel log kind, when this send is logged
    pub log: Option<LogKind>,
}

/// Map a destination key to its target. `public` is whether the triggering
/// event came from the channel. Sends to the requester are never logged here.
pub fn route(key: DestinationKey, public: bool, channel: &str, requester: &str) -> Route {
    let to_channel = |send: SendKind, log: LogKind| Route {
        target: channel.to_string(),
        send,
        log: Some(log),
    };
    let to_requester = |send: SendKind| Route {
        target: requester.to_string(),
        send,
        log: None,
    };
    let to_origin = |send: SendKind, log: LogKind| {
        if public {
            to_channel(send, log)
        } else {
            to_requester(send)
        }
    };

    match key {
        DestinationKey::Public => to_channel(SendKind::Message, LogKind::Message),
        DestinationKey::PublicNotice => to_channel(SendKind::Notice, LogKind::Notice),
        DestinationKey::PublicAction => to_channel(SendKind::Action, LogKind::Action),
        DestinationKey::Private => to_requester(SendKind::Message),
        DestinationKey::PrivateNotice => to_requester(SendKind::Notice),
        DestinationKey::PrivateAction => to_requester(SendKind::Action),
        DestinationKey::Action => to_origin(SendKind::Action, LogKind::Action),
        // Resolution never yields `Command`; treat it like any unknown key
        DestinationKey::Default | DestinationKey::Command => {
            to_origin(SendKind::Message, LogKind::Message)
        }
    }
}

/// Delivers resolved actions through the transport
pub struct Postmaster {
    transport: Arc<dyn Transport>,
    channel: String,
    channel_logger: ConversationLogger,
}

impl Postmaster {
    pub fn new(
        transport: Arc<dyn Transport>,
        channel: impl Into<String>,
        channel_logger: ConversationLogger,
    ) -> Self {
        Self {
            transport,
            channel: channel.into(),
            channel_logger,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Deliver `actions` in order. Stops at the first transport error.
    pub async fn deliver(
        &self,
        actions: &[DeliveryAction],
        source: &Source,
        public: bool,
    ) -> Result<(), BotError> {
        for action in actions {
            let route = route(action.key, public, &self.channel, &source.nick);

            if let Some(kind) = route.log {
                let nick = self.transport.nickname();
                self.channel_logger.log(kind, &nick, None, Some(&action.text));
            }

            match route.send {
                SendKind::Message => {
                    tracing::info!("Sending message to {}", route.target);
                    self.transport.send_message(&route.target, &action.text).await?;
                }
                SendKind::Notice => {
                    tracing::info!("Sending notice to {}", route.target);
                    self.transport.send_notice(&route.target, &action.text).await?;
                }
                SendKind::Action => {
                    tracing::info!("Sending action to {}", route.target);
                    self.transport.send_action(&route.target, &action.text).await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_public_event() {
        let cases = [
            (DestinationKey::Public, "#nano", SendKind::Message, Some(LogKind::Message)),
            (DestinationKey::PublicNotice, "#nano", SendKind::Notice, Some(LogKind::Notice)),
            (DestinationKey::PublicAction, "#nano", SendKind::Action, Some(LogKind::Action)),
            (DestinationKey::Private, "alice", SendKind::Message, None),
            (DestinationKey::PrivateNotice, "alice", SendKind::Notice, None),
            (DestinationKey::PrivateAction, "alice", SendKind::Action, None),
            (DestinationKey::Action, "#nano", SendKind::Action, Some(LogKind::Action)),
            (DestinationKey::Default, "#nano", SendKind::Message, Some(LogKind::Message)),
        ];

        for (key, target, send, log) in cases {
            let route = route(key, true, "#nano", "alice");
            assert_eq!(route.target, target, "{:?}", key);
            assert_eq!(route.send, send, "{:?}", key);
            assert_eq!(route.log, log, "{:?}", key);
        }
    }

    #[test]
    fn test_route_origin_keys_private_event() {
        let action = route(DestinationKey::Action, false, "#nano", "alice");
        assert_eq!(action.target, "alice");
        assert_eq!(action.send, SendKind::Action);
        assert_eq!(action.log, None);

        let default = route(DestinationKey::Default, false, "#nano", "alice");
        assert_eq!(default.target, "alice");
        assert_eq!(default.log, None);
    }

    #[test]
    fn test_route_public_keys_ignore_origin() {
        let route = route(DestinationKey::PublicNotice, false, "#nano", "alice");
        assert_eq!(route.target, "#nano");
        assert_eq!(route.log, Some(LogKind::Notice));
    }
}
