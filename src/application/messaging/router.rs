//! Event router - per-event pipeline: log, pick a reply source, resolve,
//! deliver, and fall back to lifecycle hooks

use std::sync::Arc;
use std::time::Duration;

use super::postmaster::Postmaster;
use super::resolver::{execute_command, ReplyResolver};
use super::trigger::TriggerMatcher;
use crate::application::errors::{BotError, CommandError, LanguageError};
use crate::application::logging::{LogKind, LoggerRegistry};
use crate::domain::entities::{Event, EventKind, NetworkFeatures, RawReply, ServerSignal};
use crate::domain::traits::{Commander, Language, LifecycleEvent, LogSink, Transport};

/// Outcome of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Processed; `delivered` actions were sent
    Handled { delivered: usize },
    /// Recognised server reply the bot deliberately does nothing with
    Ignored(ServerSignal),
}

/// Per-connection settings for the router
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub channel: String,
    pub channel_logging: bool,
    pub timeout: Duration,
}

/// External collaborators the router talks to
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub commander: Arc<dyn Commander>,
    pub language: Arc<dyn Language>,
    pub sink: Arc<dyn LogSink>,
}

/// Handles inbound events one at a time for a single connection
pub struct EventRouter {
    transport: Arc<dyn Transport>,
    commander: Arc<dyn Commander>,
    language: Arc<dyn Language>,
    trigger: TriggerMatcher,
    loggers: LoggerRegistry,
    resolver: ReplyResolver,
    postmaster: Postmaster,
    features: NetworkFeatures,
    timeout: Duration,
}

impl EventRouter {
    pub fn new(settings: RouterSettings, collaborators: Collaborators) -> Self {
        let loggers = LoggerRegistry::new(
            settings.channel.clone(),
            collaborators.sink,
            settings.channel_logging,
        );
        let postmaster = Postmaster::new(
            collaborators.transport.clone(),
            settings.channel,
            loggers.channel_logger().clone(),
        );
        let resolver = ReplyResolver::new(collaborators.commander.clone(), settings.timeout);

        Self {
            transport: collaborators.transport,
            commander: collaborators.commander,
            language: collaborators.language,
            trigger: TriggerMatcher::new(),
            loggers,
            resolver,
            postmaster,
            features: NetworkFeatures::new(),
            timeout: settings.timeout,
        }
    }

    pub fn features(&self) -> &NetworkFeatures {
        &self.features
    }

    pub fn loggers(&self) -> &LoggerRegistry {
        &self.loggers
    }

    /// Run the full pipeline for one event. Taking `&mut self` keeps events
    /// strictly sequential per connection.
    pub async fn handle(&mut self, event: Event) -> Result<Disposition, BotError> {
        let public = event.is_public(&self.transport.nickname());
        tracing::debug!("Handling {} from {}", event.kind.as_str(), event.source);

        match event.kind {
            EventKind::Message => {
                self.log_received(&event, public, LogKind::Message);
                let reply = self.get_reply(&event, public).await;
                self.respond(&event, public, reply).await
            }
            EventKind::Notice => {
                self.log_received(&event, public, LogKind::Notice);
                self.respond(&event, public, None).await
            }
            EventKind::Action => {
                self.log_received(&event, public, LogKind::Action);
                self.respond(&event, public, None).await
            }
            EventKind::Join => {
                self.log_received(&event, true, LogKind::Join);
                self.respond(&event, true, None).await
            }
            EventKind::Part => {
                self.log_received(&event, true, LogKind::Part);
                self.respond(&event, true, None).await
            }
            EventKind::Quit => {
                self.log_received(&event, true, LogKind::Quit);
                self.respond(&event, true, None).await
            }
            EventKind::Kick => {
                tracing::debug!("{} kicked {:?}", event.source.nick, event.arguments.first());
                self.respond(&event, true, None).await
            }
            EventKind::FeatureList => {
                let applied = self.features.apply(&event.arguments);
                tracing::debug!("Stored {} network features", applied);
                Ok(Disposition::Handled { delivered: 0 })
            }
            EventKind::Signal(signal) => {
                tracing::debug!("Ignoring server reply {}", signal.as_str());
                Ok(Disposition::Ignored(signal))
            }
        }
    }

    fn log_received(&mut self, event: &Event, public: bool, kind: LogKind) {
        let source = &event.source;
        let logger = if public {
            self.loggers.channel_logger()
        } else {
            self.loggers.query_logger(&source.nick, &source.host)
        };
        logger.log(kind, &source.nick, Some(&source.host), event.payload());
    }

    /// Ask the command engine (triggered text) or the language engine
    async fn get_reply(&self, event: &Event, public: bool) -> Option<RawReply> {
        let text = event.payload().unwrap_or_default();
        let source = &event.source;
        self.language.set_name(source.identity_key(), &source.nick);

        if self.trigger.is_command(text) {
            tracing::info!(
                "Acknowledging {} command request from {}",
                if public { "public" } else { "private" },
                source.nick
            );
            return execute_command(self.commander.as_ref(), text, source, public, self.timeout)
                .await;
        }

        tracing::debug!("Querying language engine for a response to {}", source.nick);
        let result = match tokio::time::timeout(
            self.timeout,
            self.language.get_reply(source.identity_key(), text),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LanguageError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Language engine failed to reply to {}: {}", source.nick, e);
                None
            }
        }
    }

    /// Deliver `reply`, or the lifecycle hook's reply when nothing was produced
    async fn respond(
        &self,
        event: &Event,
        public: bool,
        reply: Option<RawReply>,
    ) -> Result<Disposition, BotError> {
        let actions = self.resolver.resolve(reply, &event.source, public).await;
        if !actions.is_empty() {
            tracing::debug!("Delivering {} response messages", actions.len());
            self.postmaster.deliver(&actions, &event.source, public).await?;
            return Ok(Disposition::Handled {
                delivered: actions.len(),
            });
        }

        let Some(lifecycle) = LifecycleEvent::for_kind(event.kind, public) else {
            return Ok(Disposition::Handled { delivered: 0 });
        };

        let hook_reply = self.fire_lifecycle(lifecycle, event).await;
        let actions = self.resolver.resolve(hook_reply, &event.source, public).await;
        if actions.is_empty() {
            tracing::debug!("No response for {} from {}", lifecycle.as_str(), event.source.nick);
        } else {
            self.postmaster.deliver(&actions, &event.source, public).await?;
        }
        Ok(Disposition::Handled {
            delivered: actions.len(),
        })
    }

    async fn fire_lifecycle(&self, lifecycle: LifecycleEvent, event: &Event) -> Option<RawReply> {
        let result = match tokio::time::timeout(self.timeout, self.commander.event(lifecycle, event))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CommandError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Lifecycle event \"{}\" failed: {}", lifecycle.as_str(), e);
                None
            }
        }
    }
}
