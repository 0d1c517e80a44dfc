use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{Event, EventKind, RawReply, Source};

/// Named plugin hooks fired when no direct reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    PublicMessage,
    PrivateMessage,
    PublicAction,
    PrivateAction,
    PublicNotice,
    PrivateNotice,
    Join,
    Part,
    Quit,
    Kick,
}

impl LifecycleEvent {
    /// Hook for an event kind, split on public/private where that matters
    pub fn for_kind(kind: EventKind, public: bool) -> Option<Self> {
        let event = match (kind, public) {
            (EventKind::Message, true) => LifecycleEvent::PublicMessage,
            (EventKind::Message, false) => LifecycleEvent::PrivateMessage,
            (EventKind::Action, true) => LifecycleEvent::PublicAction,
            (EventKind::Action, false) => LifecycleEvent::PrivateAction,
            (EventKind::Notice, true) => LifecycleEvent::PublicNotice,
            (EventKind::Notice, false) => LifecycleEvent::PrivateNotice,
            (EventKind::Join, _) => LifecycleEvent::Join,
            (EventKind::Part, _) => LifecycleEvent::Part,
            (EventKind::Quit, _) => LifecycleEvent::Quit,
            (EventKind::Kick, _) => LifecycleEvent::Kick,
            (EventKind::FeatureList, _) | (EventKind::Signal(_), _) => return None,
        };
        Some(event)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::PublicMessage => "public message received",
            LifecycleEvent::PrivateMessage => "private message received",
            LifecycleEvent::PublicAction => "public action received",
            LifecycleEvent::PrivateAction => "private action received",
            LifecycleEvent::PublicNotice => "public notice received",
            LifecycleEvent::PrivateNotice => "private notice received",
            LifecycleEvent::Join => "join",
            LifecycleEvent::Part => "part",
            LifecycleEvent::Quit => "quit",
            LifecycleEvent::Kick => "kick",
        }
    }
}

/// Command engine - resolves command strings and lifecycle hooks to replies
#[async_trait]
pub trait Commander: Send + Sync {
    /// Run a command string (trigger prefix optional)
    async fn execute(
        &self,
        command: &str,
        source: &Source,
        public: bool,
    ) -> Result<Option<RawReply>, CommandError>;

    /// Fire a lifecycle hook for `event`
    async fn event(
        &self,
        lifecycle: LifecycleEvent,
        event: &Event,
    ) -> Result<Option<RawReply>, CommandError>;
}
