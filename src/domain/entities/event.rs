use std::fmt;

/// The user (or server) an event originated from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub nick: String,
    pub host: String,
}

impl Source {
    pub fn new(nick: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            host: host.into(),
        }
    }

    /// Parse a `nick!user@host` mask. Missing parts fall back to empty strings.
    pub fn parse(mask: &str) -> Self {
        let (nick, rest) = mask.split_once('!').unwrap_or((mask, ""));
        let host = rest.split_once('@').map(|(_, h)| h).unwrap_or("");
        Self::new(nick, host)
    }

    /// Key used by the language engine to recognise a speaker across nick changes
    pub fn identity_key(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_empty() {
            write!(f, "{}", self.nick)
        } else {
            write!(f, "{}@{}", self.nick, self.host)
        }
    }
}

/// Numeric server replies the bot recognises but does not act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerSignal {
    ServiceInfo,
    CannotSendToChannel,
    TooManyChannels,
    ErroneousNick,
    UnavailableResource,
    ChannelIsFull,
    KeySet,
    BadChannelKey,
    InviteOnlyChannel,
    BannedFromChannel,
    BanListFull,
    ChanOpPrivsNeeded,
}

impl ServerSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerSignal::ServiceInfo => "serviceinfo",
            ServerSignal::CannotSendToChannel => "cannotsendtochan",
            ServerSignal::TooManyChannels => "toomanychannels",
            ServerSignal::ErroneousNick => "erroneusnickname",
            ServerSignal::UnavailableResource => "unavailresource",
            ServerSignal::ChannelIsFull => "channelisfull",
            ServerSignal::KeySet => "keyset",
            ServerSignal::BadChannelKey => "badchannelkey",
            ServerSignal::InviteOnlyChannel => "inviteonlychan",
            ServerSignal::BannedFromChannel => "bannedfromchan",
            ServerSignal::BanListFull => "banlistfull",
            ServerSignal::ChanOpPrivsNeeded => "chanoprivsneeded",
        }
    }
}

/// Kind of inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    Notice,
    Action,
    Join,
    Part,
    Quit,
    Kick,
    /// RPL_ISUPPORT feature advertisement
    FeatureList,
    Signal(ServerSignal),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Message => "message",
            EventKind::Notice => "notice",
            EventKind::Action => "action",
            EventKind::Join => "join",
            EventKind::Part => "part",
            EventKind::Quit => "quit",
            EventKind::Kick => "kick",
            EventKind::FeatureList => "featurelist",
            EventKind::Signal(signal) => signal.as_str(),
        }
    }
}

/// One inbound occurrence, as produced by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub source: Source,
    /// Channel name, or our own nick for direct conversations
    pub target: String,
    pub arguments: Vec<String>,
}

impl Event {
    pub fn new(kind: EventKind, source: Source, target: impl Into<String>) -> Self {
        Self {
            kind,
            source,
            target: target.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Payload text: the first argument, if any
    pub fn payload(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// True unless the event was addressed directly to `own_nick`
    pub fn is_public(&self, own_nick: &str) -> bool {
        !self.target.eq_ignore_ascii_case(own_nick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse_full_mask() {
        let source = Source::parse("alice!~al@example.org");
        assert_eq!(source.nick, "alice");
        assert_eq!(source.host, "example.org");
        assert_eq!(source.identity_key(), "example.org");
    }

    #[test]
    fn test_source_parse_bare_nick() {
        let source = Source::parse("irc.example.net");
        assert_eq!(source.nick, "irc.example.net");
        assert_eq!(source.host, "");
    }

    #[test]
    fn test_event_public_vs_private() {
        let source = Source::new("alice", "example.org");
        let public = Event::new(EventKind::Message, source.clone(), "#nano");
        let private = Event::new(EventKind::Message, source, "NanoBot");

        assert!(public.is_public("nanobot"));
        assert!(!private.is_public("nanobot"));
    }

    #[test]
    fn test_event_payload_absent() {
        let event = Event::new(EventKind::Quit, Source::new("bob", "h"), "");
        assert_eq!(event.payload(), None);
    }
}
