//! Reply values produced by the command engine and language engine, and the
//! canonical delivery actions they resolve to.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::application::errors::ReplyParseError;

/// Destination route for one reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKey {
    Public,
    PublicNotice,
    PublicAction,
    Private,
    PrivateNotice,
    PrivateAction,
    /// Action sent wherever the triggering event came from
    Action,
    /// Message sent wherever the triggering event came from
    Default,
    /// Value is a command string to run; its result is delivered instead
    Command,
}

impl DestinationKey {
    /// Parse a destination name. Unknown names fall back to `Default` so a
    /// typo still produces a visible message.
    pub fn parse(name: &str) -> Self {
        match name {
            "public" => DestinationKey::Public,
            "public_notice" => DestinationKey::PublicNotice,
            "public_action" => DestinationKey::PublicAction,
            "private" => DestinationKey::Private,
            "private_notice" => DestinationKey::PrivateNotice,
            "private_action" => DestinationKey::PrivateAction,
            "action" => DestinationKey::Action,
            "command" => DestinationKey::Command,
            "default" => DestinationKey::Default,
            other => {
                tracing::debug!("Unrecognized destination '{}', using default", other);
                DestinationKey::Default
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKey::Public => "public",
            DestinationKey::PublicNotice => "public_notice",
            DestinationKey::PublicAction => "public_action",
            DestinationKey::Private => "private",
            DestinationKey::PrivateNotice => "private_notice",
            DestinationKey::PrivateAction => "private_action",
            DestinationKey::Action => "action",
            DestinationKey::Default => "default",
            DestinationKey::Command => "command",
        }
    }
}

/// One element of a reply sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyItem {
    PlainText(String),
    Destination(DestinationKey, String),
}

/// Raw reply returned by a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ReplyShape")]
pub enum RawReply {
    PlainText(String),
    Destination(DestinationKey, String),
    Sequence(Vec<ReplyItem>),
}

impl RawReply {
    pub fn text(text: impl Into<String>) -> Self {
        RawReply::PlainText(text.into())
    }

    pub fn to(key: DestinationKey, text: impl Into<String>) -> Self {
        RawReply::Destination(key, text.into())
    }

    /// Flatten into sequence elements, preserving order
    pub fn into_items(self) -> Vec<ReplyItem> {
        match self {
            RawReply::PlainText(text) => vec![ReplyItem::PlainText(text)],
            RawReply::Destination(key, text) => vec![ReplyItem::Destination(key, text)],
            RawReply::Sequence(items) => items,
        }
    }

    /// Concatenate several replies into one sequence. `None` if nothing remains.
    pub fn concat(replies: impl IntoIterator<Item = RawReply>) -> Option<RawReply> {
        let items: Vec<ReplyItem> = replies.into_iter().flat_map(RawReply::into_items).collect();
        if items.is_empty() {
            None
        } else {
            Some(RawReply::Sequence(items))
        }
    }
}

impl From<ReplyItem> for RawReply {
    fn from(item: ReplyItem) -> Self {
        match item {
            ReplyItem::PlainText(text) => RawReply::PlainText(text),
            ReplyItem::Destination(key, text) => RawReply::Destination(key, text),
        }
    }
}

/// Untyped shape accepted on deserialization
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ReplyShape {
    Text(String),
    Mapping(BTreeMap<String, String>),
    Sequence(Vec<ItemShape>),
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum ItemShape {
    Text(String),
    Mapping(BTreeMap<String, String>),
}

fn single_entry(mapping: BTreeMap<String, String>) -> Result<ReplyItem, ReplyParseError> {
    if mapping.len() != 1 {
        return Err(ReplyParseError::MappingArity(mapping.len()));
    }
    let (key, text) = mapping
        .into_iter()
        .next()
        .ok_or(ReplyParseError::MappingArity(0))?;
    Ok(ReplyItem::Destination(DestinationKey::parse(&key), text))
}

impl TryFrom<ItemShape> for ReplyItem {
    type Error = ReplyParseError;

    fn try_from(shape: ItemShape) -> Result<Self, Self::Error> {
        match shape {
            ItemShape::Text(text) => Ok(ReplyItem::PlainText(text)),
            ItemShape::Mapping(mapping) => single_entry(mapping),
        }
    }
}

impl TryFrom<ReplyShape> for RawReply {
    type Error = ReplyParseError;

    fn try_from(shape: ReplyShape) -> Result<Self, Self::Error> {
        match shape {
            ReplyShape::Text(text) => Ok(RawReply::PlainText(text)),
            ReplyShape::Mapping(mapping) => single_entry(mapping).map(RawReply::from),
            ReplyShape::Sequence(items) => items
                .into_iter()
                .map(ReplyItem::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(RawReply::Sequence),
        }
    }
}

/// Canonical, resolved unit of delivery. `key` is never `Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAction {
    pub key: DestinationKey,
    pub text: String,
}

impl DeliveryAction {
    pub fn new(key: DestinationKey, text: impl Into<String>) -> Self {
        debug_assert!(key != DestinationKey::Command);
        Self {
            key,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_parse_known_and_unknown() {
        assert_eq!(DestinationKey::parse("public_notice"), DestinationKey::PublicNotice);
        assert_eq!(DestinationKey::parse("command"), DestinationKey::Command);
        assert_eq!(DestinationKey::parse("pubilc"), DestinationKey::Default);
    }

    #[test]
    fn test_deserialize_sequence_with_mappings() {
        let reply: RawReply =
            serde_json::from_str(r#"["plain", {"private": "psst"}, {"typo": "still shown"}]"#)
                .expect("valid reply");

        assert_eq!(
            reply,
            RawReply::Sequence(vec![
                ReplyItem::PlainText("plain".to_string()),
                ReplyItem::Destination(DestinationKey::Private, "psst".to_string()),
                ReplyItem::Destination(DestinationKey::Default, "still shown".to_string()),
            ])
        );
    }

    #[test]
    fn test_deserialize_rejects_multi_key_mapping() {
        let result: Result<RawReply, _> = serde_json::from_str(r#"{"public": "a", "private": "b"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_counts_keys_before_normalizing() {
        // Both unknown names would become `default`; the mapping still has two keys
        let result: Result<RawReply, _> = serde_json::from_str(r#"{"typo": "a", "other": "b"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_from_yaml_mapping() {
        let reply: RawReply = serde_yaml::from_str("public_action: waves").expect("valid reply");
        assert_eq!(reply, RawReply::to(DestinationKey::PublicAction, "waves"));
    }

    #[test]
    fn test_concat_preserves_order() {
        let reply = RawReply::concat(vec![
            RawReply::text("one"),
            RawReply::Sequence(vec![ReplyItem::PlainText("two".to_string())]),
            RawReply::to(DestinationKey::Public, "three"),
        ])
        .expect("non-empty");

        let items = reply.into_items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], ReplyItem::Destination(DestinationKey::Public, "three".to_string()));
    }

    #[test]
    fn test_concat_empty_is_none() {
        assert_eq!(RawReply::concat(Vec::new()), None);
    }
}
