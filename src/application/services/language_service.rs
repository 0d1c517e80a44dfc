use async_trait::async_trait;
use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::application::errors::LanguageError;
use crate::domain::entities::RawReply;
use crate::domain::traits::Language;

/// Placeholder replaced with the speaker's last known nick
const NAME_PLACEHOLDER: &str = "{name}";

struct Rule {
    pattern: Regex,
    reply: String,
}

/// Language engine driven by configured `(pattern, reply)` rules. The first
/// matching rule wins; patterns are case-insensitive.
pub struct KeywordLanguage {
    rules: Vec<Rule>,
    names: RwLock<HashMap<String, String>>,
}

impl KeywordLanguage {
    pub fn new<I, P, R>(rules: I) -> Result<Self, LanguageError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, reply)| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("(?i){}", pattern))
                    .map(|regex| Rule {
                        pattern: regex,
                        reply: reply.into(),
                    })
                    .map_err(|e| LanguageError::Pattern(format!("{}: {}", pattern, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            names: RwLock::new(HashMap::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn name_for(&self, identity: &str) -> String {
        self.names
            .read()
            .ok()
            .and_then(|names| names.get(identity).cloned())
            .unwrap_or_else(|| identity.to_string())
    }
}

#[async_trait]
impl Language for KeywordLanguage {
    fn set_name(&self, identity: &str, nick: &str) {
        if let Ok(mut names) = self.names.write() {
            names.insert(identity.to_string(), nick.to_string());
        }
    }

    async fn get_reply(&self, identity: &str, text: &str) -> Result<Option<RawReply>, LanguageError> {
        let Some(rule) = self.rules.iter().find(|rule| rule.pattern.is_match(text)) else {
            return Ok(None);
        };

        let reply = rule.reply.replace(NAME_PLACEHOLDER, &self.name_for(identity));
        Ok(RawReply::from_literal(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DestinationKey, ReplyItem};

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let language = KeywordLanguage::new(vec![
            ("^hello", "hi {name}"),
            ("hello", "never reached"),
        ])
        .expect("valid rules");
        language.set_name("example.org", "alice");

        let reply = language.get_reply("example.org", "HELLO bot").await.expect("replies");
        assert_eq!(reply, Some(RawReply::text("hi alice")));
    }

    #[tokio::test]
    async fn test_name_follows_nick_change() {
        let language = KeywordLanguage::new(vec![("who", "you are {name}")]).expect("valid rules");
        language.set_name("example.org", "alice");
        language.set_name("example.org", "alice_away");

        let reply = language.get_reply("example.org", "who am i").await.expect("replies");
        assert_eq!(reply, Some(RawReply::text("you are alice_away")));
    }

    #[tokio::test]
    async fn test_literal_reply_parsed() {
        let language = KeywordLanguage::new(vec![(
            "wave",
            "[{'public_action': 'waves'}, {'private': 'psst'}]",
        )])
        .expect("valid rules");

        let reply = language.get_reply("h", "wave please").await.expect("replies");
        assert_eq!(
            reply,
            Some(RawReply::Sequence(vec![
                ReplyItem::Destination(DestinationKey::PublicAction, "waves".to_string()),
                ReplyItem::Destination(DestinationKey::Private, "psst".to_string()),
            ]))
        );
    }

    #[tokio::test]
    async fn test_no_match_is_none() {
        let language = KeywordLanguage::new(vec![("ping", "pong")]).expect("valid rules");
        assert_eq!(language.get_reply("h", "hello").await.expect("replies"), None);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = KeywordLanguage::new(vec![("(unclosed", "x")]);
        assert!(matches!(result, Err(LanguageError::Pattern(_))));
    }
}
