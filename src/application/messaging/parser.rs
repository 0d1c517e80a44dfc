//! Message parser - Converts reply markup into IRC text and parses
//! literal-encoded replies from older collaborators

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use crate::application::errors::ReplyParseError;
use crate::domain::entities::RawReply;

/// IRC bold toggle
pub const BOLD: char = '\x02';

static BOLD_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?strong>").expect("bold pattern is valid"));
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^<]+?>").expect("tag pattern is valid"));
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("entity pattern is valid")
});

/// Rewrites the markup subset replies may use into IRC control codes
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageParser;

impl MessageParser {
    pub fn new() -> Self {
        Self
    }

    /// `<strong>` tags become bold toggles, other tags are dropped (inner
    /// text kept) and HTML entities are decoded.
    pub fn sanitize(&self, message: &str) -> String {
        tracing::debug!("Parsing message response: {}", message);

        let message = BOLD_TAG.replace_all(message, BOLD.to_string().as_str());
        let message = ANY_TAG.replace_all(&message, "");
        let message = unescape(&message);

        tracing::debug!("Returning parsed message: {}", message);
        message
    }
}

/// Decode named, decimal and hex entities. Unknown entities are kept as-is.
pub fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            decode_entity(body).map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "deg" => '\u{b0}',
        _ => return None,
    };
    Some(decoded)
}

impl RawReply {
    /// Interpret a reply string the way older collaborators encoded them:
    /// a quoted string, a `{'key': 'text'}` mapping or a list of those. Text
    /// that fails to parse is delivered verbatim. Blank text means no reply.
    pub fn from_literal(raw: &str) -> Option<RawReply> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if !trimmed.starts_with(['{', '[', '\'', '"']) {
            return Some(RawReply::PlainText(raw.to_string()));
        }

        match parse_literal(trimmed) {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::debug!("Anticipated error parsing reply literal: {}", e);
                Some(RawReply::PlainText(raw.to_string()))
            }
        }
    }
}

fn parse_literal(literal: &str) -> Result<RawReply, ReplyParseError> {
    if let Ok(reply) = serde_json::from_str::<RawReply>(literal) {
        return Ok(reply);
    }
    let json = literal_to_json(literal)?;
    serde_json::from_str::<RawReply>(&json).map_err(|e| ReplyParseError::Shape(e.to_string()))
}

/// Re-quote a single- or double-quoted literal as JSON. Only strings and
/// the structural characters of lists and mappings are accepted.
fn literal_to_json(literal: &str) -> Result<String, ReplyParseError> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(other) => value.push(other),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err(ReplyParseError::UnterminatedString);
                }
                let quoted = serde_json::to_string(&value)
                    .map_err(|e| ReplyParseError::Shape(e.to_string()))?;
                out.push_str(&quoted);
            }
            '{' | '}' | '[' | ']' | ',' | ':' => out.push(c),
            c if c.is_whitespace() => out.push(c),
            other => return Err(ReplyParseError::UnexpectedToken(other)),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DestinationKey, ReplyItem};

    #[test]
    fn test_sanitize_bold_tags_become_control_codes() {
        let parser = MessageParser::new();
        assert_eq!(parser.sanitize("<strong>date</strong> now"), "\x02date\x02 now");
    }

    #[test]
    fn test_sanitize_strips_other_tags_and_unescapes() {
        let parser = MessageParser::new();
        let out = parser.sanitize(r#"<strong>git</strong> <p class="fg-green">+++</p> &amp; more"#);

        assert_eq!(out, "\x02git\x02 +++ & more");
        assert!(!out.contains('<'));
    }

    #[test]
    fn test_sanitize_entity_after_tag_strip_is_literal() {
        // Escaped markup must survive as text, not be stripped as a tag
        let parser = MessageParser::new();
        assert_eq!(parser.sanitize("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn test_unescape_numeric_and_unknown() {
        assert_eq!(unescape("&#65;&#x42;&hellip;"), "AB\u{2026}");
        assert_eq!(unescape("&bogus; &"), "&bogus; &");
    }

    #[test]
    fn test_from_literal_plain_text() {
        assert_eq!(RawReply::from_literal("hello there"), Some(RawReply::text("hello there")));
        assert_eq!(RawReply::from_literal("   "), None);
    }

    #[test]
    fn test_from_literal_single_quoted_mapping() {
        assert_eq!(
            RawReply::from_literal("{'public_notice': 'it\\'s up'}"),
            Some(RawReply::to(DestinationKey::PublicNotice, "it's up"))
        );
    }

    #[test]
    fn test_from_literal_json_sequence() {
        assert_eq!(
            RawReply::from_literal(r#"[{"public_notice": "hi"}, {"private": "psst"}]"#),
            Some(RawReply::Sequence(vec![
                ReplyItem::Destination(DestinationKey::PublicNotice, "hi".to_string()),
                ReplyItem::Destination(DestinationKey::Private, "psst".to_string()),
            ]))
        );
    }

    #[test]
    fn test_from_literal_quoted_string() {
        assert_eq!(RawReply::from_literal("'quoted'"), Some(RawReply::text("quoted")));
    }

    #[test]
    fn test_from_literal_malformed_falls_back_to_text() {
        let raw = "{'public': unquoted}";
        assert_eq!(RawReply::from_literal(raw), Some(RawReply::text(raw)));

        let raw = "[smile] at you";
        assert_eq!(RawReply::from_literal(raw), Some(RawReply::text(raw)));
    }

    #[test]
    fn test_from_literal_multi_key_mapping_falls_back() {
        let raw = "{'public': 'a', 'private': 'b'}";
        assert_eq!(RawReply::from_literal(raw), Some(RawReply::text(raw)));
    }
}
