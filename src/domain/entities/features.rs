use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::collections::BTreeMap;

static FEATURE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]+)(=(\S+))?$").expect("feature token pattern is valid")
});

/// Capabilities advertised by the server (RPL_ISUPPORT)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkFeatures {
    entries: BTreeMap<String, String>,
}

impl NetworkFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one feature-list reply. Bare keys are stored with an empty value,
    /// `-KEY` retracts a key, and trailing prose is skipped.
    pub fn apply(&mut self, tokens: &[String]) -> usize {
        let mut applied = 0;
        for token in tokens {
            if let Some(key) = token.strip_prefix('-') {
                if self.entries.remove(key).is_some() {
                    applied += 1;
                }
                continue;
            }

            let Some(caps) = FEATURE_TOKEN.captures(token) else {
                continue;
            };
            let key = caps[1].to_string();
            let value = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();
            self.entries.insert(key, value);
            applied += 1;
        }
        applied
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn supports(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_key_value_and_bare_tokens() {
        let mut features = NetworkFeatures::new();
        let applied = features.apply(&tokens(&[
            "NETWORK=Libera",
            "EXCEPTS",
            "are supported by this server",
        ]));

        assert_eq!(applied, 2);
        assert_eq!(features.get("NETWORK"), Some("Libera"));
        assert_eq!(features.get("EXCEPTS"), Some(""));
        assert!(!features.supports("are"));
    }

    #[test]
    fn test_apply_negation_removes_key() {
        let mut features = NetworkFeatures::new();
        features.apply(&tokens(&["KNOCK"]));
        features.apply(&tokens(&["-KNOCK"]));
        assert!(features.is_empty());
    }

    #[test]
    fn test_apply_skips_lowercase_keys() {
        let mut features = NetworkFeatures::new();
        assert_eq!(features.apply(&tokens(&["chantypes=#"])), 0);
    }
}
