use async_trait::async_trait;

use crate::application::errors::LanguageError;
use crate::domain::entities::RawReply;

/// Conversational reply generator
#[async_trait]
pub trait Language: Send + Sync {
    /// Remember the nick currently used by an identity key
    fn set_name(&self, _identity: &str, _nick: &str) {}

    /// Reply to `text` spoken by `identity` (the speaker's host)
    async fn get_reply(&self, identity: &str, text: &str) -> Result<Option<RawReply>, LanguageError>;
}
