use async_trait::async_trait;

use crate::application::errors::BotError;

/// Outbound half of the chat connection
#[async_trait]
pub trait Transport: Send + Sync {
    /// Nick the bot is currently using
    fn nickname(&self) -> String;

    /// Send a regular message (PRIVMSG) to a channel or nick
    async fn send_message(&self, target: &str, text: &str) -> Result<(), BotError>;

    /// Send a notice
    async fn send_notice(&self, target: &str, text: &str) -> Result<(), BotError>;

    /// Send an action (CTCP ACTION, `/me`)
    async fn send_action(&self, target: &str, text: &str) -> Result<(), BotError>;
}
