//! In-memory transport that records every send

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::application::messaging::SendKind;
use crate::domain::traits::Transport;

/// One recorded outbound send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub kind: SendKind,
    pub target: String,
    pub text: String,
}

/// Transport for tests and dry runs; nothing leaves the process
pub struct MemoryTransport {
    nick: String,
    sent: Mutex<Vec<SentMessage>>,
}

impl MemoryTransport {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    fn record(&self, kind: SendKind, target: &str, text: &str) -> Result<(), BotError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| BotError::Transport("Lock poisoned".to_string()))?;
        sent.push(SentMessage {
            kind,
            target: target.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn nickname(&self) -> String {
        self.nick.clone()
    }

    async fn send_message(&self, target: &str, text: &str) -> Result<(), BotError> {
        self.record(SendKind::Message, target, text)
    }

    async fn send_notice(&self, target: &str, text: &str) -> Result<(), BotError> {
        self.record(SendKind::Notice, target, text)
    }

    async fn send_action(&self, target: &str, text: &str) -> Result<(), BotError> {
        self.record(SendKind::Action, target, text)
    }
}
