//! Seams between the bot runtime and the real-time messaging backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{BotError, Result};

/// One inbound record from the real-time stream.
///
/// Every field is optional on the wire: acknowledgements carry no `type`,
/// and most non-message events have no `text` or `channel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub text: Option<String>,
    pub channel: Option<String>,
}

/// A plain chat message, i.e. a `message` event without a subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainMessage<'a> {
    pub text: &'a str,
    pub channel: &'a str,
}

impl Event {
    /// Build a plain message event.
    pub fn message(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: Some("message".to_string()),
            channel: Some(channel.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// View this event as a plain message.
    ///
    /// Returns `Ok(None)` for anything that is not a plain message.
    ///
    /// # Errors
    ///
    /// A plain message missing its text or channel is malformed.
    pub fn as_plain_message(&self) -> Result<Option<PlainMessage<'_>>> {
        if self.kind.as_deref() != Some("message") || self.subtype.is_some() {
            return Ok(None);
        }

        let text = self
            .text
            .as_deref()
            .ok_or_else(|| BotError::MalformedEvent("message without text".to_string()))?;
        let channel = self
            .channel
            .as_deref()
            .ok_or_else(|| BotError::MalformedEvent("message without channel".to_string()))?;

        Ok(Some(PlainMessage { text, channel }))
    }
}

/// Establishes sessions with the backend.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: ChatSession;

    /// Perform the handshake and return a live session.
    async fn connect(&self) -> Result<Self::Session>;
}

/// A live backend session.
#[async_trait]
pub trait ChatSession: Send {
    /// Identity the backend assigned to the bot for this session.
    async fn whoami(&mut self) -> Result<String>;

    /// Read whatever events arrive within `timeout`. May be empty.
    async fn read_events(&mut self, timeout: Duration) -> Result<Vec<Event>>;

    /// Post `text` to `channel`.
    async fn send_message(&mut self, channel: &str, text: &str) -> Result<()>;

    /// Release the session. The default does nothing.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
