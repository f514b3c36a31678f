//! One connected run of the bot, from handshake to farewell.

use std::time::Duration;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::backend::{ChatSession, Connector, Event};
use crate::commands::BotContext;
use crate::config::Config;
use crate::error::{Result, SessionError};
use crate::mention::parse_direct_mention;

pub const GREETING: &str = "Greetings, inferior beings.";
pub const FAREWELL: &str = "This isn't the last you'll see of me, worms!";

/// Per-session knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Channel that receives the greeting and the farewell.
    pub welcome_channel: String,
    /// Read timeout and pause between read cycles.
    pub read_delay: Duration,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            welcome_channel: config.welcome_channel.clone(),
            read_delay: config.read_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Disconnected,
    Connected,
    Draining,
}

/// Runs a single session until shutdown or the first fault. Never retries.
pub struct SessionRuntime<'a, C: Connector> {
    connector: &'a C,
    ctx: &'a BotContext,
    settings: &'a SessionSettings,
    shutdown: &'a CancellationToken,
    state: SessionState,
}

impl<'a, C: Connector> SessionRuntime<'a, C> {
    pub fn new(
        connector: &'a C,
        ctx: &'a BotContext,
        settings: &'a SessionSettings,
        shutdown: &'a CancellationToken,
    ) -> Self {
        Self {
            connector,
            ctx,
            settings,
            shutdown,
            state: SessionState::Disconnected,
        }
    }

    /// Connect, serve commands until shutdown is requested, then say goodbye.
    ///
    /// `Ok(())` means a requested shutdown completed.
    ///
    /// # Errors
    ///
    /// [`SessionError::Handshake`] if the session could not be established,
    /// [`SessionError::Fault`] for anything that goes wrong afterwards.
    pub async fn run(mut self) -> std::result::Result<(), SessionError> {
        let (mut session, bot_id) = self.handshake().await.map_err(SessionError::Handshake)?;
        self.serve(&mut session, &bot_id)
            .await
            .map_err(SessionError::Fault)
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {:?} -> {next:?}", self.state);
        self.state = next;
    }

    async fn handshake(&mut self) -> Result<(C::Session, String)> {
        let mut session = self.connector.connect().await?;
        let bot_id = session.whoami().await?;
        info!("Bot connected and running as {bot_id}");

        session
            .send_message(&self.settings.welcome_channel, GREETING)
            .await?;
        info!("Responded with: \"{GREETING}\"");

        self.transition(SessionState::Connected);
        Ok((session, bot_id))
    }

    async fn serve(&mut self, session: &mut C::Session, bot_id: &str) -> Result<()> {
        while !self.shutdown.is_cancelled() {
            let events = session.read_events(self.settings.read_delay).await?;
            for event in &events {
                self.handle_event(session, bot_id, event).await?;
            }

            tokio::select! {
                () = self.shutdown.cancelled() => {}
                () = tokio::time::sleep(self.settings.read_delay) => {}
            }
        }

        self.transition(SessionState::Draining);
        session
            .send_message(&self.settings.welcome_channel, FAREWELL)
            .await?;
        info!("Responded with: \"{FAREWELL}\"");

        if let Err(e) = session.close().await {
            warn!("Failed to close session cleanly: {e}");
        }
        self.transition(SessionState::Disconnected);
        Ok(())
    }

    /// Reply to `event` if it is a plain message addressed to the bot.
    async fn handle_event(
        &self,
        session: &mut C::Session,
        bot_id: &str,
        event: &Event,
    ) -> Result<()> {
        let Some(message) = event.as_plain_message()? else {
            return Ok(());
        };
        let Some(mention) = parse_direct_mention(message.text) else {
            return Ok(());
        };
        if mention.user_id != bot_id {
            debug!("Ignoring mention of {}", mention.user_id);
            return Ok(());
        }

        info!("Received command: {}", mention.text);
        let reply = self.ctx.respond(mention.text).await?;
        session.send_message(message.channel, &reply.text).await?;
        info!("{}", reply.log_summary);
        Ok(())
    }
}
