//! Scripted in-memory backend for exercising the session and supervisor loops.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::backend::{ChatSession, Connector, Event};
use crate::error::{BotError, Result};

pub const BOT_ID: &str = "UBOT0001";

/// What a session does on one read cycle.
#[derive(Debug, Clone)]
pub enum Step {
    Events(Vec<Event>),
    ReadError,
    Panic,
}

/// Result of one connection attempt.
#[derive(Debug, Clone)]
pub enum Attempt {
    Refused,
    Session(Vec<Step>),
}

#[derive(Debug, Default)]
pub struct Journal {
    pub connects: usize,
    pub sent: Vec<(String, String)>,
    pub closed: usize,
}

/// Plays back a fixed list of attempts. Once the script is exhausted the
/// shutdown token is cancelled, so loops end instead of spinning forever.
pub struct ScriptedConnector {
    attempts: Mutex<VecDeque<Attempt>>,
    journal: Arc<Mutex<Journal>>,
    shutdown: CancellationToken,
}

impl ScriptedConnector {
    pub fn new(attempts: Vec<Attempt>, shutdown: CancellationToken) -> Self {
        Self {
            attempts: Mutex::new(attempts.into()),
            journal: Arc::default(),
            shutdown,
        }
    }

    pub fn closed(&self) -> usize {
        self.journal.lock().expect("journal lock").closed
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.journal.lock().expect("journal lock").sent.clone()
    }

    pub fn connects(&self) -> usize {
        self.journal.lock().expect("journal lock").connects
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self) -> Result<ScriptedSession> {
        self.journal.lock().expect("journal lock").connects += 1;
        let attempt = self.attempts.lock().expect("attempts lock").pop_front();

        match attempt {
            Some(Attempt::Session(steps)) => Ok(ScriptedSession {
                steps: steps.into(),
                journal: Arc::clone(&self.journal),
                shutdown: self.shutdown.clone(),
            }),
            Some(Attempt::Refused) => Err(BotError::SlackApi {
                method: "rtm.connect".to_string(),
                error: "invalid_auth".to_string(),
            }),
            None => {
                self.shutdown.cancel();
                Err(BotError::ConnectionClosed)
            }
        }
    }
}

pub struct ScriptedSession {
    steps: VecDeque<Step>,
    journal: Arc<Mutex<Journal>>,
    shutdown: CancellationToken,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn whoami(&mut self) -> Result<String> {
        Ok(BOT_ID.to_string())
    }

    async fn read_events(&mut self, _timeout: Duration) -> Result<Vec<Event>> {
        match self.steps.pop_front() {
            Some(Step::Events(events)) => Ok(events),
            Some(Step::ReadError) => Err(BotError::ConnectionClosed),
            Some(Step::Panic) => panic!("scripted panic"),
            None => {
                self.shutdown.cancel();
                Ok(Vec::new())
            }
        }
    }

    async fn send_message(&mut self, channel: &str, text: &str) -> Result<()> {
        self.journal
            .lock()
            .expect("journal lock")
            .sent
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.journal.lock().expect("journal lock").closed += 1;
        Ok(())
    }
}

/// A message addressed to the scripted bot.
pub fn to_bot(channel: &str, command: &str) -> Event {
    Event::message(channel, format!("<@{BOT_ID}> {command}"))
}
