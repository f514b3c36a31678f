//! Turning a command into reply text.

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::Result;
use crate::uptime::format_uptime;
use crate::xkcd::XkcdClient;

use super::{Action, CommandTable};

/// Reply text plus what to write to the log about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub log_summary: String,
}

impl Reply {
    fn logged_verbatim(text: String) -> Self {
        let log_summary = format!("Responded with: \"{text}\"");
        Self { text, log_summary }
    }
}

/// Everything command actions need, shared across sessions.
#[derive(Debug, Clone)]
pub struct BotContext {
    pub commands: CommandTable,
    pub xkcd: XkcdClient,
    pub started_at: DateTime<Utc>,
}

impl BotContext {
    #[must_use]
    pub fn new(commands: CommandTable, xkcd: XkcdClient, started_at: DateTime<Utc>) -> Self {
        Self {
            commands,
            xkcd,
            started_at,
        }
    }

    /// Whole seconds since startup.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        u64::try_from((Utc::now() - self.started_at).num_seconds()).unwrap_or_default()
    }

    /// Pick and run the action for a trimmed command.
    ///
    /// # Errors
    ///
    /// Only the comic lookup can fail; its error is returned unchanged.
    pub async fn respond(&self, command: &str) -> Result<Reply> {
        let Some(entry) = self.commands.resolve(command) else {
            return Ok(Reply::logged_verbatim(self.commands.fallback().to_string()));
        };

        let text = match entry.action {
            Action::Reply(text) => text.to_string(),
            Action::Uptime => format!(
                "I'm about {} old, thank you.",
                format_uptime(self.uptime_seconds())
            ),
            Action::RandomComic => {
                debug!("Fetching a random comic");
                self.xkcd.random_comic().await?.caption()
            }
        };

        Ok(match entry.log_summary {
            Some(summary) => Reply {
                text,
                log_summary: summary.to_string(),
            },
            None => Reply::logged_verbatim(text),
        })
    }
}
