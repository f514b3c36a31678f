use std::{env, str::FromStr, time::Duration};

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};

const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api/";
const DEFAULT_XKCD_URL: &str = "https://xkcd.com/";
const DEFAULT_RETRY_COOLDOWN_SECS: u64 = 5;
const DEFAULT_READ_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub slack_bot_token: String,
    pub welcome_channel: String,
    pub slack_api_url: Url,
    pub xkcd_url: Url,
    pub retry_cooldown: Duration,
    pub read_delay: Duration,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or an optional one cannot be parsed.
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let slack_bot_token = required("SLACK_BOT_TOKEN")?;
        let welcome_channel = required("SLACK_WELCOME_CHANNEL")?;

        let slack_api_url = base_url(
            optional("SLACK_API_URL")?.unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
        )?;
        let xkcd_url =
            base_url(optional("XKCD_URL")?.unwrap_or_else(|| DEFAULT_XKCD_URL.to_string()))?;

        let retry_cooldown = Duration::from_secs(
            parsed("RETRY_COOLDOWN_SECS")?.unwrap_or(DEFAULT_RETRY_COOLDOWN_SECS),
        );
        let read_delay =
            Duration::from_millis(parsed("READ_DELAY_MS")?.unwrap_or(DEFAULT_READ_DELAY_MS));

        info!("Configuration loaded successfully");
        debug!("Slack token length: {} characters", slack_bot_token.len());
        debug!("Welcome channel: {welcome_channel}");
        debug!("Slack API: {slack_api_url}, xkcd: {xkcd_url}");
        debug!(
            "Retry cooldown: {}s, read delay: {}ms",
            retry_cooldown.as_secs(),
            read_delay.as_millis()
        );

        Ok(Self {
            slack_bot_token,
            welcome_channel,
            slack_api_url,
            xkcd_url,
            retry_cooldown,
            read_delay,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|e| {
        error!("Failed to load {name} from environment: {e}");
        e.into()
    })
}

fn optional(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parsed<T: FromStr>(name: &str) -> Result<Option<T>> {
    optional(name)?
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| BotError::Config(format!("{name} has an invalid value: {raw}")))
        })
        .transpose()
}

/// Parse a base URL, making sure it ends with a slash so `join` appends to it.
pub(crate) fn base_url(raw: String) -> Result<Url> {
    let raw = if raw.ends_with('/') {
        raw
    } else {
        format!("{raw}/")
    };
    Url::parse(&raw).map_err(|e| BotError::Config(format!("invalid URL {raw}: {e}")))
}
