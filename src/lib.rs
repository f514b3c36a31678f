pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod mention;
pub mod session;
pub mod shutdown;
pub mod slack;
pub mod supervisor;
pub mod uptime;
pub mod xkcd;

#[cfg(test)]
mod testing;

use chrono::Utc;
use log::info;
use tokio_util::sync::CancellationToken;

use commands::{BotContext, builtin_commands};
use config::Config;
use error::Result;
use session::SessionSettings;
use slack::SlackConnector;
use supervisor::Supervisor;
use xkcd::XkcdClient;

/// Run the Slack bot until SIGINT or SIGTERM.
///
/// # Errors
///
/// Only startup problems are returned: bad configuration or signal handlers
/// that cannot be installed. Connection trouble is retried forever.
pub async fn run() -> Result<()> {
    let started_at = Utc::now();
    info!("Bot started.");

    let config = Config::from_env()?;

    let shutdown = CancellationToken::new();
    let _signals = shutdown::install(shutdown.clone())?;

    let ctx = BotContext::new(
        builtin_commands(),
        XkcdClient::new(config.xkcd_url.clone()),
        started_at,
    );
    let connector = SlackConnector::new(
        config.slack_api_url.clone(),
        config.slack_bot_token.clone(),
    );

    Supervisor::new(
        connector,
        ctx,
        SessionSettings::from(&config),
        config.retry_cooldown,
    )
    .run(&shutdown)
    .await;

    Ok(())
}
