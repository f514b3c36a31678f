use std::fs::OpenOptions;

#[tokio::main]
async fn main() -> slackbot::error::Result<()> {
    init_logging()?;

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("A rustls crypto provider was already installed");
    }

    match slackbot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}

/// Log to stderr, or append to `SLACKBOT_LOG_FILE` when it is set.
fn init_logging() -> slackbot::error::Result<()> {
    dotenvy::dotenv().ok();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("slackbot=info"));

    if let Ok(path) = std::env::var("SLACKBOT_LOG_FILE") {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
