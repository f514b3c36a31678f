use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Slack API error on {method}: {error}")]
    SlackApi { method: String, error: String },

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Comic service error ({status}) for {url}")]
    ComicApi {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Connection closed by the backend")]
    ConnectionClosed,

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Session panicked: {0}")]
    Panic(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for BotError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        BotError::WebSocket(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Why a session run ended abnormally.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The backend could not be reached or rejected the credential.
    #[error("handshake failed: {0}")]
    Handshake(#[source] BotError),

    /// Something went wrong after the session was established.
    #[error("session fault: {0}")]
    Fault(#[source] BotError),
}
