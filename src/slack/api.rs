//! Minimal Slack Web API client.

use log::debug;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use url::Url;

use crate::error::{BotError, Result};

/// Every Web API reply carries `ok` and, on failure, an `error` code.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RtmConnect {
    pub url: String,
    #[serde(rename = "self")]
    pub bot: RtmSelf,
}

#[derive(Debug, Deserialize)]
pub struct RtmSelf {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthTest {
    user_id: String,
}

/// Token-bound Web API client. A fresh one is built for every session.
#[derive(Debug, Clone)]
pub struct SlackApi {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl SlackApi {
    #[must_use]
    pub fn new(base_url: Url, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    /// `rtm.connect`: returns the WebSocket URL and the bot's own identity.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when Slack answers `ok: false`.
    pub async fn rtm_connect(&self) -> Result<RtmConnect> {
        self.call("rtm.connect", &json!({})).await
    }

    /// `auth.test`: the user ID the token belongs to.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when Slack answers `ok: false`.
    pub async fn auth_test(&self) -> Result<String> {
        let auth: AuthTest = self.call("auth.test", &json!({})).await?;
        Ok(auth.user_id)
    }

    /// `chat.postMessage`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when Slack answers `ok: false`.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let _: Value = self
            .call("chat.postMessage", &json!({ "channel": channel, "text": text }))
            .await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let url = self
            .base_url
            .join(method)
            .map_err(|e| BotError::Config(format!("invalid Slack method {method}: {e}")))?;

        debug!("Calling Slack API method {method}");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let value: Value = response.json().await?;
        check_envelope(method, &value)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn check_envelope(method: &str, value: &Value) -> Result<()> {
    let envelope = Envelope::deserialize(value)?;
    if envelope.ok {
        Ok(())
    } else {
        Err(BotError::SlackApi {
            method: method.to_string(),
            error: envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
        })
    }
}
