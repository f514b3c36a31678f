//! Client for the xkcd JSON API.

use log::debug;
use serde::Deserialize;
use url::Url;

use crate::error::{BotError, Result};

/// Metadata for the newest comic; only the number matters here.
#[derive(Debug, Deserialize)]
struct LatestComic {
    num: u32,
}

/// A single comic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comic {
    pub alt: String,
    pub img: String,
}

impl Comic {
    /// Chat reply for this comic: caption followed by the image link.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} {}", self.alt, self.img)
    }
}

#[derive(Debug, Clone)]
pub struct XkcdClient {
    http: reqwest::Client,
    base_url: Url,
}

impl XkcdClient {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Number of the most recent comic.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn latest_number(&self) -> Result<u32> {
        let latest: LatestComic = self.get_json("info.0.json").await?;
        Ok(latest.num)
    }

    /// Fetch comic number `num`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn comic(&self, num: u32) -> Result<Comic> {
        self.get_json(&format!("{num}/info.0.json")).await
    }

    /// Fetch a uniformly random comic in `1..=latest`.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn random_comic(&self) -> Result<Comic> {
        let latest = self.latest_number().await?;
        let num = rand::random_range(1..=latest.max(1));
        debug!("Picked xkcd #{num} of {latest}");
        self.comic(num).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| BotError::Config(format!("invalid xkcd path {path}: {e}")))?;

        debug!("GET {url}");
        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(BotError::ComicApi {
                status: response.status(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
