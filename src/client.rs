use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{Story, StoryId};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Client for the story backend.
pub struct ApiClient {
    client: Client,
    api_host: String,
}

impl ApiClient {
    pub fn new(api_host: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("DailyDigest/1.0 (Story Reader)")
            .build()?;

        Ok(Self {
            client,
            api_host: api_host.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn stories_url(&self) -> String {
        format!("{}/stories", self.api_host)
    }

    pub fn story_url(&self, id: StoryId) -> String {
        format!("{}/story/{}", self.api_host, id)
    }

    pub async fn fetch_stories(&self) -> Result<Vec<Story>, ApiError> {
        self.get_json(self.stories_url()).await
    }

    pub async fn fetch_story(&self, id: StoryId) -> Result<Story, ApiError> {
        self.get_json(self.story_url(id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
    }
}
