//! HTTP client the views use to reach the JSON API.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{League, LeagueDirectory, TeamDetail};

/// Transport-level failures seen by the views.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Invalid API base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Client for the league directory and roster endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ViewError> {
        let base = Url::parse(base_url).map_err(|e| ViewError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ViewError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            });
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// Fetch the league directory.
    pub async fn fetch_directory(&self) -> Result<Vec<League>, ViewError> {
        let url = self.endpoint(&["dashboard"]);
        let directory: Option<LeagueDirectory> = self.get_json(url.clone()).await?;
        directory
            .map(|d| d.leagues)
            .ok_or_else(|| ViewError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: url.to_string(),
            })
    }

    /// Fetch a team roster; `None` when the team does not exist.
    pub async fn fetch_team(&self, id: &str) -> Result<Option<TeamDetail>, ViewError> {
        self.get_json(self.endpoint(&["teams", id])).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base URL always accepts path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[instrument(skip(self, url), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ViewError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ViewError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("Response status: {status}");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ViewError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|source| ViewError::Decode {
                url: url.to_string(),
                source,
            })
    }
}
