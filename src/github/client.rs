use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};

use crate::http::{PageError, classify_error, classify_status};

use super::rate_limit::{RateLimit, reset_from_headers};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// One successful page response, body not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct StarredPage {
    pub rate_limit: RateLimit,
    pub body: String,
}

/// A source of starred-repository pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StarredSource: Send + Sync {
    async fn get_starred_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<StarredPage, PageError>;

    /// Whether requests carry a credential. Decides if throttling is worth waiting out.
    fn is_authenticated(&self) -> bool;
}

pub struct GitHub {
    pub client: Client,
    pub api_url: String,
    authenticated: bool,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>, authenticated: bool) -> Self {
        let api_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            client,
            api_url,
            authenticated,
        }
    }

    /// `{api_url}/users/{username}/starred`, with the username encoded as a
    /// single path segment.
    fn starred_url(&self, username: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", self.api_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("GitHub API URL cannot have a path: {}", self.api_url))?
            .pop_if_empty()
            .extend(["users", username, "starred"]);
        Ok(url)
    }
}

#[async_trait]
impl StarredSource for GitHub {
    #[tracing::instrument(skip(self))]
    async fn get_starred_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<StarredPage, PageError> {
        let url = self
            .starred_url(username)
            .map_err(PageError::Unexpected)?;

        debug!("Fetching starred page {} from {}...", page, url);

        let response = self
            .client
            .get(url)
            .query(&[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if let Some(error) = classify_status(status, reset_from_headers(response.headers())) {
            debug!("Page {} failed with HTTP {}", page, status.as_u16());
            return Err(error);
        }

        let rate_limit = RateLimit::from_headers(response.headers());
        debug!(
            "Rate limit: {}/{} remaining, resets at {}",
            rate_limit.remaining, rate_limit.limit, rate_limit.reset
        );

        let body = response
            .text()
            .await
            .context("Failed to read response body from GitHub API")
            .map_err(PageError::Unexpected)?;

        Ok(StarredPage { rate_limit, body })
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
