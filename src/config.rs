use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::{github::GitHub, runtime::Runtime};

pub const USER_AGENT: &str = "starsort-cli";
pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Pages fetched when no token is available and no explicit limit was given.
pub const UNAUTHENTICATED_PAGE_LIMIT: u32 = 2;

/// Tunables of the fetch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Items requested per page (the API maximum)
    pub per_page: u32,
    /// Pause before every request for a page after the first
    pub courtesy_delay: Duration,
    /// Remaining quota at or below which requests are slowed down
    pub low_quota_threshold: u64,
    /// Extra pause per request below the threshold
    pub pacing_step: Duration,
    pub max_pacing_delay: Duration,
    /// Longest reset wait worth sleeping through; beyond it the fetch aborts
    pub max_reset_wait: Duration,
    /// Added on top of the reset wait so the retry lands after the reset
    pub reset_buffer: Duration,
    /// Assumed wait when a throttled response carries no reset time
    pub default_reset_window: Duration,
    /// Consecutive retryable failures tolerated on one page
    pub max_retries: u32,
    /// Server errors back off linearly by this much per attempt
    pub server_backoff: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            per_page: 100,
            courtesy_delay: Duration::from_secs(1),
            low_quota_threshold: 10,
            pacing_step: Duration::from_secs(1),
            max_pacing_delay: Duration::from_secs(5),
            max_reset_wait: Duration::from_secs(60 * 60),
            reset_buffer: Duration::from_secs(1),
            default_reset_window: Duration::from_secs(60 * 60),
            max_retries: 3,
            server_backoff: Duration::from_secs(2),
        }
    }
}

/// Everything a run needs, resolved from CLI flags and the environment.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub github: GitHub,
    pub settings: FetchSettings,
    pub token: Option<String>,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, token: Option<String>, api_url: Option<String>) -> Result<Self> {
        let token = token
            .or_else(|| runtime.env_var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        if let Some(token) = &token {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GitHub token for authentication: {}", mask_token(token));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let github = GitHub::new(client, api_url, token.is_some());

        Ok(Self {
            runtime,
            github,
            settings: FetchSettings::default(),
            token,
        })
    }
}

/// Shows only the first 4 and last 4 characters of a token.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
