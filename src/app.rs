//! Fetch, categorize and write: one full run of the tool.

use anyhow::Result;
use log::warn;
use std::path::PathBuf;

use crate::config::{Config, UNAUTHENTICATED_PAGE_LIMIT};
use crate::fetch::{Fetcher, PageLimit};
use crate::output::{CategorizedRepo, write_output};
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub username: String,
    pub token: Option<String>,
    pub output: PathBuf,
    pub api_url: Option<String>,
    pub max_pages: Option<u32>,
}

/// An explicit limit always wins. Otherwise a token means no limit, and
/// anonymous runs stop after a couple of pages to stay under the quota.
pub fn resolve_page_limit(max_pages: Option<u32>, authenticated: bool) -> PageLimit {
    match (max_pages, authenticated) {
        (Some(max), _) => PageLimit::Pages(max),
        (None, true) => PageLimit::Unbounded,
        (None, false) => PageLimit::Pages(UNAUTHENTICATED_PAGE_LIMIT),
    }
}

/// Runs the whole pipeline. Returns the number of repositories written.
#[tracing::instrument(skip(runtime, options))]
pub async fn run<R: Runtime>(runtime: R, options: RunOptions) -> Result<usize> {
    let RunOptions {
        username,
        token,
        output,
        api_url,
        max_pages,
    } = options;

    let config = Config::new(runtime, token, api_url)?;
    let authenticated = config.token.is_some();
    let limit = resolve_page_limit(max_pages, authenticated);

    println!("Fetching starred repositories for user: {}", username);

    if !authenticated && max_pages.is_none() {
        warn!(
            "No GitHub token provided. Limiting to {} pages ({} repositories) to avoid rate limits.",
            UNAUTHENTICATED_PAGE_LIMIT,
            UNAUTHENTICATED_PAGE_LIMIT * config.settings.per_page
        );
        warn!("For better results, pass a GitHub token with --token or GITHUB_TOKEN.");
    }

    let repos = Fetcher::new(&config.runtime, &config.github, &config.settings)
        .fetch(&username, limit)
        .await?;

    println!("Found {} starred repositories", repos.len());

    let categorized: Vec<CategorizedRepo> = repos
        .into_iter()
        .map(CategorizedRepo::from_repository)
        .collect();
    let count = categorized.len();

    write_output(&config.runtime, categorized, &output)?;

    println!("Output written to {}", output.display());
    Ok(count)
}
