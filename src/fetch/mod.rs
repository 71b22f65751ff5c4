//! Paginated retrieval of starred repositories with rate-limit backoff.

mod error;
mod state;

use log::{debug, info, warn};

use crate::config::FetchSettings;
use crate::github::{Repository, StarredSource};
use crate::runtime::Runtime;

pub use error::FetchError;
pub use state::{FetchState, PageLimit, Step, StopReason, pacing_delay};

/// Drives one [`StarredSource`] page by page, one request at a time.
pub struct Fetcher<'a, R: Runtime, S: StarredSource> {
    runtime: &'a R,
    source: &'a S,
    settings: &'a FetchSettings,
}

impl<'a, R: Runtime, S: StarredSource> Fetcher<'a, R, S> {
    pub fn new(runtime: &'a R, source: &'a S, settings: &'a FetchSettings) -> Self {
        Self {
            runtime,
            source,
            settings,
        }
    }

    /// Fetches every starred repository of `username`, up to `limit` pages.
    ///
    /// Throttling without a token and exhausted retry budgets end the fetch
    /// early with the repositories gathered so far. A missing user, a
    /// malformed page, an unwaitable throttle or any other error aborts and
    /// discards them.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(
        &self,
        username: &str,
        limit: PageLimit,
    ) -> Result<Vec<Repository>, FetchError> {
        if username.trim().is_empty() {
            return Err(FetchError::Unexpected(anyhow::anyhow!(
                "Username must not be empty"
            )));
        }

        let mut state = FetchState::new();
        if !limit.allows(state.page) {
            debug!("Page limit {:?} allows no requests", limit);
            return Ok(state.into_repos());
        }

        let authenticated = self.source.is_authenticated();

        while state.has_more {
            if let Some(delay) = state.courtesy_delay(self.settings) {
                self.runtime.sleep(delay).await;
            }

            info!("Fetching page {} of starred repositories...", state.page);

            let step = match self
                .source
                .get_starred_page(username, state.page, self.settings.per_page)
                .await
            {
                Ok(page) => {
                    if let Some(delay) = pacing_delay(&page.rate_limit, self.settings) {
                        warn!(
                            "Rate limit almost reached ({}/{} remaining). Waiting {}ms before the next request...",
                            page.rate_limit.remaining,
                            page.rate_limit.limit,
                            delay.as_millis()
                        );
                        self.runtime.sleep(delay).await;
                    }

                    let items = Repository::parse_page(&page.body)
                        .map_err(|e| FetchError::Validation(e.to_string()))?;
                    let count = items.len();
                    let step = state.on_page(items, limit);
                    if count > 0 {
                        info!(
                            "Fetched {} repositories. Total: {}",
                            count,
                            state.repos.len()
                        );
                    }
                    step
                }
                Err(error) => {
                    debug!("Page {} failed: {}", state.page, error);
                    state.on_failure(
                        error,
                        username,
                        authenticated,
                        self.runtime.now_epoch_secs(),
                        self.settings,
                    )?
                }
            };

            match step {
                Step::Continue => {}
                Step::Retry { wait } => self.runtime.sleep(wait).await,
                Step::Stop(StopReason::Exhausted) => info!("No more repositories found."),
                Step::Stop(StopReason::PageLimit) => {
                    info!("Reached maximum number of pages ({:?}). Stopping.", limit)
                }
                Step::Stop(reason) => warn!(
                    "Stopped early ({:?}); returning {} repositories gathered so far.",
                    reason,
                    state.repos.len()
                ),
            }
        }

        Ok(state.into_repos())
    }
}
