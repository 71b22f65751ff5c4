//! Pagination state and its transitions.
//!
//! Every decision the fetch loop makes lives here as a plain method on
//! [`FetchState`]; the loop itself only performs the requests and sleeps the
//! returned [`Step`] asks for.

use log::{error, warn};
use std::time::Duration;

use crate::config::FetchSettings;
use crate::github::{RateLimit, Repository};
use crate::http::PageError;

use super::error::FetchError;

/// Upper bound on the number of pages one fetch may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    Pages(u32),
    Unbounded,
}

impl PageLimit {
    /// Whether `page` (1-based) may still be requested.
    pub fn allows(&self, page: u32) -> bool {
        match self {
            PageLimit::Pages(max) => page <= *max,
            PageLimit::Unbounded => true,
        }
    }
}

impl From<Option<u32>> for PageLimit {
    fn from(max_pages: Option<u32>) -> Self {
        max_pages.map_or(PageLimit::Unbounded, PageLimit::Pages)
    }
}

/// Why pagination ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The server returned an empty page
    Exhausted,
    /// The caller's page limit was reached
    PageLimit,
    /// Throttled without a credential to wait it out
    Throttled,
    /// Too many consecutive retryable failures on one page
    RetriesExhausted,
}

/// What the loop does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Request the next page
    Continue,
    /// Sleep, then request the same page again
    Retry { wait: Duration },
    /// Return what has been gathered
    Stop(StopReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    pub repos: Vec<Repository>,
    /// Next page to request, 1-based
    pub page: u32,
    pub consecutive_failures: u32,
    pub has_more: bool,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            page: 1,
            consecutive_failures: 0,
            has_more: true,
        }
    }
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause before requesting the current page. Only the first page goes out immediately.
    pub fn courtesy_delay(&self, settings: &FetchSettings) -> Option<Duration> {
        (self.page > 1 && !settings.courtesy_delay.is_zero()).then_some(settings.courtesy_delay)
    }

    /// Records a successfully validated page.
    pub fn on_page(&mut self, items: Vec<Repository>, limit: PageLimit) -> Step {
        if items.is_empty() {
            return self.stop(StopReason::Exhausted);
        }

        self.repos.extend(items);
        self.page += 1;
        self.consecutive_failures = 0;

        if limit.allows(self.page) {
            Step::Continue
        } else {
            self.stop(StopReason::PageLimit)
        }
    }

    /// Decides how to react to a failed request for the current page.
    ///
    /// `now` is the current epoch second; `authenticated` tells whether
    /// waiting out a throttle can help at all.
    pub fn on_failure(
        &mut self,
        error: PageError,
        username: &str,
        authenticated: bool,
        now: u64,
        settings: &FetchSettings,
    ) -> Result<Step, FetchError> {
        match error {
            PageError::NotFound => Err(FetchError::NotFound {
                username: username.to_string(),
            }),

            PageError::QuotaExhausted { reset } if !authenticated => {
                warn!(
                    "Rate limit exceeded. Limit will reset {}.",
                    describe_reset(reset, now)
                );
                warn!("Without a token only a limited number of repositories can be fetched.");
                warn!("For better results, pass a GitHub token with --token.");
                Ok(self.stop(StopReason::Throttled))
            }

            PageError::QuotaExhausted { reset } => {
                let wait = match reset {
                    Some(reset) => Duration::from_secs(reset.saturating_sub(now)),
                    None => settings.default_reset_window,
                };

                if wait.is_zero() || wait >= settings.max_reset_wait {
                    return Err(FetchError::RateLimited { reset });
                }

                self.consecutive_failures += 1;
                if self.consecutive_failures > settings.max_retries {
                    error!("Maximum retry count exceeded. Stopping.");
                    return Ok(self.stop(StopReason::RetriesExhausted));
                }

                warn!(
                    "Rate limit exceeded. Waiting {} seconds until reset...",
                    wait.as_secs()
                );
                Ok(Step::Retry {
                    wait: wait + settings.reset_buffer,
                })
            }

            PageError::Server { status } => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= settings.max_retries {
                    error!(
                        "GitHub API error (HTTP {}): maximum retry count exceeded. Stopping.",
                        status
                    );
                    return Ok(self.stop(StopReason::RetriesExhausted));
                }

                let wait = settings.server_backoff * self.consecutive_failures;
                warn!(
                    "GitHub API error (HTTP {}). Retrying in {} seconds... (attempt {} of {})",
                    status,
                    wait.as_secs(),
                    self.consecutive_failures,
                    settings.max_retries
                );
                Ok(Step::Retry { wait })
            }

            PageError::Unexpected(e) => Err(FetchError::Unexpected(e)),
        }
    }

    pub fn into_repos(self) -> Vec<Repository> {
        self.repos
    }

    fn stop(&mut self, reason: StopReason) -> Step {
        self.has_more = false;
        Step::Stop(reason)
    }
}

/// Extra pause after a response that reported a nearly spent quota.
/// Grows as the remaining quota shrinks, capped at `max_pacing_delay`.
pub fn pacing_delay(rate_limit: &RateLimit, settings: &FetchSettings) -> Option<Duration> {
    if !rate_limit.is_low(settings.low_quota_threshold) {
        return None;
    }

    let steps = settings.low_quota_threshold - rate_limit.remaining;
    let delay = settings
        .pacing_step
        .saturating_mul(u32::try_from(steps).unwrap_or(u32::MAX))
        .min(settings.max_pacing_delay);

    (!delay.is_zero()).then_some(delay)
}

fn describe_reset(reset: Option<u64>, now: u64) -> String {
    match reset {
        Some(reset) => format!("in {} seconds (epoch {})", reset.saturating_sub(now), reset),
        None => "at an unknown time".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn repo(id: u64) -> Repository {
        Repository {
            id,
            name: format!("repo-{}", id),
            full_name: format!("owner/repo-{}", id),
            html_url: format!("https://github.com/owner/repo-{}", id),
            description: None,
            language: None,
            topics: vec![],
            stargazers_count: None,
            created_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            updated_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        }
    }

    fn settings() -> FetchSettings {
        FetchSettings::default()
    }

    #[test]
    fn test_initial_state() {
        let state = FetchState::new();
        assert_eq!(state.page, 1);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.has_more);
        assert!(state.repos.is_empty());
    }

    #[test]
    fn test_page_limit_allows() {
        assert!(PageLimit::Pages(2).allows(2));
        assert!(!PageLimit::Pages(2).allows(3));
        assert!(!PageLimit::Pages(0).allows(1));
        assert!(PageLimit::Unbounded.allows(u32::MAX));
        assert_eq!(PageLimit::from(Some(5)), PageLimit::Pages(5));
        assert_eq!(PageLimit::from(None), PageLimit::Unbounded);
    }

    #[test]
    fn test_courtesy_delay_only_after_first_page() {
        let mut state = FetchState::new();
        assert_eq!(state.courtesy_delay(&settings()), None);

        state.page = 2;
        assert_eq!(state.courtesy_delay(&settings()), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_on_page_appends_and_resets_failures() {
        let mut state = FetchState::new();
        state.consecutive_failures = 2;

        let step = state.on_page(vec![repo(1), repo(2)], PageLimit::Unbounded);

        assert_eq!(step, Step::Continue);
        assert_eq!(state.page, 2);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.has_more);
        let ids: Vec<u64> = state.repos.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_on_page_empty_stops_without_advancing() {
        let mut state = FetchState::new();
        state.on_page(vec![repo(1)], PageLimit::Unbounded);

        let step = state.on_page(vec![], PageLimit::Unbounded);

        assert_eq!(step, Step::Stop(StopReason::Exhausted));
        assert_eq!(state.page, 2);
        assert!(!state.has_more);
        assert_eq!(state.repos.len(), 1);
    }

    #[test]
    fn test_on_page_stops_at_page_limit() {
        let mut state = FetchState::new();

        assert_eq!(state.on_page(vec![repo(1)], PageLimit::Pages(2)), Step::Continue);
        assert_eq!(
            state.on_page(vec![repo(2)], PageLimit::Pages(2)),
            Step::Stop(StopReason::PageLimit)
        );
        assert!(!state.has_more);
    }

    #[test]
    fn test_on_failure_not_found_is_fatal() {
        let mut state = FetchState::new();
        let result = state.on_failure(PageError::NotFound, "ghost", true, NOW, &settings());

        match result {
            Err(FetchError::NotFound { username }) => assert_eq!(username, "ghost"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_on_failure_quota_without_token_stops() {
        let mut state = FetchState::new();
        let step = state
            .on_failure(
                PageError::QuotaExhausted {
                    reset: Some(NOW + 60),
                },
                "octocat",
                false,
                NOW,
                &settings(),
            )
            .unwrap();

        assert_eq!(step, Step::Stop(StopReason::Throttled));
        assert!(!state.has_more);
        assert_eq!(state.consecutive_failures, 0);
    }

    #[test]
    fn test_on_failure_quota_with_token_waits_until_reset_plus_buffer() {
        let mut state = FetchState::new();
        let step = state
            .on_failure(
                PageError::QuotaExhausted {
                    reset: Some(NOW + 10),
                },
                "octocat",
                true,
                NOW,
                &settings(),
            )
            .unwrap();

        assert_eq!(
            step,
            Step::Retry {
                wait: Duration::from_secs(11)
            }
        );
        assert_eq!(state.consecutive_failures, 1);
        assert!(state.has_more);
    }

    #[test]
    fn test_on_failure_quota_reset_in_past_is_fatal() {
        let mut state = FetchState::new();
        let result = state.on_failure(
            PageError::QuotaExhausted {
                reset: Some(NOW - 5),
            },
            "octocat",
            true,
            NOW,
            &settings(),
        );

        assert!(matches!(
            result,
            Err(FetchError::RateLimited { reset: Some(r) }) if r == NOW - 5
        ));
        assert_eq!(state.consecutive_failures, 0);
    }

    #[test]
    fn test_on_failure_quota_reset_now_is_fatal() {
        let mut state = FetchState::new();
        let result = state.on_failure(
            PageError::QuotaExhausted { reset: Some(NOW) },
            "octocat",
            true,
            NOW,
            &settings(),
        );

        assert!(matches!(result, Err(FetchError::RateLimited { .. })));
    }

    #[test]
    fn test_on_failure_quota_reset_beyond_cap_is_fatal() {
        let mut state = FetchState::new();
        let result = state.on_failure(
            PageError::QuotaExhausted {
                reset: Some(NOW + 2 * 60 * 60),
            },
            "octocat",
            true,
            NOW,
            &settings(),
        );

        assert!(matches!(
            result,
            Err(FetchError::RateLimited { reset: Some(r) }) if r == NOW + 7200
        ));
    }

    #[test]
    fn test_on_failure_quota_unknown_reset_is_fatal() {
        // The default window equals the cap, so there is nothing worth waiting for
        let mut state = FetchState::new();
        let result = state.on_failure(
            PageError::QuotaExhausted { reset: None },
            "octocat",
            true,
            NOW,
            &settings(),
        );

        assert!(matches!(result, Err(FetchError::RateLimited { reset: None })));
    }

    #[test]
    fn test_on_failure_quota_budget_exhausted() {
        let mut state = FetchState::new();
        let error = || PageError::QuotaExhausted {
            reset: Some(NOW + 10),
        };

        for _ in 0..3 {
            let step = state
                .on_failure(error(), "octocat", true, NOW, &settings())
                .unwrap();
            assert!(matches!(step, Step::Retry { .. }));
        }

        let step = state
            .on_failure(error(), "octocat", true, NOW, &settings())
            .unwrap();
        assert_eq!(step, Step::Stop(StopReason::RetriesExhausted));
        assert!(!state.has_more);
    }

    #[test]
    fn test_on_failure_server_error_backs_off_linearly() {
        let mut state = FetchState::new();

        let first = state
            .on_failure(PageError::Server { status: 500 }, "octocat", false, NOW, &settings())
            .unwrap();
        let second = state
            .on_failure(PageError::Server { status: 502 }, "octocat", false, NOW, &settings())
            .unwrap();
        let third = state
            .on_failure(PageError::Server { status: 503 }, "octocat", false, NOW, &settings())
            .unwrap();

        assert_eq!(
            first,
            Step::Retry {
                wait: Duration::from_secs(2)
            }
        );
        assert_eq!(
            second,
            Step::Retry {
                wait: Duration::from_secs(4)
            }
        );
        assert_eq!(third, Step::Stop(StopReason::RetriesExhausted));
    }

    #[test]
    fn test_on_failure_unexpected_is_fatal() {
        let mut state = FetchState::new();
        let result = state.on_failure(
            PageError::Unexpected(anyhow::anyhow!("HTTP 422")),
            "octocat",
            true,
            NOW,
            &settings(),
        );

        match result {
            Err(FetchError::Unexpected(e)) => assert!(e.to_string().contains("422")),
            other => panic!("Expected Unexpected, got {:?}", other),
        }
    }

    #[test]
    fn test_pacing_delay() {
        let rate = |remaining| RateLimit {
            limit: 60,
            remaining,
            reset: NOW,
        };

        assert_eq!(pacing_delay(&rate(60), &settings()), None);
        assert_eq!(pacing_delay(&rate(0), &settings()), None);
        assert_eq!(pacing_delay(&rate(10), &settings()), None);
        assert_eq!(pacing_delay(&rate(7), &settings()), Some(Duration::from_secs(3)));
        assert_eq!(pacing_delay(&rate(1), &settings()), Some(Duration::from_secs(5)));
    }
}
