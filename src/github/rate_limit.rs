use reqwest::header::HeaderMap;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit telemetry from one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// Epoch second at which the window resets
    pub reset: u64,
}

impl RateLimit {
    /// Reads the three rate-limit headers; absent or malformed values read as 0.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_u64(headers, LIMIT_HEADER).unwrap_or_default(),
            remaining: header_u64(headers, REMAINING_HEADER).unwrap_or_default(),
            reset: header_u64(headers, RESET_HEADER).unwrap_or_default(),
        }
    }

    /// True when the quota is nearly spent but not yet exhausted.
    pub fn is_low(&self, threshold: u64) -> bool {
        self.remaining > 0 && self.remaining <= threshold
    }
}

/// The reset epoch reported by a (typically failed) response, if any.
pub fn reset_from_headers(headers: &HeaderMap) -> Option<u64> {
    header_u64(headers, RESET_HEADER)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
