//! GitHub REST API access for starred repositories.

mod client;
mod rate_limit;
mod types;

pub use client::{DEFAULT_API_URL, GitHub, StarredPage, StarredSource};
pub use rate_limit::RateLimit;
pub use types::Repository;

#[cfg(test)]
pub use client::MockStarredSource;
