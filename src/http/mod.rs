//! HTTP error classification shared by the API clients.

mod retry;

pub use retry::{PageError, classify_error, classify_status};
