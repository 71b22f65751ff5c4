//! Wall clock and task suspension.

use log::debug;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::RealRuntime;

impl RealRuntime {
    pub(crate) fn now_epoch_secs_impl(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn sleep_impl(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        debug!("Sleeping for {}ms", duration.as_millis());
        tokio::time::sleep(duration).await;
    }
}
