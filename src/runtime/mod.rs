//! Runtime abstraction for system operations.
//!
//! Everything that touches the environment, the file system or the clock
//! goes through [`Runtime`], so the fetch loop and the writer can be driven
//! by mocks in tests.
//!
//! # Structure
//!
//! - `env` - Environment variables
//! - `fs` - File system operations (write, directory creation)
//! - `clock` - Wall clock and sleeping

mod clock;
mod env;
mod fs;

use anyhow::Result;
use async_trait::async_trait;
use std::env as std_env;
use std::path::Path;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    // Clock
    /// Current wall-clock time as seconds since the Unix epoch.
    fn now_epoch_secs(&self) -> u64;

    /// Suspend the current task. Every wait in the fetch loop goes through here.
    async fn sleep(&self, duration: Duration);
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn now_epoch_secs(&self) -> u64 {
        self.now_epoch_secs_impl()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleep_impl(duration).await
    }
}
