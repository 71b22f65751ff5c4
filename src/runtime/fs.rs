//! File system operations.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to file {}", path.display()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        runtime.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());

        // Creating an existing directory is not an error
        runtime.create_dir_all(&nested).unwrap();

        let file_path = nested.join("out.json");
        runtime.write(&file_path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_real_runtime_write_into_missing_dir_fails() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing").join("out.json");

        let err = runtime.write(&file_path, b"{}").unwrap_err();
        assert!(err.to_string().contains("Failed to write to file"));
    }
}
