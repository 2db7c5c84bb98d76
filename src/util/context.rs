//! Global context for typeforge operations.
//!
//! Provides centralized access to the working directory, manifest discovery
//! and configuration file locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::{self, Config};

/// File name of a project manifest.
pub const MANIFEST_NAME: &str = "typeforge.toml";

/// Errors locating a project manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(
        "could not find `typeforge.toml` in `{}` or any parent directory\n\
         help: pass `--manifest <path>` or run from inside a project",
        dir.display()
    )]
    NotFound { dir: PathBuf },
}

/// Global context shared by CLI commands.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a context rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a context rooted at an explicit directory.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        GlobalContext { cwd: cwd.into() }
    }

    /// The working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Make a user-supplied path absolute against the working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Find `typeforge.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ManifestError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Load the merged global + project configuration for a project root.
    pub fn load_config(&self, project_root: &Path) -> Config {
        let global = config::global_config_path();
        config::load_config(global.as_deref(), &config::project_config_path(project_root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest_searches_upward() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("src").join("detail");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();

        let ctx = GlobalContext::with_cwd(&nested);
        assert_eq!(ctx.find_manifest().unwrap(), tmp.path().join(MANIFEST_NAME));
    }

    #[test]
    fn test_absolute() {
        let ctx = GlobalContext::with_cwd("/work");
        assert_eq!(ctx.absolute(Path::new("a/b")), PathBuf::from("/work/a/b"));
        assert_eq!(ctx.absolute(Path::new("/x")), PathBuf::from("/x"));
    }
}
