//! Configuration file support for typeforge.
//!
//! typeforge reads two configuration file locations:
//! - Global: `~/.typeforge/config.toml` - User-wide defaults
//! - Project: `.typeforge/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! [generate]
//! force = false
//! development-team = "ABCDE12345"
//! host-os = "Mac"
//! host-arch = "arm64_v8a"
//!
//! [templates]
//! xcode = "templates/project.pbxproj"
//! vcxproj = "templates/Default.vcxproj"
//! vcxproj-filters = "templates/Default.vcxproj.filters"
//! sln = "templates/Default.sln"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Architecture, OperatingSystem};

/// typeforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,

    /// Template file locations
    pub templates: TemplateConfig,
}

/// Generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerateConfig {
    /// Always rewrite outputs, even when unchanged
    pub force: bool,

    /// Apple signing team used for iOS targets
    pub development_team: Option<String>,

    /// Override the detected host operating system
    pub host_os: Option<String>,

    /// Override the detected host architecture
    pub host_arch: Option<String>,
}

/// Template file locations, relative to the project root unless absolute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TemplateConfig {
    /// `project.pbxproj` template
    pub xcode: Option<PathBuf>,

    /// `.vcxproj` template
    pub vcxproj: Option<PathBuf>,

    /// `.vcxproj.filters` template
    pub vcxproj_filters: Option<PathBuf>,

    /// `.sln` template
    pub sln: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.generate.force {
            self.generate.force = true;
        }
        if other.generate.development_team.is_some() {
            self.generate.development_team = other.generate.development_team;
        }
        if other.generate.host_os.is_some() {
            self.generate.host_os = other.generate.host_os;
        }
        if other.generate.host_arch.is_some() {
            self.generate.host_arch = other.generate.host_arch;
        }

        if other.templates.xcode.is_some() {
            self.templates.xcode = other.templates.xcode;
        }
        if other.templates.vcxproj.is_some() {
            self.templates.vcxproj = other.templates.vcxproj;
        }
        if other.templates.vcxproj_filters.is_some() {
            self.templates.vcxproj_filters = other.templates.vcxproj_filters;
        }
        if other.templates.sln.is_some() {
            self.templates.sln = other.templates.sln;
        }
    }

    /// Configured host operating system, if any.
    pub fn host_os(&self) -> Result<Option<OperatingSystem>> {
        self.generate
            .host_os
            .as_deref()
            .map(|s| {
                s.parse::<OperatingSystem>()
                    .context("invalid `generate.host-os` in config")
            })
            .transpose()
    }

    /// Configured host architecture, if any.
    pub fn host_arch(&self) -> Result<Option<Architecture>> {
        self.generate
            .host_arch
            .as_deref()
            .map(|s| {
                s.parse::<Architecture>()
                    .context("invalid `generate.host-arch` in config")
            })
            .transpose()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.typeforge/config.toml)
/// 2. Global config (~/.typeforge/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global typeforge config directory (~/.typeforge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".typeforge"))
}

/// Get the global config path (~/.typeforge/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.typeforge/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".typeforge").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.generate.force);
        assert!(config.generate.development_team.is_none());
        assert!(config.templates.xcode.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[generate]
force = true
development-team = "TEAM123"
host-os = "Mac"

[templates]
vcxproj-filters = "t/Default.vcxproj.filters"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.generate.force);
        assert_eq!(config.generate.development_team.as_deref(), Some("TEAM123"));
        assert_eq!(config.host_os().unwrap(), Some(OperatingSystem::Mac));
        assert_eq!(config.host_arch().unwrap(), None);
        assert_eq!(
            config.templates.vcxproj_filters,
            Some(PathBuf::from("t/Default.vcxproj.filters"))
        );
    }

    #[test]
    fn test_invalid_host_os() {
        let config: Config = toml::from_str("[generate]\nhost-os = \"BeOS\"").unwrap();
        assert!(config.host_os().is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut global = Config::default();
        global.generate.development_team = Some("GLOBAL".to_string());
        global.templates.sln = Some(PathBuf::from("global.sln"));

        let mut project = Config::default();
        project.generate.development_team = Some("PROJECT".to_string());

        global.merge(project);

        assert_eq!(global.generate.development_team.as_deref(), Some("PROJECT"));
        assert_eq!(global.templates.sln, Some(PathBuf::from("global.sln")));
    }

    #[test]
    fn test_load_config_malformed_falls_back() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[generate]\nhost-arch = \"x86_64\"\n").unwrap();
        std::fs::write(&project, "this is = = not toml").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.host_arch().unwrap(), Some(Architecture::X86_64));
    }
}
