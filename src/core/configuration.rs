//! Configuration fragments.
//!
//! A [`Configuration`] is a partial settings bundle annotated with one
//! [`AxisFilter`] per axis. A project is described by an ordered list of
//! fragments; the resolver folds the applicable ones into a single effective
//! configuration for a concrete axis tuple.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::axis::{
    Architecture, AxisFilter, Compiler, ConfigurationType, OperatingSystem, TargetType, Toolchain,
};
use super::project::File;

/// A preprocessor define: `NAME` or `NAME=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    /// Create a simple flag define.
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// Create a key-value define.
    pub fn key_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Parse `NAME` or `NAME=VALUE`, splitting at the first `=`.
    pub fn from_text(s: &str) -> Self {
        match s.split_once('=') {
            Some((name, value)) => Define::key_value(name, value),
            None => Define::flag(s),
        }
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for Define {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Define::from_text(s))
    }
}

impl Serialize for Define {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Define {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Define::from_text(&s))
    }
}

/// A configuration fragment.
///
/// Unset filters (`AxisFilter::Any`) are wildcards over their axis only; the
/// fragment applies when every one of its eight filters is satisfied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_target_types: AxisFilter<TargetType>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_toolchains: AxisFilter<Toolchain>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_compilers: AxisFilter<Compiler>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_host_operating_systems: AxisFilter<OperatingSystem>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_host_architectures: AxisFilter<Architecture>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_target_operating_systems: AxisFilter<OperatingSystem>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_target_architectures: AxisFilter<Architecture>,
    #[serde(skip_serializing_if = "AxisFilter::is_any")]
    pub matching_configuration_types: AxisFilter<ConfigurationType>,

    /// Header search paths (deduplicated on merge)
    pub include_directories: Vec<PathBuf>,
    /// Preprocessor defines, duplicates allowed
    pub defines: Vec<Define>,
    /// Flags passed to both C and C++ compiles
    pub common_flags: Vec<String>,
    pub c_flags: Vec<String>,
    pub cpp_flags: Vec<String>,
    pub linker_flags: Vec<String>,
    /// Free-form key/value settings; later fragments override earlier ones
    pub options: BTreeMap<String, String>,
    /// Library search paths (deduplicated on merge)
    pub lib_directories: Vec<PathBuf>,
    /// Libraries to link (deduplicated on merge)
    pub libs: Vec<PathBuf>,
    pub files: Vec<File>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,
}

impl Configuration {
    /// Whether the fragment carries any compile settings a per-file override
    /// would care about.
    pub fn has_compile_settings(&self) -> bool {
        !self.include_directories.is_empty()
            || !self.defines.is_empty()
            || !self.common_flags.is_empty()
            || !self.c_flags.is_empty()
            || !self.cpp_flags.is_empty()
    }
}
