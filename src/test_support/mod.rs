//! Shared helpers for unit tests.
//!
//! Fixture texts live in [`fixtures`]; this module adds the axis queries and
//! on-disk project trees most tests start from.

pub mod fixtures;

use std::path::{Path, PathBuf};

pub use fixtures::*;

use crate::core::{
    Architecture, Compiler, ConfigurationType, OperatingSystem, TargetType, Toolchain,
};
use crate::resolver::AxisQuery;

/// Ninja + gcc building Linux x86_64 Debug on a Linux x86_64 host.
///
/// The target type is left unset; generators take it from the project.
pub fn linux_debug_query() -> AxisQuery {
    AxisQuery::new()
        .toolchain(Toolchain::Ninja)
        .compiler(Compiler::Gcc)
        .host(OperatingSystem::Linux, Architecture::X86_64)
        .target_os(OperatingSystem::Linux)
        .target_arch(Architecture::X86_64)
        .configuration_type(ConfigurationType::Debug)
}

/// A fully pinned query for a static library.
pub fn static_library_query(config: ConfigurationType) -> AxisQuery {
    linux_debug_query()
        .target_type(TargetType::StaticLibrary)
        .configuration_type(config)
}

/// Files to lay out under a project root.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    files: Vec<(PathBuf, String)>,
}

impl ProjectTree {
    pub fn new() -> Self {
        ProjectTree::default()
    }

    /// A library tree with a manifest from [`manifests::library`].
    pub fn library(name: &str) -> Self {
        ProjectTree::new()
            .with_file("typeforge.toml", manifests::library(name))
            .with_file("src/lib.c", "int lib(void) { return 0; }\n")
            .with_file("src/detail/impl.cpp", "int impl() { return 1; }\n")
            .with_file("include/lib.h", "int lib(void);\n")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write every file below `root`, creating directories as needed.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        for (path, content) in &self.files {
            let path = root.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}
