//! Project file generators.
//!
//! Each backend turns a [`Project`](crate::core::Project) plus resolved
//! configurations into files for one build tool:
//!
//! - [`ninja`]: a Ninja build script
//! - [`xcode`]: an Xcode `project.pbxproj`, reconciled against a template
//! - [`msbuild`]: a Visual Studio `.vcxproj` and its `.filters` sidecar
//! - [`sln`]: a Visual Studio solution
//!
//! Generators never mutate the project model. All outputs go through
//! [`write_if_changed`](crate::util::fs::write_if_changed), so regenerating
//! unchanged content leaves files and their timestamps alone.

pub mod error;
pub mod msbuild;
pub mod ninja;
pub mod sln;
pub mod xcode;

use std::path::PathBuf;

use anyhow::Result;

use crate::util::fs::WriteOutcome;

pub use error::GenerateError;

/// Per-output result of one generator invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub outputs: Vec<(PathBuf, WriteOutcome)>,
}

impl GenerateReport {
    pub fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => tracing::info!("wrote {}", path.display()),
            WriteOutcome::Unchanged => tracing::info!("up to date {}", path.display()),
        }
        self.outputs.push((path, outcome));
    }

    /// Number of files actually written.
    pub fn written(&self) -> usize {
        self.outputs
            .iter()
            .filter(|(_, o)| *o == WriteOutcome::Written)
            .count()
    }
}

/// A backend that renders and writes its output files.
pub trait Generator {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Render and write all outputs. With `force`, unchanged files are
    /// rewritten too.
    fn generate(&self, force: bool) -> Result<GenerateReport>;
}
