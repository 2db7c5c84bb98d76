//! typeforge - generate Ninja, Xcode and Visual Studio project files from one
//! project description
//!
//! This crate provides the configuration model, the resolver that folds
//! axis-dependent settings into one effective configuration, and the backend
//! generators that reconcile those settings with IDE templates.

pub mod core;
pub mod generator;
pub mod resolver;
pub mod util;

/// Test fixtures and helpers for typeforge unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides template texts, manifests and common axis queries.
#[cfg(test)]
pub mod test_support;

pub use core::{Configuration, Manifest, Project, ProjectReference};
pub use generator::{GenerateError, GenerateReport, Generator};
pub use resolver::{AxisQuery, Resolver};
pub use util::context::GlobalContext;
