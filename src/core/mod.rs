//! Core data model: axes, configuration fragments, projects.

pub mod axis;
pub mod configuration;
pub mod manifest;
pub mod project;

pub use axis::{
    Architecture, AxisFilter, Compiler, ConfigurationType, OperatingSystem, ParseAxisError,
    TargetType, Toolchain,
};
pub use configuration::{Configuration, Define};
pub use manifest::Manifest;
pub use project::{File, FileType, Project, ProjectReference};
