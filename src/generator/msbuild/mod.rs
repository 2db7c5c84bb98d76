//! Visual Studio C++ project generation.
//!
//! Writes `<name>.vcxproj` and its `<name>.vcxproj.filters` sidecar from two
//! templates. Hand-authored parts of the templates (labeled item groups,
//! imports, property groups the generator does not own) are kept; generated
//! items from an earlier run are removed and rebuilt.

mod filters;
mod vcxproj;
pub mod xml;

pub use xml::{Document, Element, XmlError};

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::{
    Architecture, Compiler, FileType, OperatingSystem, Project, ProjectReference, TargetType,
    Toolchain,
};
use crate::generator::{GenerateReport, Generator};
use crate::resolver::AxisQuery;
use crate::util::fs::{write_if_changed, TextEncoding};
use crate::util::path::{normalize, relative_to, to_windows};

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// MSBuild platform name for an architecture.
pub fn platform_name(arch: Architecture) -> &'static str {
    match arch {
        Architecture::X86 => "Win32",
        Architecture::X86_64 => "x64",
        Architecture::ArmeabiV7a => "ARM",
        Architecture::Arm64V8a => "ARM64",
    }
}

/// MSBuild `ConfigurationType` for a target type.
pub fn configuration_type_name(target_type: TargetType) -> &'static str {
    match target_type {
        TargetType::Executable => "Application",
        TargetType::StaticLibrary => "StaticLibrary",
        TargetType::DynamicLibrary => "DynamicLibrary",
    }
}

/// Quote a value for `PreprocessorDefinitions`: numbers stay bare, anything
/// else is quoted with embedded quotes removed.
fn quote_define_value(value: &str) -> String {
    if NUMERIC.is_match(value) {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', ""))
    }
}

/// Quote a flag for `AdditionalOptions`: numbers stay bare, anything else is
/// quoted with embedded quotes doubled.
fn quote_option(flag: &str) -> String {
    if NUMERIC.is_match(flag) {
        flag.to_string()
    } else {
        format!("\"{}\"", flag.replace('"', "\"\""))
    }
}

/// Item element name for a file.
fn item_name(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Header => "ClInclude",
        FileType::CSource | FileType::CppSource => "ClCompile",
        _ => "None",
    }
}

/// Remove generated items from every `ItemGroup` without a `Label`, then drop
/// groups left with neither children nor attributes.
fn strip_generated_items(root: &mut Element, generated: &[&str]) {
    root.retain_elements(|group| {
        if group.name != "ItemGroup" || group.attr("Label").is_some() {
            return true;
        }
        group.retain_elements(|item| !generated.contains(&item.name.as_str()));
        group.has_elements() || !group.attributes.is_empty()
    });
}

/// Visual Studio project generator.
#[derive(Debug, Clone)]
pub struct VcxprojGenerator<'a> {
    project: &'a Project,
    project_id: String,
    references: &'a [ProjectReference],
    input_dir: PathBuf,
    output_dir: PathBuf,
    project_template: &'a str,
    filters_template: &'a str,
    host_os: OperatingSystem,
    host_arch: Architecture,
    target_os: OperatingSystem,
}

impl<'a> VcxprojGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project: &'a Project,
        project_id: &str,
        references: &'a [ProjectReference],
        input_dir: &Path,
        output_dir: &Path,
        project_template: &'a str,
        filters_template: &'a str,
        host_os: OperatingSystem,
        host_arch: Architecture,
        target_os: OperatingSystem,
    ) -> Self {
        VcxprojGenerator {
            project,
            project_id: project_id.to_uppercase(),
            references,
            input_dir: normalize(input_dir),
            output_dir: normalize(output_dir),
            project_template,
            filters_template,
            host_os,
            host_arch,
            target_os,
        }
    }

    pub fn vcxproj_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.vcxproj", self.project.name))
    }

    pub fn filters_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.vcxproj.filters", self.project.name))
    }

    /// Every axis but architecture and configuration type, which the
    /// project file iterates.
    fn query(&self) -> AxisQuery {
        AxisQuery::new()
            .target_type(self.project.target_type)
            .toolchain(Toolchain::VisualStudio)
            .compiler(Compiler::VisualCpp)
            .host(self.host_os, self.host_arch)
            .target_os(self.target_os)
    }

    /// Path relative to the output directory, `\` separated.
    fn relative(&self, path: &Path) -> String {
        to_windows(&relative_to(path, &self.output_dir))
    }
}

impl Generator for VcxprojGenerator<'_> {
    fn name(&self) -> &'static str {
        "vcxproj"
    }

    fn generate(&self, force: bool) -> Result<GenerateReport> {
        let project = self.render_project()?;
        let filters = self.render_filters()?;

        let mut report = GenerateReport::default();
        for (path, text) in [(self.vcxproj_path(), project), (self.filters_path(), filters)] {
            let outcome = write_if_changed(&path, &text, TextEncoding::Utf8Bom, force)?;
            report.record(path, outcome);
        }
        Ok(report)
    }
}
