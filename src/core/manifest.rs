//! typeforge.toml manifest parsing and schema.
//!
//! The manifest describes one project: its target, its configuration
//! fragments, per-file overrides and the projects it references. Relative
//! paths are resolved against the manifest's directory and file patterns are
//! expanded when the manifest is loaded, so generators only ever see absolute
//! paths.
//!
//! ```toml
//! [project]
//! name = "Lib"
//! target-type = "StaticLibrary"
//!
//! [[configuration]]
//! include-directories = ["include"]
//! files = ["src/**/*.cpp", "include/**/*.h"]
//!
//! [[configuration]]
//! matching-configuration-types = ["Release"]
//! defines = ["NDEBUG"]
//!
//! [[file]]
//! path = "src/special.cpp"
//! [[file.configuration]]
//! defines = ["SPECIAL"]
//!
//! [[reference]]
//! id = "8D7A0C3F-6F0E-4B5B-9C51-1B7D2C9E0A11"
//! name = "Base"
//! file-path = "../base/build/Base.vcxproj"
//! virtual-dir = "libs"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::axis::{
    Architecture, AxisFilter, Compiler, ConfigurationType, OperatingSystem, TargetType, Toolchain,
};
use crate::core::configuration::{Configuration, Define};
use crate::core::project::{File, Project, ProjectReference};
use crate::util::fs::expand_patterns;
use crate::util::hash::derive_guid;
use crate::util::path::{component_count, normalize};

/// A loaded project manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project: Project,
    /// Project GUID (no braces)
    pub id: String,
    pub references: Vec<ProjectReference>,
    /// Directory containing the manifest; the project's input directory
    pub manifest_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    project: RawProject,
    #[serde(default, rename = "configuration")]
    configurations: Vec<RawConfiguration>,
    #[serde(default, rename = "file")]
    files: Vec<RawFileOverride>,
    #[serde(default, rename = "reference")]
    references: Vec<RawReference>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawProject {
    name: String,
    target_type: TargetType,
    target_name: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct RawConfiguration {
    matching_target_types: AxisFilter<TargetType>,
    matching_toolchains: AxisFilter<Toolchain>,
    matching_compilers: AxisFilter<Compiler>,
    matching_host_operating_systems: AxisFilter<OperatingSystem>,
    matching_host_architectures: AxisFilter<Architecture>,
    matching_target_operating_systems: AxisFilter<OperatingSystem>,
    matching_target_architectures: AxisFilter<Architecture>,
    matching_configuration_types: AxisFilter<ConfigurationType>,

    include_directories: Vec<PathBuf>,
    defines: Vec<Define>,
    common_flags: Vec<String>,
    c_flags: Vec<String>,
    cpp_flags: Vec<String>,
    linker_flags: Vec<String>,
    options: BTreeMap<String, String>,
    lib_directories: Vec<PathBuf>,
    libs: Vec<PathBuf>,
    /// File patterns (globs or literal paths)
    files: Vec<String>,
    output_directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileOverride {
    path: String,
    #[serde(default, rename = "configuration")]
    configurations: Vec<RawConfiguration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawReference {
    id: String,
    name: String,
    file_path: PathBuf,
    #[serde(default)]
    virtual_dir: String,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content; `path` locates the manifest on disk.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        let manifest_dir = normalize(path.parent().unwrap_or(Path::new(".")));

        if raw.project.name.trim().is_empty() {
            anyhow::bail!("manifest at {} has an empty project name", path.display());
        }

        let mut overrides = Vec::new();
        for o in &raw.files {
            let paths = expand_patterns(&manifest_dir, std::slice::from_ref(&o.path))?;
            let confs = o
                .configurations
                .iter()
                .map(|c| convert_fragment(c, &manifest_dir, &[]))
                .collect::<Result<Vec<_>>>()?;
            overrides.push((paths, confs));
        }

        let mut configurations = Vec::with_capacity(raw.configurations.len());
        for (index, raw_conf) in raw.configurations.iter().enumerate() {
            let conf = convert_fragment(raw_conf, &manifest_dir, &overrides).with_context(|| {
                format!(
                    "invalid configuration #{} in {}",
                    index + 1,
                    path.display()
                )
            })?;
            configurations.push(conf);
        }

        let project = Project {
            name: raw.project.name,
            target_type: raw.project.target_type,
            target_name: raw.project.target_name,
            configurations,
        };

        let id = match raw.project.id {
            Some(id) => normalize_guid(&id),
            None => derive_guid(&format!("project:{}", project.name)),
        };

        let references = raw
            .references
            .into_iter()
            .map(|r| ProjectReference {
                id: normalize_guid(&r.id),
                name: r.name,
                file_path: absolutize(&manifest_dir, &r.file_path),
                virtual_dir: r.virtual_dir,
            })
            .collect();

        tracing::debug!(
            "loaded manifest for `{}` ({} fragments)",
            project.name,
            project.configurations.len()
        );

        Ok(Manifest {
            project,
            id,
            references,
            manifest_dir,
        })
    }
}

/// Strip braces and upper-case a GUID written by hand.
fn normalize_guid(id: &str) -> String {
    id.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_uppercase()
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    normalize(&base.join(path))
}

fn convert_fragment(
    raw: &RawConfiguration,
    base: &Path,
    overrides: &[(Vec<PathBuf>, Vec<Configuration>)],
) -> Result<Configuration> {
    let files = expand_patterns(base, &raw.files)?
        .into_iter()
        .map(|path| {
            let path = normalize(&path);
            let mut file = File::new(path.clone());
            for (paths, confs) in overrides {
                if paths.iter().any(|p| normalize(p) == path) {
                    file.configurations.extend(confs.iter().cloned());
                }
            }
            file
        })
        .collect();

    Ok(Configuration {
        matching_target_types: raw.matching_target_types.clone(),
        matching_toolchains: raw.matching_toolchains.clone(),
        matching_compilers: raw.matching_compilers.clone(),
        matching_host_operating_systems: raw.matching_host_operating_systems.clone(),
        matching_host_architectures: raw.matching_host_architectures.clone(),
        matching_target_operating_systems: raw.matching_target_operating_systems.clone(),
        matching_target_architectures: raw.matching_target_architectures.clone(),
        matching_configuration_types: raw.matching_configuration_types.clone(),
        include_directories: raw
            .include_directories
            .iter()
            .map(|d| absolutize(base, d))
            .collect(),
        defines: raw.defines.clone(),
        common_flags: raw.common_flags.clone(),
        c_flags: raw.c_flags.clone(),
        cpp_flags: raw.cpp_flags.clone(),
        linker_flags: raw.linker_flags.clone(),
        options: raw.options.clone(),
        lib_directories: raw
            .lib_directories
            .iter()
            .map(|d| absolutize(base, d))
            .collect(),
        // A bare name (`pthread`) is a system library; anything with a
        // directory part is a file relative to the manifest.
        libs: raw
            .libs
            .iter()
            .map(|l| {
                if component_count(l) <= 1 {
                    l.clone()
                } else {
                    absolutize(base, l)
                }
            })
            .collect(),
        files,
        output_directory: raw.output_directory.as_ref().map(|d| absolutize(base, d)),
    })
}
