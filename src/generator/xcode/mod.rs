//! Xcode project generation.
//!
//! The generator never builds a project from scratch. It parses a template
//! `project.pbxproj`, removes the file references a previous run (or the
//! template author) left in the main group, inserts the project's files and
//! references, and stamps build settings, product types and names onto the
//! template's targets. Object keys for everything it creates are derived from
//! relative paths, so regenerating an unchanged project is byte-identical.

mod group_tree;
pub mod plist;

pub use group_tree::{split_components, GroupTree};
pub use plist::{Dict, PlistError, Value};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{
    Architecture, Compiler, Configuration, ConfigurationType, File, FileType, OperatingSystem,
    Project, ProjectReference, TargetType, Toolchain,
};
use crate::generator::{GenerateError, GenerateReport, Generator};
use crate::resolver::{AxisQuery, Resolver};
use crate::util::fs::{write_if_changed, TextEncoding};
use crate::util::hash::{hash_for_path, OBJECT_KEY_LEN};
use crate::util::path::{component_count, normalize, relative_to, to_unix};

const BACKEND: &str = "xcode";

/// Xcode project generator for one target operating system.
#[derive(Debug, Clone)]
pub struct XcodeGenerator<'a> {
    project: &'a Project,
    references: &'a [ProjectReference],
    input_dir: PathBuf,
    output_dir: PathBuf,
    template: &'a str,
    host_os: OperatingSystem,
    host_arch: Architecture,
    target_os: OperatingSystem,
    development_team: Option<String>,
}

impl<'a> XcodeGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project: &'a Project,
        references: &'a [ProjectReference],
        input_dir: &Path,
        output_dir: &Path,
        template: &'a str,
        host_os: OperatingSystem,
        host_arch: Architecture,
        target_os: OperatingSystem,
    ) -> Self {
        XcodeGenerator {
            project,
            references,
            input_dir: normalize(input_dir),
            output_dir: normalize(output_dir),
            template,
            host_os,
            host_arch,
            target_os,
            development_team: None,
        }
    }

    /// Team used to sign iOS executables and dynamic libraries.
    pub fn with_development_team(mut self, team: Option<String>) -> Self {
        self.development_team = team.filter(|t| !t.is_empty());
        self
    }

    /// The single architecture settings are resolved for.
    pub fn target_arch(&self) -> Architecture {
        match self.target_os {
            OperatingSystem::Ios => Architecture::Arm64V8a,
            _ => Architecture::X86_64,
        }
    }

    /// Path of the generated `project.pbxproj`.
    pub fn pbxproj_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.xcodeproj", self.project.name))
            .join("project.pbxproj")
    }

    fn query(&self) -> AxisQuery {
        AxisQuery::new()
            .target_type(self.project.target_type)
            .toolchain(Toolchain::XCode)
            .compiler(Compiler::Clang)
            .host(self.host_os, self.host_arch)
            .target_os(self.target_os)
            .target_arch(self.target_arch())
    }

    /// Relative path from the project's base directory, as group-tree components.
    fn components(&self, path: &Path) -> Vec<String> {
        split_components(&self.relative(path))
    }

    fn relative(&self, path: &Path) -> String {
        to_unix(&relative_to(path, &self.output_dir))
    }

    /// Render the project text.
    pub fn render(&self) -> Result<String> {
        let sdk_root = match self.target_os {
            OperatingSystem::Mac => "macosx",
            OperatingSystem::Ios => "iphoneos",
            other => {
                return Err(
                    GenerateError::unsupported(BACKEND, "target operating system", other).into(),
                )
            }
        };

        let mut document =
            plist::parse(self.template).context("failed to parse the Xcode project template")?;
        let root = document
            .as_dict_mut()
            .ok_or_else(|| unexpected("<document>", "template", "dictionary"))?;
        let root_key = str_field(root, "rootObject", "template")?.to_string();
        let objects = match root.get_mut("objects") {
            Some(Value::Dict(objects)) => objects,
            Some(_) => return Err(unexpected("objects", "template", "dictionary").into()),
            None => return Err(GenerateError::missing("objects", "template").into()),
        };
        group_tree::validate_references(objects, &root_key)?;

        let project_object = dict_field(objects, &root_key)?;
        let main_group = str_field(project_object, "mainGroup", "root object")?.to_string();
        let targets = string_list(project_object, "targets", "root object")?;
        let project_configurations = {
            let list = str_field(project_object, "buildConfigurationList", "root object")?;
            string_list(dict_field(objects, list)?, "buildConfigurations", list)?
        };

        group_tree::prune(objects, &main_group);
        strip_stale_build_files(objects, &targets)?;
        group_tree::validate_references(objects, &root_key)?;

        let resolver = Resolver::new(&self.project.configurations);
        let query = self.query();

        let mut tree = GroupTree::new(objects, main_group);
        for conf in resolver.matches(&query) {
            for file in &conf.files {
                let components = self.components(&file.path);
                if tree.contains(&components.join("/")) {
                    continue;
                }
                tree.insert_file(&components, last_known_file_type(file))?;
            }
        }
        for reference in self.references {
            tree.insert_reference(&reference.name)?;
        }
        let paths = tree.into_paths();

        let phase_conf = resolver.merge(&query);
        let product = self.project.product_name();
        for target_key in &targets {
            let target = dict_field(objects, target_key)?;
            let template_name = str_field(target, "name", target_key)?.to_string();
            let phases = string_list(target, "buildPhases", target_key)?;
            let product_reference = str_field(target, "productReference", target_key)?.to_string();
            let configurations = {
                let list = str_field(target, "buildConfigurationList", target_key)?;
                string_list(dict_field(objects, list)?, "buildConfigurations", list)?
            };

            for configuration_key in &configurations {
                let config_type = configuration_type(objects, configuration_key)?;
                let conf = resolver.merge(&query.configuration_type(config_type));
                let settings = build_settings(objects, configuration_key)?;
                self.stamp_target_settings(settings, &conf);
            }

            for phase_key in &phases {
                let phase_paths: Vec<String> =
                    match isa(dict_field(objects, phase_key)?) {
                        Some("PBXSourcesBuildPhase") => phase_conf
                            .files
                            .iter()
                            .filter(|f| f.file_type.is_source())
                            .map(|f| self.components(&f.path).join("/"))
                            .collect(),
                        Some("PBXFrameworksBuildPhase") => self
                            .references
                            .iter()
                            .map(|r| format!("Frameworks/{}", r.name))
                            .collect(),
                        _ => continue,
                    };
                for path in phase_paths {
                    let file_ref = paths
                        .get(&path)
                        .ok_or_else(|| GenerateError::Unplaceable { path: path.clone() })?;
                    let key = hash_for_path(&format!("{}:{}", template_name, path), OBJECT_KEY_LEN);
                    if objects.contains_key(&key) {
                        tracing::debug!("{} is already built by {}", path, template_name);
                        continue;
                    }
                    let mut build_file = Dict::new();
                    build_file.insert("fileRef".into(), Value::string(file_ref.as_str()));
                    build_file.insert("isa".into(), Value::string("PBXBuildFile"));
                    objects.insert(key.clone(), Value::Dict(build_file));
                    list_field_mut(objects, phase_key, "files")?.push(Value::string(key));
                }
            }

            let (product_type, file_type, product_path) = match self.project.target_type {
                TargetType::Executable if self.target_os == OperatingSystem::Mac => (
                    "com.apple.product-type.tool",
                    "compiled.mach-o.executable",
                    product.to_string(),
                ),
                TargetType::Executable => (
                    "com.apple.product-type.application",
                    "wrapper.application",
                    format!("{}.app", product),
                ),
                TargetType::StaticLibrary => (
                    "com.apple.product-type.library.static",
                    "archive.ar",
                    format!("lib{}.a", product),
                ),
                TargetType::DynamicLibrary => (
                    "com.apple.product-type.library.dynamic",
                    "compiled.mach-o.dylib",
                    format!("lib{}.dylib", product),
                ),
            };
            let target = dict_field_mut(objects, target_key)?;
            target.insert("name".into(), Value::string(self.project.name.as_str()));
            target.insert("productName".into(), Value::string(product));
            target.insert("productType".into(), Value::string(product_type));

            let product_file = dict_field_mut(objects, &product_reference)?;
            product_file.insert("explicitFileType".into(), Value::string(file_type));
            product_file.insert("path".into(), Value::string(product_path));
        }

        for configuration_key in &project_configurations {
            configuration_type(objects, configuration_key)?;
            let settings = build_settings(objects, configuration_key)?;
            settings.insert("SDKROOT".into(), Value::string(sdk_root));
        }

        group_tree::validate_references(objects, &root_key)?;
        Ok(plist::to_string(&document))
    }

    fn stamp_target_settings(&self, settings: &mut Dict, conf: &Configuration) {
        let target_type = self.project.target_type;
        let linked = target_type.is_linked();
        let mut set = |key: &str, value: &str| {
            settings.insert(key.to_string(), Value::string(value));
        };

        set("PRODUCT_NAME", self.project.product_name());
        match self.target_os {
            OperatingSystem::Mac if target_type == TargetType::DynamicLibrary => {
                set("EXECUTABLE_PREFIX", "lib");
            }
            OperatingSystem::Ios => {
                if let Some(team) = self.development_team.as_deref().filter(|_| linked) {
                    set("CODE_SIGN_IDENTITY", "iPhone Developer");
                    set("DEVELOPMENT_TEAM", team);
                    set("PROVISIONING_PROFILE_SPECIFIER", "");
                }
                if target_type == TargetType::DynamicLibrary {
                    set("DYLIB_COMPATIBILITY_VERSION", "1");
                    set("DYLIB_CURRENT_VERSION", "1");
                    set("DYLIB_INSTALL_NAME_BASE", "@rpath");
                    set("INSTALL_PATH", "$(LOCAL_LIBRARY_DIR)/Frameworks");
                    set(
                        "LD_RUNPATH_SEARCH_PATHS",
                        "$(inherited) @executable_path/Frameworks @loader_path/Frameworks",
                    );
                    set("SKIP_INSTALL", "YES");
                }
                if linked {
                    let info_plist = self.input_dir.join("Info.plist");
                    if info_plist.is_file() {
                        set("INFOPLIST_FILE", &self.relative(&info_plist));
                    }
                    if let Some(bundle_id) = conf.options.get("BundleIdentifier") {
                        set("PRODUCT_BUNDLE_IDENTIFIER", bundle_id);
                    }
                    set("TARGETED_DEVICE_FAMILY", "1,2");
                }
            }
            _ => {}
        }

        let includes = conf
            .include_directories
            .iter()
            .map(|d| self.relative(d))
            .collect();
        set_list(settings, "HEADER_SEARCH_PATHS", includes);
        let defines = conf.defines.iter().map(|d| d.to_string()).collect();
        set_list(settings, "GCC_PREPROCESSOR_DEFINITIONS", defines);

        let c_flags: Vec<String> = conf
            .common_flags
            .iter()
            .chain(&conf.c_flags)
            .cloned()
            .collect();
        let cpp_flags = c_flags.iter().chain(&conf.cpp_flags).cloned().collect();
        set_list(settings, "OTHER_CFLAGS", c_flags);
        set_list(settings, "OTHER_CPLUSPLUSFLAGS", cpp_flags);

        if linked {
            let lib_dirs = conf.lib_directories.iter().map(|d| self.relative(d)).collect();
            set_list(settings, "LIBRARY_SEARCH_PATHS", lib_dirs);
            let ld_flags = conf
                .libs
                .iter()
                .map(|lib| {
                    if component_count(lib) == 1 {
                        format!("-l{}", to_unix(lib))
                    } else {
                        self.relative(lib)
                    }
                })
                .chain(conf.linker_flags.iter().cloned())
                .collect();
            set_list(settings, "OTHER_LDFLAGS", ld_flags);
        }
    }
}

impl Generator for XcodeGenerator<'_> {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn generate(&self, force: bool) -> Result<GenerateReport> {
        let text = self.render()?;
        let path = self.pbxproj_path();
        let outcome = write_if_changed(&path, &text, TextEncoding::Utf8, force)?;

        let mut report = GenerateReport::default();
        report.record(path, outcome);
        Ok(report)
    }
}

fn last_known_file_type(file: &File) -> Option<&'static str> {
    let name = file
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match file.file_type {
        FileType::Header => {
            if [".hpp", ".hh", ".hxx"].iter().any(|ext| name.ends_with(ext)) {
                Some("sourcecode.cpp.h")
            } else {
                Some("sourcecode.c.h")
            }
        }
        FileType::CSource => Some("sourcecode.c.c"),
        FileType::CppSource => Some("sourcecode.cpp.cpp"),
        FileType::ObjectiveCSource => Some("sourcecode.c.objc"),
        FileType::ObjectiveCppSource => Some("sourcecode.cpp.objcpp"),
        FileType::Unknown if name.ends_with("info.plist") => Some("text.plist.xml"),
        FileType::Unknown => None,
    }
}

/// Write a list setting followed by `$(inherited)`; empty lists are skipped.
fn set_list(settings: &mut Dict, key: &str, mut values: Vec<String>) {
    if values.is_empty() {
        return;
    }
    values.push("$(inherited)".to_string());
    settings.insert(key.to_string(), Value::strings(values));
}

/// Remove build files whose file reference was pruned from sources phases.
fn strip_stale_build_files(objects: &mut Dict, targets: &[String]) -> Result<(), GenerateError> {
    for target_key in targets {
        let phases = string_list(dict_field(objects, target_key)?, "buildPhases", target_key)?;
        for phase_key in &phases {
            let phase = dict_field(objects, phase_key)?;
            if isa(phase) != Some("PBXSourcesBuildPhase") {
                continue;
            }
            let (stale, kept): (Vec<String>, Vec<String>) = string_list(phase, "files", phase_key)?
                .into_iter()
                .partition(|file| {
                    objects
                        .get(file)
                        .and_then(Value::as_dict)
                        .filter(|f| isa(f) == Some("PBXBuildFile"))
                        .and_then(|f| f.get("fileRef"))
                        .and_then(Value::as_str)
                        .is_some_and(|file_ref| !objects.contains_key(file_ref))
                });
            for key in &stale {
                objects.remove(key);
            }
            if !stale.is_empty() {
                tracing::debug!("dropped {} stale build files from {}", stale.len(), phase_key);
            }
            dict_field_mut(objects, phase_key)?.insert("files".into(), Value::strings(kept));
        }
    }
    Ok(())
}

fn isa(dict: &Dict) -> Option<&str> {
    dict.get("isa").and_then(Value::as_str)
}

fn unexpected(field: &str, location: &str, expected: &'static str) -> GenerateError {
    GenerateError::UnexpectedValue {
        field: field.to_string(),
        location: location.to_string(),
        expected,
    }
}

fn dict_field<'d>(objects: &'d Dict, key: &str) -> Result<&'d Dict, GenerateError> {
    match objects.get(key) {
        Some(Value::Dict(dict)) => Ok(dict),
        Some(_) => Err(unexpected(key, "objects", "dictionary")),
        None => Err(GenerateError::missing(key, "objects")),
    }
}

fn dict_field_mut<'d>(objects: &'d mut Dict, key: &str) -> Result<&'d mut Dict, GenerateError> {
    match objects.get_mut(key) {
        Some(Value::Dict(dict)) => Ok(dict),
        Some(_) => Err(unexpected(key, "objects", "dictionary")),
        None => Err(GenerateError::missing(key, "objects")),
    }
}

fn str_field<'d>(dict: &'d Dict, key: &str, location: &str) -> Result<&'d str, GenerateError> {
    match dict.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(unexpected(key, location, "string")),
        None => Err(GenerateError::missing(key, location)),
    }
}

fn string_list(dict: &Dict, key: &str, location: &str) -> Result<Vec<String>, GenerateError> {
    match dict.get(key) {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()),
        Some(_) => Err(unexpected(key, location, "list")),
        None => Err(GenerateError::missing(key, location)),
    }
}

fn list_field_mut<'d>(
    objects: &'d mut Dict,
    object: &str,
    key: &str,
) -> Result<&'d mut Vec<Value>, GenerateError> {
    match dict_field_mut(objects, object)?
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => Ok(items),
        _ => Err(unexpected(key, object, "list")),
    }
}

fn configuration_type(objects: &Dict, key: &str) -> Result<ConfigurationType, GenerateError> {
    let name = str_field(dict_field(objects, key)?, "name", key)?;
    name.parse()
        .map_err(|_| GenerateError::UnknownConfiguration {
            name: name.to_string(),
            location: format!("build configuration `{}`", key),
        })
}

fn build_settings<'d>(objects: &'d mut Dict, key: &str) -> Result<&'d mut Dict, GenerateError> {
    match dict_field_mut(objects, key)?
        .entry("buildSettings".to_string())
        .or_insert_with(|| Value::Dict(Dict::new()))
    {
        Value::Dict(settings) => Ok(settings),
        _ => Err(unexpected("buildSettings", key, "dictionary")),
    }
}
