//! Ninja build script generation.
//!
//! Produces `<output>/<project>.ninja` for one fully pinned axis tuple. The
//! script only declares variables and build edges; the `cc`, `cxx`, `ar` and
//! `link` rules (and how they use `$commonflags`, `$cflags`, `$cxxflags`,
//! `$fileflags`, `$ldflags` and `$libs`) come from the enclosing build file
//! that includes it.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::{FileType, Project, ProjectReference, TargetType};
use crate::generator::{GenerateError, GenerateReport, Generator};
use crate::resolver::{AxisQuery, Resolver};
use crate::util::fs::{write_if_changed, TextEncoding};
use crate::util::path::{component_count, normalize, relative_to, to_unix};

static NEEDS_QUOTING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[ "^|]"#).unwrap());

/// Quote a flag for the shell-like command line ninja runs.
///
/// Tokens containing a space, `"`, `^` or `|` are wrapped in double quotes
/// with inner quotes escaped as `\"`; all others pass through unchanged.
pub fn escape_token(token: &str) -> String {
    if NEEDS_QUOTING.is_match(token) {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// Escape a path appearing in a `build` line.
fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '$' => out.push_str("$$"),
            ' ' => out.push_str("$ "),
            ':' => out.push_str("$:"),
            _ => out.push(c),
        }
    }
    out
}

/// Flat object path for a source: `<project>/<relative path with / and . as _>.o`.
pub fn object_path(project_name: &str, source_relative_to_input: &Path) -> String {
    let flat: String = to_unix(source_relative_to_input)
        .chars()
        .map(|c| if c == '/' || c == '.' { '_' } else { c })
        .collect();
    format!("{}/{}.o", project_name, flat)
}

/// Ninja script generator for one pinned axis tuple.
#[derive(Debug, Clone)]
pub struct NinjaGenerator<'a> {
    project: &'a Project,
    references: &'a [ProjectReference],
    input_dir: PathBuf,
    output_dir: PathBuf,
    query: AxisQuery,
}

impl<'a> NinjaGenerator<'a> {
    /// The query's target type is taken from the project; every other axis
    /// must be pinned.
    pub fn new(
        project: &'a Project,
        references: &'a [ProjectReference],
        input_dir: &Path,
        output_dir: &Path,
        query: AxisQuery,
    ) -> Self {
        NinjaGenerator {
            project,
            references,
            input_dir: normalize(input_dir),
            output_dir: normalize(output_dir),
            query: query.target_type(project.target_type),
        }
    }

    /// Path of the generated script.
    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.ninja", self.project.name))
    }

    fn pinned(&self) -> Result<(String, String), GenerateError> {
        let unpinned = |axis| GenerateError::UnpinnedAxis {
            backend: "ninja",
            axis,
        };
        if self.query.toolchain.is_none() {
            return Err(unpinned("toolchain"));
        }
        if self.query.compiler.is_none() {
            return Err(unpinned("compiler"));
        }
        if self.query.host_os.is_none() || self.query.host_arch.is_none() {
            return Err(unpinned("host"));
        }
        if self.query.target_os.is_none() {
            return Err(unpinned("target operating system"));
        }
        let arch = self
            .query
            .target_arch
            .ok_or_else(|| unpinned("target architecture"))?;
        let config = self
            .query
            .configuration_type
            .ok_or_else(|| unpinned("configuration type"))?;
        Ok((arch.to_string(), config.to_string()))
    }

    /// Render the script text.
    pub fn render(&self) -> Result<String> {
        let (arch, config) = self.pinned()?;
        let base = self.output_dir.as_path();
        let rel = |p: &Path| to_unix(&relative_to(p, base));

        let conf = Resolver::new(&self.project.configurations).merge(&self.query);
        let target_type = self.project.target_type;

        let mut lines = vec!["ninja_required_version = 1.3".to_string(), String::new()];

        let mut common_flags: Vec<String> = Vec::new();
        common_flags.extend(
            conf.include_directories
                .iter()
                .map(|d| escape_token(&format!("-I{}", rel(d)))),
        );
        common_flags.extend(conf.defines.iter().map(|d| escape_token(&format!("-D{}", d))));
        common_flags.extend(conf.common_flags.iter().map(|f| escape_token(f)));

        let c_flags: Vec<String> = conf.c_flags.iter().map(|f| escape_token(f)).collect();
        let cpp_flags: Vec<String> = conf.cpp_flags.iter().map(|f| escape_token(f)).collect();

        let default_out_dir = self.output_dir.join("..").join(format!("{}_{}", arch, config));
        let search_path = rel(&default_out_dir);

        let mut linker_flags: Vec<String> = Vec::new();
        let mut libs: Vec<String> = Vec::new();
        let mut dependencies: Vec<String> = Vec::new();
        if target_type.is_linked() {
            if target_type == TargetType::DynamicLibrary {
                linker_flags.push("-shared".to_string());
            }
            let mut search_paths = vec![search_path.clone()];
            for dir in &conf.lib_directories {
                let dir = rel(dir);
                if !search_paths.contains(&dir) {
                    search_paths.push(dir);
                }
            }
            linker_flags.extend(search_paths.iter().map(|d| escape_token(&format!("-L{}", d))));
            linker_flags.extend(conf.linker_flags.iter().map(|f| escape_token(f)));

            libs.push("-Wl,--start-group".to_string());
            for lib in &conf.libs {
                if component_count(lib) == 1 {
                    libs.push(escape_token(&format!("-l{}", to_unix(lib))));
                } else {
                    libs.push(escape_token(&rel(lib)));
                }
            }
            for reference in self.references {
                libs.push(escape_token(&format!("-l{}", reference.name)));
                dependencies.push(escape_path(&format!(
                    "{}/lib{}.a",
                    search_path, reference.name
                )));
            }
            libs.push("-Wl,--end-group".to_string());
        }

        lines.push(assignment("commonflags", &common_flags));
        lines.push(assignment("cflags", &c_flags));
        lines.push(assignment("cxxflags", &cpp_flags));
        lines.push(assignment("ldflags", &linker_flags));
        lines.push(assignment("libs", &libs));
        lines.push(String::new());

        let mut objects = Vec::new();
        for file in &conf.files {
            if !file.file_type.is_c_family_source() {
                continue;
            }

            let file_conf = Resolver::new(&file.configurations).merge(&self.query);
            let mut file_flags: Vec<String> = Vec::new();
            file_flags.extend(
                file_conf
                    .include_directories
                    .iter()
                    .map(|d| escape_token(&format!("-I{}", rel(d)))),
            );
            file_flags.extend(
                file_conf
                    .defines
                    .iter()
                    .map(|d| escape_token(&format!("-D{}", d))),
            );
            file_flags.extend(file_conf.common_flags.iter().map(|f| escape_token(f)));

            let (rule, language_flags) = match file.file_type {
                FileType::CSource => ("cc", &file_conf.c_flags),
                _ => ("cxx", &file_conf.cpp_flags),
            };
            file_flags.extend(language_flags.iter().map(|f| escape_token(f)));

            let object = escape_path(&object_path(
                &self.project.name,
                &relative_to(&file.path, &self.input_dir),
            ));
            lines.push(format!(
                "build {}: {} {}",
                object,
                rule,
                escape_path(&rel(&file.path))
            ));
            if !file_flags.is_empty() {
                lines.push(format!("  {}", assignment("fileflags", &file_flags)));
            }
            objects.push(object);
        }

        let product = self.project.product_name();
        let (target_file, rule) = match target_type {
            TargetType::Executable => (product.to_string(), "link"),
            TargetType::StaticLibrary => (format!("lib{}.a", product), "ar"),
            TargetType::DynamicLibrary => (format!("lib{}.so", product), "link"),
        };
        let target_dir = conf.output_directory.clone().unwrap_or(default_out_dir);
        let target_path = escape_path(&rel(&target_dir.join(target_file)));

        lines.push(String::new());
        let mut link = format!("build {}: {}", target_path, rule);
        for object in &objects {
            link.push(' ');
            link.push_str(object);
        }
        if !dependencies.is_empty() {
            link.push_str(" | ");
            link.push_str(&dependencies.join(" "));
        }
        lines.push(link);
        lines.push(String::new());

        Ok(lines.join("\n"))
    }
}

fn assignment(name: &str, values: &[String]) -> String {
    if values.is_empty() {
        format!("{} =", name)
    } else {
        format!("{} = {}", name, values.join(" "))
    }
}

impl Generator for NinjaGenerator<'_> {
    fn name(&self) -> &'static str {
        "ninja"
    }

    fn generate(&self, force: bool) -> Result<GenerateReport> {
        let text = self.render()?;
        let path = self.script_path();
        let outcome = write_if_changed(&path, &text, TextEncoding::Utf8, force)?;

        let mut report = GenerateReport::default();
        report.record(path, outcome);
        Ok(report)
    }
}
