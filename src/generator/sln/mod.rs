//! Visual Studio solution generation.
//!
//! The solution lists every referenced project, maps each solution
//! configuration onto the projects, and mirrors the references' virtual
//! directories as solution folders.

pub mod file;

pub use file::{SlnError, SlnFile, SlnProject, SlnSection};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::ProjectReference;
use crate::generator::{GenerateReport, Generator};
use crate::util::fs::{write_if_changed, TextEncoding};
use crate::util::hash::derive_guid;
use crate::util::path::{normalize, relative_to, to_windows};

/// Project type of a Visual C++ project.
pub const CPP_PROJECT_TYPE: &str = "{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}";
/// Project type of a solution folder.
pub const FOLDER_PROJECT_TYPE: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

const PROJECT_CONFIGURATIONS: &str = "ProjectConfigurationPlatforms";
const SOLUTION_CONFIGURATIONS: &str = "SolutionConfigurationPlatforms";
const NESTED_PROJECTS: &str = "NestedProjects";
const EXTENSIBILITY_GLOBALS: &str = "ExtensibilityGlobals";

fn braced(guid: &str) -> String {
    format!("{{{}}}", guid)
}

/// Solution folders, in registration order, compared case-insensitively.
#[derive(Debug, Default)]
struct Folders {
    entries: Vec<(String, String)>,
}

impl Folders {
    fn guid(&self, folder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f.eq_ignore_ascii_case(folder))
            .map(|(_, g)| g.as_str())
    }

    /// Register `folder` and its ancestors, nesting each new folder under its
    /// parent. Returns the GUID of `folder`.
    fn register(&mut self, folder: &str, nested: &mut SlnSection) -> String {
        let mut current = folder;
        while !current.is_empty() && self.guid(current).is_none() {
            let guid = derive_guid(current);
            let parent = current.rfind('\\').map_or("", |i| &current[..i]);
            if !parent.is_empty() {
                let parent_guid = self
                    .guid(parent)
                    .map_or_else(|| derive_guid(parent), str::to_string);
                nested.set(braced(&guid), braced(&parent_guid));
            }
            tracing::debug!("solution folder {}", current);
            self.entries.push((current.to_string(), guid));
            current = parent;
        }
        self.guid(folder).map_or_else(|| derive_guid(folder), str::to_string)
    }
}

/// Solution generator.
#[derive(Debug, Clone)]
pub struct SlnGenerator<'a> {
    solution_name: &'a str,
    solution_id: String,
    references: &'a [ProjectReference],
    output_dir: PathBuf,
    template: &'a str,
}

impl<'a> SlnGenerator<'a> {
    pub fn new(
        solution_name: &'a str,
        solution_id: &str,
        references: &'a [ProjectReference],
        output_dir: &Path,
        template: &'a str,
    ) -> Self {
        SlnGenerator {
            solution_name,
            solution_id: solution_id.to_uppercase(),
            references,
            output_dir: normalize(output_dir),
            template,
        }
    }

    pub fn sln_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.sln", self.solution_name))
    }

    /// Render the solution text.
    pub fn render(&self) -> Result<String> {
        let mut sln = SlnFile::parse(self.template).context("failed to parse the sln template")?;
        sln.projects.clear();

        let configurations: Vec<(String, String)> = match sln.section(SOLUTION_CONFIGURATIONS) {
            Some(section) => section.properties.clone(),
            None => {
                tracing::warn!("sln template declares no solution configurations");
                Vec::new()
            }
        };

        let mut project_configurations = SlnSection::new(PROJECT_CONFIGURATIONS, "postSolution");
        let mut nested = SlnSection::new(NESTED_PROJECTS, "preSolution");
        let mut folders = Folders::default();

        for reference in self.references {
            let id = braced(&reference.id.to_uppercase());
            sln.projects.push(SlnProject::new(
                CPP_PROJECT_TYPE,
                reference.name.as_str(),
                to_windows(&relative_to(&reference.file_path, &self.output_dir)),
                id.as_str(),
            ));

            for (key, value) in &configurations {
                let value = value.replace("|x86", "|Win32");
                project_configurations.set(format!("{}.{}.ActiveCfg", id, key), value.as_str());
                project_configurations.set(format!("{}.{}.Build.0", id, key), value);
            }

            let dir = reference.virtual_dir.replace('/', "\\");
            let dir = dir.trim_matches('\\');
            if !dir.is_empty() {
                let folder = folders.register(dir, &mut nested);
                nested.set(id.as_str(), braced(&folder));
            }
        }

        for (folder, guid) in &folders.entries {
            let name = folder.rsplit('\\').next().unwrap_or(folder.as_str());
            sln.projects
                .push(SlnProject::new(FOLDER_PROJECT_TYPE, name, name, braced(guid)));
        }

        replace_section(&mut sln, project_configurations, Some(SOLUTION_CONFIGURATIONS));
        replace_section(&mut sln, nested, None);

        let solution_guid = braced(&self.solution_id);
        match sln.section_mut(EXTENSIBILITY_GLOBALS) {
            Some(section) => section.set("SolutionGuid", solution_guid),
            None => {
                let mut section = SlnSection::new(EXTENSIBILITY_GLOBALS, "postSolution");
                section.set("SolutionGuid", solution_guid);
                sln.sections.push(section);
            }
        }

        Ok(sln.to_text())
    }
}

/// Swap in a regenerated section, keeping the template's position and kind.
///
/// A section the template lacks goes after `after` when given, otherwise
/// before `ExtensibilityGlobals`, otherwise last.
fn replace_section(sln: &mut SlnFile, mut section: SlnSection, after: Option<&str>) {
    if let Some(existing) = sln.section_mut(&section.id) {
        section.kind = std::mem::take(&mut existing.kind);
        *existing = section;
        return;
    }
    let position = match after {
        Some(id) => sln.sections.iter().position(|s| s.id == id).map(|i| i + 1),
        None => sln
            .sections
            .iter()
            .position(|s| s.id == EXTENSIBILITY_GLOBALS),
    };
    let index = position.unwrap_or(sln.sections.len());
    sln.sections.insert(index, section);
}

impl Generator for SlnGenerator<'_> {
    fn name(&self) -> &'static str {
        "sln"
    }

    fn generate(&self, force: bool) -> Result<GenerateReport> {
        let text = self.render()?;
        let path = self.sln_path();
        let outcome = write_if_changed(&path, &text, TextEncoding::Utf8Bom, force)?;

        let mut report = GenerateReport::default();
        report.record(path, outcome);
        Ok(report)
    }
}
