//! Reading and writing the Visual Studio solution text format.
//!
//! Only the structure the generator edits is modeled: project entries and
//! `Global` sections with ordered properties. Header lines and the lines
//! nested inside a project block are kept verbatim.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^Project\("([^"]*)"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)"\s*,\s*"([^"]*)"\s*$"#)
        .unwrap()
});

static SECTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GlobalSection\(([^)]*)\)\s*=\s*(\S+)\s*$").unwrap()
});

#[derive(Debug, Error)]
#[error("invalid solution template at line {line}: {message}")]
pub struct SlnError {
    pub line: usize,
    pub message: String,
}

impl SlnError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        SlnError {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlnProject {
    pub type_guid: String,
    pub name: String,
    pub file_path: String,
    pub id: String,
    /// Lines between `Project(...)` and `EndProject`
    pub body: Vec<String>,
}

impl SlnProject {
    pub fn new(
        type_guid: impl Into<String>,
        name: impl Into<String>,
        file_path: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        SlnProject {
            type_guid: type_guid.into(),
            name: name.into(),
            file_path: file_path.into(),
            id: id.into(),
            body: Vec::new(),
        }
    }
}

/// A `GlobalSection(<id>) = <kind>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlnSection {
    pub id: String,
    /// `preSolution` or `postSolution`
    pub kind: String,
    pub properties: Vec<(String, String)>,
}

impl SlnSection {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        SlnSection {
            id: id.into(),
            kind: kind.into(),
            properties: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key` in place, or append it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlnFile {
    /// Lines before the first project or `Global`, including the leading blank line
    pub header: Vec<String>,
    pub projects: Vec<SlnProject>,
    pub sections: Vec<SlnSection>,
}

enum State {
    Top,
    Project,
    Global,
    Section,
    Done,
}

impl SlnFile {
    pub fn parse(text: &str) -> Result<Self, SlnError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut file = SlnFile::default();
        let mut state = State::Top;
        let mut line_no = 0;

        for raw in text.lines() {
            line_no += 1;
            let line = raw.trim();
            match state {
                State::Top => {
                    if let Some(caps) = PROJECT_LINE.captures(line) {
                        file.projects
                            .push(SlnProject::new(&caps[1], &caps[2], &caps[3], &caps[4]));
                        state = State::Project;
                    } else if line == "Global" {
                        state = State::Global;
                    } else if file.projects.is_empty() {
                        file.header.push(raw.to_string());
                    } else if !line.is_empty() {
                        return Err(SlnError::new(line_no, format!("unexpected `{}`", line)));
                    }
                }
                State::Project => {
                    if line == "EndProject" {
                        state = State::Top;
                    } else if let Some(project) = file.projects.last_mut() {
                        project.body.push(raw.to_string());
                    }
                }
                State::Global => {
                    if line == "EndGlobal" {
                        state = State::Done;
                    } else if let Some(caps) = SECTION_LINE.captures(line) {
                        file.sections.push(SlnSection::new(&caps[1], &caps[2]));
                        state = State::Section;
                    } else if !line.is_empty() {
                        return Err(SlnError::new(line_no, format!("unexpected `{}`", line)));
                    }
                }
                State::Section => {
                    if line == "EndGlobalSection" {
                        state = State::Global;
                    } else if let Some(section) = file.sections.last_mut() {
                        match line.split_once(" = ") {
                            Some((key, value)) => section.set(key.trim(), value.trim()),
                            None if line.is_empty() => {}
                            None => {
                                return Err(SlnError::new(
                                    line_no,
                                    format!("expected `key = value`, found `{}`", line),
                                ))
                            }
                        }
                    }
                }
                State::Done => {
                    if !line.is_empty() {
                        return Err(SlnError::new(
                            line_no,
                            format!("unexpected `{}` after EndGlobal", line),
                        ));
                    }
                }
            }
        }

        match state {
            State::Top | State::Done => Ok(file),
            State::Project => Err(SlnError::new(line_no, "missing EndProject")),
            State::Global | State::Section => Err(SlnError::new(line_no, "missing EndGlobal")),
        }
    }

    pub fn section(&self, id: &str) -> Option<&SlnSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut SlnSection> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Serialize with CRLF line endings.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut line = |text: &str| {
            out.push_str(text);
            out.push_str("\r\n");
        };

        for header in &self.header {
            line(header);
        }
        for project in &self.projects {
            line(&format!(
                "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
                project.type_guid, project.name, project.file_path, project.id
            ));
            for body in &project.body {
                line(body);
            }
            line("EndProject");
        }
        line("Global");
        for section in &self.sections {
            line(&format!("\tGlobalSection({}) = {}", section.id, section.kind));
            for (key, value) in &section.properties {
                line(&format!("\t\t{} = {}", key, value));
            }
            line("\tEndGlobalSection");
        }
        line("EndGlobal");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sln;

    #[test]
    fn test_parse_template() {
        let file = SlnFile::parse(sln::TEMPLATE).unwrap();
        assert_eq!(file.header.len(), 5);
        assert_eq!(file.header[0], "");
        assert!(file.header[1].starts_with("Microsoft Visual Studio Solution File"));

        assert_eq!(file.projects.len(), 1);
        let project = &file.projects[0];
        assert_eq!(project.name, "Stale");
        assert_eq!(project.file_path, "Stale.vcxproj");
        assert_eq!(project.id, sln::STALE_PROJECT);

        let ids: Vec<&str> = file.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "SolutionConfigurationPlatforms",
                "ProjectConfigurationPlatforms",
                "SolutionProperties",
                "ExtensibilityGlobals",
            ]
        );
        let configs = file.section("SolutionConfigurationPlatforms").unwrap();
        assert_eq!(configs.kind, "preSolution");
        assert_eq!(configs.get("Debug|x86"), Some("Debug|x86"));
    }

    #[test]
    fn test_project_body_kept() {
        let text = "Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Docs\", \"Docs\", \"{C}\"\r\n\
\tProjectSection(SolutionItems) = preProject\r\n\
\t\treadme.md = readme.md\r\n\
\tEndProjectSection\r\n\
EndProject\r\n\
Global\r\n\
EndGlobal\r\n";
        let file = SlnFile::parse(text).unwrap();
        assert_eq!(file.projects[0].body.len(), 3);
        assert_eq!(file.to_text(), text);
    }

    #[test]
    fn test_write_uses_crlf() {
        let file = SlnFile::parse(sln::TEMPLATE).unwrap();
        let text = file.to_text();
        assert!(text.starts_with("\r\nMicrosoft Visual Studio Solution File"));
        assert!(text.contains("\tGlobalSection(SolutionProperties) = preSolution\r\n\t\tHideSolutionNode = FALSE\r\n"));
        assert!(text.ends_with("EndGlobal\r\n"));
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
        assert_eq!(SlnFile::parse(&text).unwrap(), file);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut section = SlnSection::new("NestedProjects", "preSolution");
        section.set("{A}", "{B}");
        section.set("{C}", "{D}");
        section.set("{A}", "{E}");
        assert_eq!(
            section.properties,
            vec![("{A}".to_string(), "{E}".to_string()), ("{C}".to_string(), "{D}".to_string())]
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = SlnFile::parse("Global\n\tGlobalSection(X) = preSolution\n").unwrap_err();
        assert!(err.message.contains("EndGlobal"));

        let err = SlnFile::parse("Global\n\tGlobalSection(X) = preSolution\n\t\tbroken\n")
            .unwrap_err();
        assert_eq!(err.line, 3);
    }
}
