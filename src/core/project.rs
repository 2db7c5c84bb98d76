//! Projects, their files, and references between projects.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::axis::TargetType;
use super::configuration::Configuration;

/// Kind of a project file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    Header,
    CSource,
    CppSource,
    ObjectiveCSource,
    ObjectiveCppSource,
    Unknown,
}

impl FileType {
    /// Infer the file type from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "h" | "hh" | "hpp" | "hxx" | "inl" => FileType::Header,
            "c" => FileType::CSource,
            "cc" | "cpp" | "cxx" => FileType::CppSource,
            "m" => FileType::ObjectiveCSource,
            "mm" => FileType::ObjectiveCppSource,
            _ => FileType::Unknown,
        }
    }

    /// C or C++ translation unit.
    pub fn is_c_family_source(self) -> bool {
        matches!(self, FileType::CSource | FileType::CppSource)
    }

    /// Any compiled source, including Objective-C and Objective-C++.
    pub fn is_source(self) -> bool {
        matches!(
            self,
            FileType::CSource
                | FileType::CppSource
                | FileType::ObjectiveCSource
                | FileType::ObjectiveCppSource
        )
    }
}

/// A file belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct File {
    pub path: PathBuf,
    pub file_type: FileType,
    /// Per-file fragments; only compile settings are honored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
}

impl File {
    /// A file with its type inferred from the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        File {
            file_type: FileType::from_path(&path),
            path,
            configurations: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configurations.push(configuration);
        self
    }
}

/// A project: one build target described by configuration fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub target_type: TargetType,
    /// Output name; defaults to `name`.
    pub target_name: Option<String>,
    pub configurations: Vec<Configuration>,
}

impl Project {
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        Project {
            name: name.into(),
            target_type,
            target_name: None,
            configurations: Vec::new(),
        }
    }

    /// The product name: `target_name` when set and non-empty, else `name`.
    pub fn product_name(&self) -> &str {
        match self.target_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}

/// Another project this one depends on or that a solution aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    /// GUID text without braces
    pub id: String,
    pub name: String,
    /// Path of the referenced project file
    pub file_path: PathBuf,
    /// Solution folder, `/` or `\` separated; empty for the solution root
    pub virtual_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(FileType::from_path(Path::new("a/b.HPP")), FileType::Header);
        assert_eq!(FileType::from_path(Path::new("x.c")), FileType::CSource);
        assert_eq!(FileType::from_path(Path::new("x.cc")), FileType::CppSource);
        assert_eq!(FileType::from_path(Path::new("x.mm")), FileType::ObjectiveCppSource);
        assert_eq!(FileType::from_path(Path::new("Info.plist")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("Makefile")), FileType::Unknown);
    }

    #[test]
    fn test_source_predicates() {
        assert!(FileType::CppSource.is_c_family_source());
        assert!(!FileType::ObjectiveCSource.is_c_family_source());
        assert!(FileType::ObjectiveCSource.is_source());
        assert!(!FileType::Header.is_source());
    }

    #[test]
    fn test_product_name() {
        let mut p = Project::new("Lib", TargetType::StaticLibrary);
        assert_eq!(p.product_name(), "Lib");
        p.target_name = Some(String::new());
        assert_eq!(p.product_name(), "Lib");
        p.target_name = Some("lib_core".to_string());
        assert_eq!(p.product_name(), "lib_core");
    }
}
