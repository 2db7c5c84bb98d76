//! The `.vcxproj.filters` sidecar: Solution Explorer folders mirroring the
//! source tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::File;
use crate::resolver::Resolver;
use crate::util::hash::derive_guid;
use crate::util::path::{relative_to, to_windows};

use super::xml::{Document, Element};
use super::{item_name, strip_generated_items, VcxprojGenerator};

const GENERATED_ITEMS: &[&str] = &["None", "ClInclude", "ClCompile", "Filter"];

/// Filter folder for a path relative to the input directory, `\` separated.
/// Leading `..` components are dropped; files at the top land in `.`.
fn filter_dir(relative: &Path) -> String {
    let parent = relative.parent().unwrap_or(Path::new(""));
    let mut dir = to_windows(parent);
    while let Some(rest) = dir.strip_prefix("..\\") {
        dir = rest.to_string();
    }
    if dir == ".." {
        dir = ".".to_string();
    }
    dir
}

impl VcxprojGenerator<'_> {
    /// Render the filters file text.
    pub fn render_filters(&self) -> Result<String> {
        let mut document = Document::parse(self.filters_template)
            .context("failed to parse the vcxproj.filters template")?;
        let root = &mut document.root;
        strip_generated_items(root, GENERATED_ITEMS);

        let resolver = Resolver::new(&self.project.configurations);
        let mut seen = BTreeSet::new();
        let files: Vec<&File> = resolver
            .matches(&self.query())
            .into_iter()
            .flat_map(|conf| &conf.files)
            .filter(|file| seen.insert(file.path.to_string_lossy().to_lowercase()))
            .collect();

        // Lowercased folder -> folder as first spelled.
        let mut folders: BTreeMap<String, String> = BTreeMap::new();
        let mut items = Element::new("ItemGroup");
        for file in files {
            let dir = filter_dir(&relative_to(&file.path, &self.input_dir));

            let mut folder = dir.as_str();
            while folder != "." && !folder.is_empty() {
                if folders.contains_key(&folder.to_lowercase()) {
                    break;
                }
                folders.insert(folder.to_lowercase(), folder.to_string());
                folder = match folder.rfind('\\') {
                    Some(index) => &folder[..index],
                    None => ".",
                };
            }

            let mut item = Element::new(item_name(file.file_type))
                .with_attr("Include", self.relative(&file.path));
            if dir != "." {
                item.set_child_text("Filter", dir.as_str());
            }
            items.push(item);
        }

        let mut filters = Element::new("ItemGroup");
        for folder in folders.values() {
            filters.push(
                Element::new("Filter").with_attr("Include", folder.as_str()).with_child(
                    Element::new("UniqueIdentifier")
                        .with_text(format!("{{{}}}", derive_guid(folder))),
                ),
            );
        }

        for group in [filters, items] {
            if group.has_elements() {
                root.push(group);
            }
        }
        Ok(document.to_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Architecture, Configuration, ConfigurationType, AxisFilter, OperatingSystem, Project,
        TargetType,
    };
    use crate::test_support::{filters, vcxproj};
    use std::path::PathBuf;

    fn render(project: &Project) -> Element {
        let generator = VcxprojGenerator::new(
            project,
            "00000000-0000-0000-0000-000000000001",
            &[],
            Path::new("/p"),
            Path::new("/p/build"),
            vcxproj::TEMPLATE,
            filters::TEMPLATE,
            OperatingSystem::Windows,
            Architecture::X86_64,
            OperatingSystem::Windows,
        );
        Document::parse(&generator.render_filters().unwrap()).unwrap().root
    }

    #[test]
    fn test_filter_dir() {
        assert_eq!(filter_dir(Path::new("a.c")), ".");
        assert_eq!(filter_dir(Path::new("src/detail/a.c")), "src\\detail");
        assert_eq!(filter_dir(Path::new("../../shared/x/a.c")), "shared\\x");
        assert_eq!(filter_dir(Path::new("../a.c")), ".");
    }

    #[test]
    fn test_render_filters() {
        let root = Path::new("/p");
        let mut project = Project::new("Lib", TargetType::StaticLibrary);
        project.configurations.push(Configuration {
            files: vec![
                File::new(root.join("src/detail/impl.cpp")),
                File::new(root.join("src/lib.c")),
                File::new(root.join("main.c")),
                File::new(root.join("Src/Other.h")),
            ],
            ..Default::default()
        });
        project.configurations.push(Configuration {
            matching_configuration_types: AxisFilter::only(ConfigurationType::Release),
            files: vec![File::new(PathBuf::from("/p/SRC/LIB.C"))],
            ..Default::default()
        });

        let doc = render(&project);
        let groups: Vec<&Element> = doc.elements().collect();
        assert_eq!(groups.len(), 2);

        let filters: Vec<(&str, String)> = groups[0]
            .elements()
            .map(|f| {
                (
                    f.attr("Include").unwrap(),
                    f.child("UniqueIdentifier").unwrap().text(),
                )
            })
            .collect();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].0, "src");
        assert_eq!(filters[1].0, "src\\detail");
        assert_eq!(filters[0].1, format!("{{{}}}", derive_guid("src")));

        let items: Vec<(&str, Option<&str>, Option<String>)> = groups[1]
            .elements()
            .map(|i| {
                (
                    i.name.as_str(),
                    i.attr("Include"),
                    i.child("Filter").map(Element::text),
                )
            })
            .collect();
        assert_eq!(
            items,
            vec![
                ("ClCompile", Some("..\\src\\detail\\impl.cpp"), Some("src\\detail".to_string())),
                ("ClCompile", Some("..\\src\\lib.c"), Some("src".to_string())),
                ("ClCompile", Some("..\\main.c"), None),
                ("ClInclude", Some("..\\Src\\Other.h"), Some("Src".to_string())),
            ]
        );
    }

    #[test]
    fn test_stale_entries_removed() {
        let project = Project::new("Empty", TargetType::StaticLibrary);
        let doc = render(&project);
        assert!(!doc.has_elements());
    }
}
