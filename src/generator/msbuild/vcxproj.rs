//! The `.vcxproj` project file.

use anyhow::{Context, Result};

use crate::core::{Architecture, Configuration, ConfigurationType, File, FileType};
use crate::resolver::Resolver;
use crate::util::path::{component_count, to_windows};

use super::xml::{Document, Element};
use super::{
    configuration_type_name, item_name, platform_name, quote_define_value, quote_option,
    strip_generated_items, VcxprojGenerator,
};

const GENERATED_ITEMS: &[&str] = &["None", "ClInclude", "ClCompile", "ProjectReference"];

/// Condition selecting one `Configuration|Platform` pair.
fn pair_condition(name: &str) -> String {
    format!("'$(Configuration)|$(Platform)'=='{}'", name)
}

/// Conditions compare equal when they differ only in whitespace.
fn same_condition(a: &str, b: &str) -> bool {
    let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    squash(a) == squash(b)
}

fn has_condition(element: &Element, name: &str, condition: &str) -> bool {
    element.name == name
        && element
            .attr("Condition")
            .is_some_and(|c| same_condition(c, condition))
}

/// `Configuration|Platform` names declared by the `ProjectConfigurations` group.
fn declared_configurations(root: &Element) -> Vec<String> {
    root.elements()
        .filter(|e| e.name == "ItemGroup" && e.attr("Label") == Some("ProjectConfigurations"))
        .flat_map(|group| group.elements())
        .filter(|e| e.name == "ProjectConfiguration")
        .filter_map(|e| match (e.child("Configuration"), e.child("Platform")) {
            (Some(c), Some(p)) => Some(format!("{}|{}", c.text().trim(), p.text().trim())),
            _ => e.attr("Include").map(str::to_string),
        })
        .collect()
}

/// Condition for a fragment's file items, or `None` when it applies to every
/// configuration and platform.
///
/// The permitted configuration types and architectures are crossed into one
/// clause per combination, joined with ` Or `.
fn file_condition(conf: &Configuration) -> Option<String> {
    let configs = conf.matching_configuration_types.values();
    let archs = conf.matching_target_architectures.values();
    if configs.is_none() && archs.is_none() {
        return None;
    }

    let mut keys: Vec<&str> = Vec::new();
    let mut values: Vec<String> = vec![String::new()];
    let join = |prefix: &str, value: &str| {
        if prefix.is_empty() {
            value.to_string()
        } else {
            format!("{}|{}", prefix, value)
        }
    };
    if let Some(configs) = configs {
        keys.push("$(Configuration)");
        values = configs
            .iter()
            .flat_map(|c: &ConfigurationType| values.iter().map(move |v| join(v, c.name())))
            .collect();
    }
    if let Some(archs) = archs {
        keys.push("$(Platform)");
        values = archs
            .iter()
            .flat_map(|a: &Architecture| values.iter().map(move |v| join(v, platform_name(*a))))
            .collect();
    }

    let keys = keys.join("|");
    let clauses: Vec<String> = values
        .iter()
        .map(|v| format!("'{}' == '{}'", keys, v))
        .collect();
    Some(clauses.join(" Or "))
}

/// Object file name for a C++ source, flattened so equal file names in
/// different directories do not collide in `$(IntDir)`.
fn object_file_name(relative: &str) -> String {
    format!(
        "$(IntDir){}.obj",
        relative.replace("..", "__").replace(['\\', '/'], "_")
    )
}

/// Generated item groups go before the last `Import`.
fn insert_before_last_import(root: &mut Element, group: Element) {
    match root.rposition(|e| e.name == "Import") {
        Some(index) => root.insert(index, group),
        None => root.push(group),
    }
}

impl VcxprojGenerator<'_> {
    /// Render the project file text.
    pub fn render_project(&self) -> Result<String> {
        let mut document = Document::parse(self.project_template)
            .context("failed to parse the vcxproj template")?;
        let root = &mut document.root;
        strip_generated_items(root, GENERATED_ITEMS);

        let globals = ensure_globals(root);
        if let Some(globals) = root.element_at_mut(globals) {
            globals.set_child_text("ProjectGuid", format!("{{{}}}", self.project_id));
            globals.set_child_text("RootNamespace", self.project.name.as_str());
        }

        let resolver = Resolver::new(&self.project.configurations);
        let declared = declared_configurations(root);
        for arch in Architecture::ALL {
            for config in ConfigurationType::ALL {
                let name = format!("{}|{}", config, platform_name(*arch));
                if !declared.contains(&name) {
                    continue;
                }
                tracing::debug!("stamping {}", name);
                let conf = resolver.merge(
                    &self
                        .query()
                        .target_arch(*arch)
                        .configuration_type(*config),
                );
                let condition = pair_condition(&name);
                self.stamp_properties(property_group(root, &condition));
                self.stamp_item_definitions(item_definition_group(root, &condition), &conf);
            }
        }

        let mut groups: Vec<(Option<String>, Element)> = Vec::new();
        for conf in resolver.matches(&self.query()) {
            let condition = file_condition(conf);
            let index = match groups.iter().position(|(c, _)| *c == condition) {
                Some(index) => index,
                None => {
                    let mut group = Element::new("ItemGroup");
                    if let Some(condition) = &condition {
                        group.set_attr("Condition", condition.as_str());
                    }
                    groups.push((condition, group));
                    groups.len() - 1
                }
            };
            for file in &conf.files {
                groups[index].1.push(self.project_item(file));
            }
        }

        let mut references = Element::new("ItemGroup");
        for reference in self.references {
            references.push(
                Element::new("ProjectReference")
                    .with_attr("Include", self.relative(&reference.file_path))
                    .with_child(
                        Element::new("Project")
                            .with_text(format!("{{{}}}", reference.id.to_uppercase())),
                    )
                    .with_child(Element::new("Name").with_text(reference.name.as_str())),
            );
        }

        let generated = groups
            .into_iter()
            .map(|(_, group)| group)
            .chain(std::iter::once(references));
        for group in generated.filter(Element::has_elements) {
            insert_before_last_import(root, group);
        }

        Ok(document.to_xml())
    }

    fn project_item(&self, file: &File) -> Element {
        let relative = self.relative(&file.path);
        let item = Element::new(item_name(file.file_type));
        if file.file_type == FileType::CppSource {
            let object = object_file_name(&relative);
            item.with_attr("Include", relative)
                .with_child(Element::new("ObjectFileName").with_text(object))
        } else {
            item.with_attr("Include", relative)
        }
    }

    fn stamp_properties(&self, group: &mut Element) {
        let project = self.project;
        if let Some(target_name) = project.target_name.as_deref() {
            if !target_name.is_empty() && target_name != project.name {
                group.set_child_text("TargetName", target_name);
            }
        }
        group.set_child_text(
            "ConfigurationType",
            configuration_type_name(project.target_type),
        );
    }

    fn stamp_item_definitions(&self, group: &mut Element, conf: &Configuration) {
        let compile = group.child_or_insert("ClCompile");

        let includes: Vec<String> = conf
            .include_directories
            .iter()
            .map(|d| self.relative(d))
            .collect();
        set_list(compile, "AdditionalIncludeDirectories", &includes, ";");

        let defines: Vec<String> = conf
            .defines
            .iter()
            .map(|d| match &d.value {
                Some(value) => format!("{}={}", d.name, quote_define_value(value)),
                None => d.name.clone(),
            })
            .collect();
        set_list(compile, "PreprocessorDefinitions", &defines, ";");

        let flags: Vec<String> = conf
            .common_flags
            .iter()
            .chain(&conf.c_flags)
            .chain(&conf.cpp_flags)
            .map(|f| quote_option(f))
            .collect();
        set_options(compile, &flags);

        if !self.project.target_type.is_linked() {
            return;
        }
        let link = group.child_or_insert("Link");

        let lib_dirs: Vec<String> = conf
            .lib_directories
            .iter()
            .map(|d| self.relative(d))
            .collect();
        set_list(link, "AdditionalLibraryDirectories", &lib_dirs, ";");

        let dependencies: Vec<String> = conf
            .libs
            .iter()
            .map(|lib| {
                if component_count(lib) == 1 {
                    to_windows(lib)
                } else {
                    self.relative(lib)
                }
            })
            .chain(self.references.iter().map(|r| format!("{}.lib", r.name)))
            .collect();
        set_list(link, "AdditionalDependencies", &dependencies, ";");

        let flags: Vec<String> = conf.linker_flags.iter().map(|f| quote_option(f)).collect();
        set_options(link, &flags);
    }
}

/// `<Name>a;b;%(Name)</Name>`, skipped when empty.
fn set_list(element: &mut Element, name: &str, values: &[String], separator: &str) {
    if values.is_empty() {
        return;
    }
    let mut text = values.join(separator);
    text.push_str(separator);
    text.push_str(&format!("%({})", name));
    element.set_child_text(name, text);
}

/// `<AdditionalOptions>%(AdditionalOptions) a b</AdditionalOptions>`, skipped when empty.
fn set_options(element: &mut Element, flags: &[String]) {
    if flags.is_empty() {
        return;
    }
    element.set_child_text(
        "AdditionalOptions",
        format!("%(AdditionalOptions) {}", flags.join(" ")),
    );
}

/// Index of the `Globals` property group, created after the
/// `ProjectConfigurations` group when missing.
fn ensure_globals(root: &mut Element) -> usize {
    if let Some(index) =
        root.position(|e| e.name == "PropertyGroup" && e.attr("Label") == Some("Globals"))
    {
        return index;
    }
    let index = root
        .position(|e| e.name == "ItemGroup" && e.attr("Label") == Some("ProjectConfigurations"))
        .map_or(0, |i| i + 1);
    root.insert(
        index,
        Element::new("PropertyGroup").with_attr("Label", "Globals"),
    );
    index
}

/// The property group for one configuration pair, preferring the one labeled
/// `Configuration`. Missing groups are created after the existing ones.
fn property_group<'r>(root: &'r mut Element, condition: &str) -> &'r mut Element {
    let labeled = root.rposition(|e| {
        has_condition(e, "PropertyGroup", condition) && e.attr("Label") == Some("Configuration")
    });
    let any = || root.rposition(|e| has_condition(e, "PropertyGroup", condition));
    let index = match labeled.or_else(any) {
        Some(index) => index,
        None => {
            let after = root
                .rposition(|e| {
                    e.name == "PropertyGroup"
                        && matches!(e.attr("Label"), Some("Configuration" | "Globals"))
                })
                .map_or(0, |i| i + 1);
            root.insert(
                after,
                Element::new("PropertyGroup")
                    .with_attr("Condition", condition)
                    .with_attr("Label", "Configuration"),
            );
            after
        }
    };
    element_at(root, index)
}

/// The item definition group for one configuration pair, created after the
/// last existing one (or before the last `Import`) when missing.
fn item_definition_group<'r>(root: &'r mut Element, condition: &str) -> &'r mut Element {
    let index = match root.rposition(|e| has_condition(e, "ItemDefinitionGroup", condition)) {
        Some(index) => index,
        None => {
            let index = root
                .rposition(|e| e.name == "ItemDefinitionGroup")
                .map(|last| last + 1)
                .or_else(|| root.rposition(|e| e.name == "Import"))
                .unwrap_or(root.children.len());
            root.insert(
                index,
                Element::new("ItemDefinitionGroup").with_attr("Condition", condition),
            );
            index
        }
    };
    element_at(root, index)
}

fn element_at(root: &mut Element, index: usize) -> &mut Element {
    match root.element_at_mut(index) {
        Some(element) => element,
        None => unreachable!("index {} was just located or inserted", index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AxisFilter, Define, OperatingSystem, Project, ProjectReference, TargetType,
    };
    use crate::test_support::{filters, vcxproj};
    use std::path::{Path, PathBuf};

    fn generator<'a>(project: &'a Project, refs: &'a [ProjectReference]) -> VcxprojGenerator<'a> {
        VcxprojGenerator::new(
            project,
            "8d7a0c3f-1111-2222-3333-444455556666",
            refs,
            Path::new("/p"),
            Path::new("/p/build"),
            vcxproj::TEMPLATE,
            filters::TEMPLATE,
            OperatingSystem::Windows,
            Architecture::X86_64,
            OperatingSystem::Windows,
        )
    }

    fn parse(text: &str) -> Element {
        Document::parse(text).unwrap().root
    }

    fn group_with<'e>(root: &'e Element, name: &str, condition: &str) -> &'e Element {
        root.elements()
            .find(|e| has_condition(e, name, condition))
            .unwrap()
    }

    fn exe_project() -> Project {
        let root = Path::new("/p");
        let mut project = Project::new("App", TargetType::Executable);
        project.target_name = Some("app".into());
        project.configurations.push(Configuration {
            include_directories: vec![root.join("include")],
            defines: vec![Define::key_value("LEVEL", "2"), Define::key_value("NAME", "a\"b")],
            cpp_flags: vec!["/W4".into()],
            libs: vec![PathBuf::from("ws2_32.lib")],
            linker_flags: vec!["/DEBUG".into()],
            files: vec![
                File::new(root.join("src/main.cpp")),
                File::new(root.join("include/app.h")),
                File::new(root.join("README.md")),
            ],
            ..Default::default()
        });
        project.configurations.push(Configuration {
            matching_configuration_types: AxisFilter::only(ConfigurationType::Debug),
            files: vec![File::new(root.join("src/debug.c"))],
            ..Default::default()
        });
        project
    }

    #[test]
    fn test_file_condition() {
        let unconditional = Configuration::default();
        assert_eq!(file_condition(&unconditional), None);

        let debug_only = Configuration {
            matching_configuration_types: AxisFilter::only(ConfigurationType::Debug),
            ..Default::default()
        };
        assert_eq!(
            file_condition(&debug_only).unwrap(),
            "'$(Configuration)' == 'Debug'"
        );

        let crossed = Configuration {
            matching_configuration_types: AxisFilter::OneOf(vec![
                ConfigurationType::Debug,
                ConfigurationType::Release,
            ]),
            matching_target_architectures: AxisFilter::OneOf(vec![
                Architecture::X86,
                Architecture::X86_64,
            ]),
            ..Default::default()
        };
        assert_eq!(
            file_condition(&crossed).unwrap(),
            "'$(Configuration)|$(Platform)' == 'Debug|Win32' Or \
             '$(Configuration)|$(Platform)' == 'Release|Win32' Or \
             '$(Configuration)|$(Platform)' == 'Debug|x64' Or \
             '$(Configuration)|$(Platform)' == 'Release|x64'"
        );
    }

    #[test]
    fn test_object_file_name() {
        assert_eq!(
            object_file_name("..\\src\\detail\\a.cpp"),
            "$(IntDir)___src_detail_a.cpp.obj"
        );
    }

    #[test]
    fn test_render_globals_and_configurations() {
        let project = exe_project();
        let root = parse(&generator(&project, &[]).render_project().unwrap());

        let globals = root
            .elements()
            .find(|e| e.attr("Label") == Some("Globals"))
            .unwrap();
        assert_eq!(
            globals.child("ProjectGuid").unwrap().text(),
            "{8D7A0C3F-1111-2222-3333-444455556666}"
        );
        assert_eq!(globals.child("RootNamespace").unwrap().text(), "App");
        assert!(globals.child("WindowsTargetPlatformVersion").is_some());

        // Existing and created property groups for all four declared pairs.
        for name in ["Debug|Win32", "Release|Win32", "Debug|x64", "Release|x64"] {
            let group = group_with(&root, "PropertyGroup", &pair_condition(name));
            assert_eq!(group.child("ConfigurationType").unwrap().text(), "Application");
            assert_eq!(group.child("TargetName").unwrap().text(), "app");
        }
        let created = group_with(&root, "PropertyGroup", &pair_condition("Debug|x64"));
        assert!(created.child("PlatformToolset").is_none());

        let debug = group_with(&root, "ItemDefinitionGroup", &pair_condition("Debug|Win32"));
        let compile = debug.child("ClCompile").unwrap();
        assert_eq!(compile.child("WarningLevel").unwrap().text(), "Level3");
        assert_eq!(
            compile.child("AdditionalIncludeDirectories").unwrap().text(),
            "..\\include;%(AdditionalIncludeDirectories)"
        );
        assert_eq!(
            compile.child("PreprocessorDefinitions").unwrap().text(),
            "LEVEL=2;NAME=\"ab\";%(PreprocessorDefinitions)"
        );
        assert_eq!(
            compile.child("AdditionalOptions").unwrap().text(),
            "%(AdditionalOptions) \"/W4\""
        );
        let link = debug.child("Link").unwrap();
        assert_eq!(
            link.child("AdditionalDependencies").unwrap().text(),
            "ws2_32.lib;%(AdditionalDependencies)"
        );
        assert_eq!(
            link.child("AdditionalOptions").unwrap().text(),
            "%(AdditionalOptions) \"/DEBUG\""
        );

        assert!(root
            .elements()
            .any(|e| has_condition(e, "ItemDefinitionGroup", &pair_condition("Release|x64"))));
    }

    #[test]
    fn test_render_items() {
        let project = exe_project();
        let references = vec![ProjectReference {
            id: "abcdef01-0000-0000-0000-000000000000".into(),
            name: "Base".into(),
            file_path: PathBuf::from("/p/base/Base.vcxproj"),
            virtual_dir: String::new(),
        }];
        let text = generator(&project, &references).render_project().unwrap();
        assert!(!text.contains("stale"));
        assert!(!text.contains("Stale"));

        let root = parse(&text);
        let children: Vec<&Element> = root.elements().collect();
        let last_import = children.iter().rposition(|e| e.name == "Import").unwrap();
        let item_groups: Vec<&Element> = children
            .iter()
            .copied()
            .filter(|e| e.name == "ItemGroup" && e.attr("Label").is_none())
            .collect();
        assert_eq!(item_groups.len(), 3);
        assert!(children[..last_import]
            .iter()
            .filter(|e| e.name == "ItemGroup" && e.attr("Label").is_none())
            .count()
            == 3);

        let all = item_groups[0];
        assert!(all.attr("Condition").is_none());
        let items: Vec<(&str, Option<&str>)> = all
            .elements()
            .map(|e| (e.name.as_str(), e.attr("Include")))
            .collect();
        assert_eq!(
            items,
            vec![
                ("ClCompile", Some("..\\src\\main.cpp")),
                ("ClInclude", Some("..\\include\\app.h")),
                ("None", Some("..\\README.md")),
            ]
        );
        assert_eq!(
            all.child("ClCompile").unwrap().child("ObjectFileName").unwrap().text(),
            "$(IntDir)___src_main.cpp.obj"
        );

        let debug = item_groups[1];
        assert_eq!(debug.attr("Condition"), Some("'$(Configuration)' == 'Debug'"));
        let debug_c = debug.child("ClCompile").unwrap();
        assert_eq!(debug_c.attr("Include"), Some("..\\src\\debug.c"));
        assert!(debug_c.child("ObjectFileName").is_none());

        let reference = item_groups[2].child("ProjectReference").unwrap();
        assert_eq!(reference.attr("Include"), Some("..\\base\\Base.vcxproj"));
        assert_eq!(
            reference.child("Project").unwrap().text(),
            "{ABCDEF01-0000-0000-0000-000000000000}"
        );
        assert_eq!(reference.child("Name").unwrap().text(), "Base");

        let link = group_with(&root, "ItemDefinitionGroup", &pair_condition("Release|x64"))
            .child("Link")
            .unwrap();
        assert_eq!(
            link.child("AdditionalDependencies").unwrap().text(),
            "ws2_32.lib;Base.lib;%(AdditionalDependencies)"
        );
    }

    #[test]
    fn test_static_library_has_no_link_settings() {
        let mut project = Project::new("Lib", TargetType::StaticLibrary);
        project.configurations.push(Configuration {
            libs: vec![PathBuf::from("m.lib")],
            ..Default::default()
        });
        let root = parse(&generator(&project, &[]).render_project().unwrap());
        let debug = group_with(&root, "ItemDefinitionGroup", &pair_condition("Debug|Win32"));
        assert!(debug.child("Link").is_none());
        let props = group_with(&root, "PropertyGroup", &pair_condition("Debug|Win32"));
        assert_eq!(props.child("ConfigurationType").unwrap().text(), "StaticLibrary");
        assert!(props.child("TargetName").is_none());
    }

    #[test]
    fn test_same_condition_ignores_whitespace() {
        assert!(same_condition(
            "'$(Configuration)|$(Platform)' == 'Debug|x64'",
            "'$(Configuration)|$(Platform)'=='Debug|x64'"
        ));
        assert!(!same_condition(
            "'$(Configuration)|$(Platform)'=='Debug|x64'",
            "'$(Configuration)|$(Platform)'=='Release|x64'"
        ));
    }
}
