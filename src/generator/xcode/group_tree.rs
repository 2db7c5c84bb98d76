//! The group hierarchy of a pbxproj object table.
//!
//! Objects form an arena keyed by object ID; groups list their children by
//! key. Paths are handled as component lists where leading `..` runs are
//! glued onto the next component (`../../src/a.c` is `["../../src", "a.c"]`),
//! so a group whose `path` is `../src` owns exactly one component.

use std::collections::BTreeMap;

use crate::generator::GenerateError;
use crate::util::hash::{hash_for_path, OBJECT_KEY_LEN};

use super::plist::{Dict, Value};

/// Fields whose values name other objects.
const REFERENCE_KEYS: &[&str] = &[
    "mainGroup",
    "productRefGroup",
    "children",
    "targets",
    "buildPhases",
    "files",
    "fileRef",
    "buildConfigurationList",
    "buildConfigurations",
    "productReference",
    "dependencies",
    "target",
    "targetProxy",
];

/// Split a `/`-separated relative path into group-tree components.
pub fn split_components(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut parents = String::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => parents.push_str("../"),
            s => {
                out.push(format!("{}{}", parents, s));
                parents.clear();
            }
        }
    }
    if !parents.is_empty() {
        parents.pop();
        out.push(parents);
    }
    out
}

/// Check that `root_key` and every reference held by any object resolve.
pub fn validate_references(objects: &Dict, root_key: &str) -> Result<(), GenerateError> {
    if !objects.contains_key(root_key) {
        return Err(GenerateError::DanglingReference {
            object: "<root>".to_string(),
            key: "rootObject".to_string(),
            target: root_key.to_string(),
        });
    }
    for (object, value) in objects {
        let Some(dict) = value.as_dict() else {
            continue;
        };
        for key in REFERENCE_KEYS {
            let targets: Vec<&str> = match dict.get(*key) {
                Some(Value::String(s)) => vec![s.as_str()],
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
                _ => continue,
            };
            if let Some(missing) = targets.into_iter().find(|t| !objects.contains_key(*t)) {
                return Err(GenerateError::DanglingReference {
                    object: object.clone(),
                    key: key.to_string(),
                    target: missing.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn isa(dict: &Dict) -> Option<&str> {
    dict.get("isa").and_then(Value::as_str)
}

fn child_keys(dict: &Dict) -> Vec<String> {
    dict.get("children")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Remove generated file references below `group_key`.
///
/// File references without an `explicitFileType` are dropped; groups other
/// than `group_key` itself that end up with no children are dropped too.
pub fn prune(objects: &mut Dict, group_key: &str) {
    prune_node(objects, group_key, true);
}

fn prune_node(objects: &mut Dict, key: &str, top: bool) -> bool {
    let Some(node) = objects.get(key).and_then(Value::as_dict) else {
        return false;
    };
    let generated_file =
        isa(node) == Some("PBXFileReference") && !node.contains_key("explicitFileType");
    if generated_file {
        objects.remove(key);
        return false;
    }
    if isa(node) != Some("PBXGroup") {
        return true;
    }

    let children = child_keys(node);
    let kept: Vec<String> = children
        .into_iter()
        .filter(|child| prune_node(objects, child, false))
        .collect();
    if kept.is_empty() && !top {
        tracing::debug!("pruning empty group {}", key);
        objects.remove(key);
        return false;
    }
    if let Some(node) = objects.get_mut(key).and_then(Value::as_dict_mut) {
        node.insert("children".to_string(), Value::strings(kept));
    }
    true
}

/// What a tree insertion creates at the end of its path.
#[derive(Debug, Clone, Copy)]
enum Leaf<'a> {
    /// A source-tree file reference.
    File { last_known_file_type: Option<&'a str> },
    /// A built static library of another project.
    Archive { name: &'a str },
}

impl Leaf<'_> {
    /// Reference insertions also match groups by `name`.
    fn matches_by_name(&self) -> bool {
        matches!(self, Leaf::Archive { .. })
    }
}

/// Inserts paths into the group tree rooted at the main group.
#[derive(Debug)]
pub struct GroupTree<'o> {
    objects: &'o mut Dict,
    main_group: String,
    inserted: BTreeMap<String, String>,
}

impl<'o> GroupTree<'o> {
    pub fn new(objects: &'o mut Dict, main_group: impl Into<String>) -> Self {
        GroupTree {
            objects,
            main_group: main_group.into(),
            inserted: BTreeMap::new(),
        }
    }

    /// Object key of a previously inserted path.
    pub fn key_for(&self, path: &str) -> Option<&str> {
        self.inserted.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inserted.contains_key(path)
    }

    /// Release the object table, keeping the path to key mapping.
    pub fn into_paths(self) -> BTreeMap<String, String> {
        self.inserted
    }

    /// Insert a source file; returns the new file reference key.
    pub fn insert_file(
        &mut self,
        components: &[String],
        last_known_file_type: Option<&str>,
    ) -> Result<String, GenerateError> {
        self.insert(components, Leaf::File { last_known_file_type })
    }

    /// Insert another project's library under `Frameworks/<name>`.
    pub fn insert_reference(&mut self, name: &str) -> Result<String, GenerateError> {
        let components = vec!["Frameworks".to_string(), name.to_string()];
        self.insert(&components, Leaf::Archive { name })
    }

    fn insert(&mut self, components: &[String], leaf: Leaf<'_>) -> Result<String, GenerateError> {
        let path = components.join("/");
        if self.inserted.contains_key(&path) {
            return Err(GenerateError::DuplicatePath { path });
        }
        let main_group = self.main_group.clone();
        match self.insert_under(&main_group, components, 0, true, leaf)? {
            Some(key) => {
                tracing::debug!("placed {} as {}", path, key);
                self.inserted.insert(path, key.clone());
                Ok(key)
            }
            None => Err(GenerateError::Unplaceable { path }),
        }
    }

    /// Try to place `components[start..]` below the group `key`.
    fn insert_under(
        &mut self,
        key: &str,
        components: &[String],
        start: usize,
        top: bool,
        leaf: Leaf<'_>,
    ) -> Result<Option<String>, GenerateError> {
        let Some(group) = self.objects.get(key).and_then(Value::as_dict) else {
            return Ok(None);
        };
        if isa(group) != Some("PBXGroup") {
            return Ok(None);
        }

        let own = match group.get("path") {
            Some(path) => path.as_str(),
            None if leaf.matches_by_name() => group.get("name").and_then(Value::as_str),
            None => None,
        };
        let own = own.map(split_components).unwrap_or_default();
        let remaining = &components[start..];
        if own.len() > remaining.len() || own[..] != remaining[..own.len()] {
            return Ok(None);
        }
        let start = start + own.len();

        for child in child_keys(group) {
            if let Some(found) = self.insert_under(&child, components, start, false, leaf)? {
                return Ok(Some(found));
            }
        }

        if start == components.len() || (!top && own.is_empty()) {
            return Ok(None);
        }
        self.synthesize(key, components, start, leaf).map(Some)
    }

    /// Create the groups and leaf for `components[start..]` under `parent`.
    fn synthesize(
        &mut self,
        parent: &str,
        components: &[String],
        start: usize,
        leaf: Leaf<'_>,
    ) -> Result<String, GenerateError> {
        let last = components.len() - 1;
        let mut leaf_key = String::new();
        let mut child_key = String::new();

        for index in (start..=last).rev() {
            let full = components[..=index].join("/");
            let key = hash_for_path(&full, OBJECT_KEY_LEN);
            if self.objects.contains_key(&key) {
                return Err(GenerateError::DuplicatePath { path: full });
            }

            let segment = components[index].as_str();
            let direct = index == start;
            let mut node = Dict::new();
            if index == last {
                match leaf {
                    Leaf::File {
                        last_known_file_type,
                    } => {
                        node.insert("fileEncoding".into(), Value::string("4"));
                        node.insert("isa".into(), Value::string("PBXFileReference"));
                        if let Some(file_type) = last_known_file_type {
                            node.insert("lastKnownFileType".into(), Value::string(file_type));
                        }
                        name_by_path(&mut node, segment, direct);
                        node.insert("sourceTree".into(), Value::string("<group>"));
                    }
                    Leaf::Archive { name } => {
                        node.insert("explicitFileType".into(), Value::string("archive.ar"));
                        node.insert("includeInIndex".into(), Value::string("0"));
                        node.insert("isa".into(), Value::string("PBXFileReference"));
                        node.insert("path".into(), Value::string(format!("lib{}.a", name)));
                        node.insert("sourceTree".into(), Value::string("BUILT_PRODUCTS_DIR"));
                    }
                }
                leaf_key = key.clone();
            } else {
                node.insert("children".into(), Value::strings([child_key.as_str()]));
                node.insert("isa".into(), Value::string("PBXGroup"));
                match leaf {
                    Leaf::File { .. } => name_by_path(&mut node, segment, direct),
                    Leaf::Archive { .. } => {
                        node.insert("name".into(), Value::string(segment));
                    }
                }
                node.insert("sourceTree".into(), Value::string("<group>"));
            }
            self.objects.insert(key.clone(), Value::Dict(node));
            child_key = key;
        }

        let parent = self
            .objects
            .get_mut(parent)
            .and_then(Value::as_dict_mut)
            .ok_or_else(|| GenerateError::missing(parent.to_string(), "objects"))?;
        match parent
            .entry("children".to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
        {
            Some(children) => children.push(Value::string(child_key)),
            None => {
                return Err(GenerateError::UnexpectedValue {
                    field: "children".into(),
                    location: format!("group `{}`", components[..start].join("/")),
                    expected: "list",
                })
            }
        }
        Ok(leaf_key)
    }
}

/// Nodes directly under the matched group carry a display name and their
/// path relative to it; deeper nodes carry their own segment only.
fn name_by_path(node: &mut Dict, segment: &str, direct: bool) {
    if direct {
        let name = segment.rsplit('/').next().unwrap_or(segment);
        node.insert("name".into(), Value::string(name));
    }
    node.insert("path".into(), Value::string(segment));
}
