//! Lexical path helpers.
//!
//! Generators never touch the filesystem to compare paths: everything is
//! normalized lexically and rendered with an explicit separator style, so the
//! same project description produces the same files on every host.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// Leading `..` components of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `path` relative to `base`, both normalized first.
///
/// Returns `.` when the two are equal.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    match pathdiff::diff_paths(&path, &base) {
        Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Some(rel) => rel,
        None => path,
    }
}

/// Split a path into its textual components (`.` dropped).
pub fn parts(path: &Path) -> Vec<String> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect()
}

/// Render a path with `/` separators.
pub fn to_unix(path: &Path) -> String {
    join_parts(path, "/")
}

/// Render a path with `\` separators.
pub fn to_windows(path: &Path) -> String {
    join_parts(path, "\\")
}

fn join_parts(path: &Path, sep: &str) -> String {
    let parts = parts(path);
    if parts.is_empty() {
        return ".".to_string();
    }
    if parts.len() == 1 && parts[0].is_empty() {
        return sep.to_string();
    }
    parts.join(sep)
}

/// Number of components in a relative path, as used for library naming.
pub fn component_count(path: &Path) -> usize {
    parts(path).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("/x/../../y")), PathBuf::from("/y"));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/p/src/a.c"), Path::new("/p/build")),
            PathBuf::from("../src/a.c")
        );
        assert_eq!(
            relative_to(Path::new("/p/build"), Path::new("/p/build/")),
            PathBuf::from(".")
        );
        assert_eq!(
            relative_to(Path::new("/p/./src/../inc"), Path::new("/p")),
            PathBuf::from("inc")
        );
    }

    #[test]
    fn test_separator_styles() {
        let p = Path::new("../src/detail/x.h");
        assert_eq!(to_unix(p), "../src/detail/x.h");
        assert_eq!(to_windows(p), "..\\src\\detail\\x.h");
        assert_eq!(to_unix(Path::new("")), ".");
    }

    #[test]
    fn test_component_count() {
        assert_eq!(component_count(Path::new("pthread")), 1);
        assert_eq!(component_count(Path::new("lib/libz.a")), 2);
    }
}
