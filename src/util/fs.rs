//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use tempfile::NamedTempFile;

/// Byte-order-mark policy for generated text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    Utf8,
    /// UTF-8 with a leading byte-order mark (Visual Studio formats).
    Utf8Bom,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl TextEncoding {
    /// Encode text into the bytes written to disk.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
                bytes.extend_from_slice(UTF8_BOM);
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
        }
    }
}

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The on-disk content already matched; the file was not touched.
    Unchanged,
}

/// Write generated text, leaving the file alone when its content is unchanged.
///
/// Unless `force` is set, the rendered bytes are compared against what is on
/// disk first and an identical file keeps its modification time. Changed
/// content goes to a temporary file in the destination directory which is then
/// renamed over the target, so readers never observe a partial file.
pub fn write_if_changed(
    path: &Path,
    text: &str,
    encoding: TextEncoding,
    force: bool,
) -> Result<WriteOutcome> {
    let bytes = encoding.encode(text);

    if !force && path.is_file() {
        let existing = fs::read(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        if existing == bytes {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteOutcome::Unchanged);
        }
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(&bytes)
        .with_context(|| format!("failed to write temporary file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to flush temporary file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace file: {}", path.display()))?;

    Ok(WriteOutcome::Written)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
///
/// A leading UTF-8 byte-order mark is dropped, so templates saved by Visual
/// Studio parse the same as plain ones.
pub fn read_to_string(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Expand file patterns relative to a base directory.
///
/// Patterns containing glob metacharacters are expanded against existing
/// files; anything else is taken as a literal path, whether or not it exists.
/// Results keep pattern order; each pattern's matches are sorted and a path
/// already produced by an earlier pattern is skipped.
pub fn expand_patterns(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);

        let mut matched = if is_glob(pattern) {
            let pattern_str = full_pattern.to_string_lossy();
            let mut matched = Vec::new();
            for entry in glob(&pattern_str)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
            {
                match entry {
                    Ok(path) => {
                        if path.is_file() {
                            matched.push(path);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("glob error: {}", e);
                    }
                }
            }
            if matched.is_empty() {
                tracing::debug!("pattern `{}` matched no files", pattern);
            }
            matched
        } else {
            vec![full_pattern]
        };

        matched.sort();
        for path in matched {
            if !results.contains(&path) {
                results.push(path);
            }
        }
    }

    Ok(results)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
