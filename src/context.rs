//! File context assembly for prompts.
//!
//! Each requested path becomes one entry, in request order. Unreadable or
//! binary files keep their slot but contribute no text.

use crate::core::error::CarltonError;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes inspected by [`is_binary`].
pub const BINARY_SNIFF_LEN: u64 = 1024;

/// True when a NUL byte appears in the first [`BINARY_SNIFF_LEN`] bytes.
/// Missing, empty and non-regular files are not binary.
pub fn is_binary(path: &Path) -> bool {
    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return false;
    }

    let mut prefix = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    match File::open(path).and_then(|f| f.take(BINARY_SNIFF_LEN).read_to_end(&mut prefix)) {
        Ok(_) => prefix.contains(&0),
        Err(_) => false,
    }
}

/// Reads a regular file as UTF-8 text; `None` on any failure.
pub fn read_file(path: &Path) -> Option<String> {
    match read_text(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(error = %e, "skipping unreadable file");
            None
        }
    }
}

fn read_text(path: &Path) -> Result<String, CarltonError> {
    let metadata = fs::metadata(path).map_err(|_| CarltonError::FileRead {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(CarltonError::FileRead {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|_| CarltonError::FileRead {
        path: path.to_path_buf(),
    })
}

/// Rejects anything that is not an existing, regular, non-binary file.
pub fn ensure_text_file(path: &Path) -> Result<(), CarltonError> {
    match fs::metadata(path) {
        Err(_) => Err(CarltonError::invalid_target(path, "file does not exist")),
        Ok(m) if !m.is_file() => Err(CarltonError::invalid_target(path, "not a regular file")),
        Ok(_) if is_binary(path) => Err(CarltonError::invalid_target(path, "file is binary")),
        Ok(_) => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    /// Path as requested; used in the header line.
    pub path: PathBuf,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContext {
    pub entries: Vec<ContextEntry>,
}

impl FileContext {
    /// Reads `paths` relative to `base` (absolute paths are used as-is).
    pub fn collect_in<P: AsRef<Path>>(base: &Path, paths: &[P]) -> Self {
        let entries = paths
            .iter()
            .map(|p| {
                let requested = p.as_ref();
                let full = base.join(requested);
                let content = if is_binary(&full) {
                    tracing::debug!(path = %full.display(), "skipping binary file");
                    None
                } else {
                    read_file(&full)
                };
                ContextEntry {
                    path: requested.to_path_buf(),
                    content,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn render(&self) -> String {
        let mut blob = String::new();
        for entry in &self.entries {
            if let Some(content) = &entry.content {
                blob.push_str(&format!("--- File: {} ---\n", entry.path.display()));
                blob.push_str(content);
                blob.push('\n');
            }
        }
        blob
    }
}

/// Renders every readable text file in `paths`, resolved against `base`.
/// Empty when nothing was readable.
pub fn build_context<P: AsRef<Path>>(base: &Path, paths: &[P]) -> String {
    FileContext::collect_in(base, paths).render()
}
