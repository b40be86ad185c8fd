//! Filesystem seam — real and in-memory implementations.
//!
//! Everything that touches disk goes through [`Filesystem`] so the
//! assembler and writer/checker can be exercised against an in-memory
//! store in tests. Exactly one writer per run, so no locking.

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

pub trait Filesystem {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    /// Files directly in `dir` whose base name matches `pattern`, sorted
    /// for deterministic output. Non-recursive.
    fn glob_files(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// The real thing.
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn glob_files(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read directory: {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if pattern.matches(name) {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

/// In-memory store for tests; shares its glob semantics with
/// [`OsFilesystem`] through [`glob::Pattern`].
#[cfg(test)]
pub struct MemoryFilesystem {
    files: std::cell::RefCell<std::collections::BTreeMap<PathBuf, String>>,
}

#[cfg(test)]
impl MemoryFilesystem {
    pub fn new() -> Self {
        Self {
            files: std::cell::RefCell::new(std::collections::BTreeMap::new()),
        }
    }
}

#[cfg(test)]
impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn glob_files(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        // BTreeMap keys are already sorted.
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| pattern.matches(n))
            })
            .cloned()
            .collect())
    }
}
