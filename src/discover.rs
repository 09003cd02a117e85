//! Source file discovery.
//!
//! Walks the base directory and keeps the files whose path relative to it
//! matches the configured glob. Only files are matched; a directory name
//! matching the pattern does not pull in its contents.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use iobio_core::slug::posix_path;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Glob matcher bound to a base directory.
#[derive(Debug, Clone)]
pub struct SourceMatcher {
    base: PathBuf,
    set: GlobSet,
}

impl SourceMatcher {
    pub fn new(base: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        Ok(Self {
            base: base.into(),
            set: build_globset(&[pattern.to_string()])?,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// True when `path` lies under the base directory and its relative path
    /// matches the pattern.
    pub fn matches(&self, path: &Path) -> bool {
        match path.strip_prefix(&self.base) {
            Ok(relative) => self.set.is_match(posix_path(relative)),
            Err(_) => false,
        }
    }

    /// All matching files, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.base) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
