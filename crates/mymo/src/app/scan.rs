//! Template tree enumeration.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder, WalkState};

/// A file found in the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Absolute (or root-joined) location on disk.
    pub path: PathBuf,
    /// Location relative to the template root.
    pub relative: PathBuf,
}

/// Enumerates every file under a root, honoring ignore globs.
///
/// Hidden files are included and `.gitignore` files are not consulted: a
/// freshly fetched template contains exactly what its author committed.
#[derive(Debug, Clone)]
pub struct Scanner {
    ignore: Vec<String>,
}

impl Scanner {
    pub fn new<I, S>(ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    /// List files under `root`, sorted by relative path.
    pub fn scan(&self, root: &Path) -> Result<Vec<TemplateEntry>> {
        let matcher = Arc::new(build_ignore_matcher(&self.ignore)?);
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false);

        let filter_root = root.to_path_buf();
        builder.filter_entry({
            let matcher = matcher.clone();
            move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let rel = entry
                    .path()
                    .strip_prefix(&filter_root)
                    .unwrap_or(entry.path());
                !matcher.is_match(rel)
            }
        });

        let files = Mutex::new(Vec::new());
        let root_ref = Arc::new(root.to_path_buf());

        builder.build_parallel().run(|| {
            let files = &files;
            let root = root_ref.clone();
            Box::new(move |result| match result {
                Ok(entry) => {
                    if let Some(found) = process_entry(&entry, &root)
                        && let Ok(mut guard) = files.lock()
                    {
                        guard.push(found);
                    }
                    WalkState::Continue
                }
                Err(err) => {
                    tracing::warn!(error = %err, "template walk error");
                    WalkState::Continue
                }
            })
        });

        let mut files = files.into_inner().unwrap_or_default();
        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(files)
    }
}

fn process_entry(entry: &DirEntry, root: &Path) -> Option<TemplateEntry> {
    let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
    if !is_file {
        return None;
    }
    let path = entry.path();
    let relative = path.strip_prefix(root).ok()?.to_path_buf();
    Some(TemplateEntry {
        path: path.to_path_buf(),
        relative,
    })
}

fn build_ignore_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            continue;
        }
        let glob = Glob::new(trimmed)
            .with_context(|| format!("invalid ignore glob '{trimmed}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build ignore matcher")
}
