//! End-to-end project generation from a template repository.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::engine::TemplateEngine;
use crate::app::scan::Scanner;
use crate::domain::errors::GenerateError;
use crate::domain::interpolate::rename_path;
use crate::domain::model::{FileRecord, SelectionConfig};
use crate::infra::fs::{self, FileContents, FileFailure, FileOperation, FileStore};
use crate::infra::git::{self, SourceFetcher, TemplateMetadata};
use crate::infra::manifest;

const CLONE_DIR: &str = "template";

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Output directory name and package name.
    pub name: String,
    /// Template repository location handed to the fetcher.
    pub from: String,
    /// Rewrite the `name` field of `package.json`.
    pub node: bool,
    pub selection: SelectionConfig,
    /// Name substituted into placeholders and paths. Defaults to `name`.
    pub entity_name: Option<String>,
    /// Delete a previous `<output_root>/<name>` first.
    pub clean: bool,
    /// Globs, relative to the template root, excluded from generation.
    pub ignore: Vec<String>,
    /// Directory the project directory is created in.
    pub output_root: PathBuf,
    pub max_open_files: usize,
}

impl GenerateOptions {
    pub fn new(name: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            node: false,
            selection: SelectionConfig::default(),
            entity_name: None,
            clean: false,
            ignore: vec![".git".into(), ".git/**".into()],
            output_root: PathBuf::from("."),
            max_open_files: 100,
        }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.output_root.join(&self.name)
    }

    pub fn entity_name(&self) -> &str {
        self.entity_name.as_deref().unwrap_or(&self.name)
    }
}

/// Outcome of a generation run. Per-file failures do not abort the run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub project_dir: PathBuf,
    pub template: Option<TemplateMetadata>,
    /// Resolved text files written, as output paths.
    pub written: Vec<PathBuf>,
    /// Binary files copied verbatim, as output paths.
    pub copied: Vec<PathBuf>,
    /// Template files (relative, renamed) left out because nothing survived resolution.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate a project as described by `options`, fetching the template with `fetcher`.
#[tracing::instrument(skip_all, fields(name = %options.name, from = %options.from))]
pub fn generate(options: &GenerateOptions, fetcher: &dyn SourceFetcher) -> Result<GenerationReport> {
    validate_name(&options.name)?;
    let project_dir = options.project_dir();

    if options.clean {
        let removed = fs::remove_tree(&project_dir).map_err(|source| GenerateError::Clean {
            path: project_dir.clone(),
            source,
        })?;
        if removed {
            tracing::info!(path = %project_dir.display(), "removed previous output");
        }
    }

    let workspace = tempfile::Builder::new()
        .prefix("mymo-clone-")
        .tempdir()
        .context("failed to create temporary clone directory")?;
    let clone_dir = workspace.path().join(CLONE_DIR);

    fetcher
        .fetch(&options.from, &clone_dir)
        .map_err(|err| GenerateError::Fetch {
            url: options.from.clone(),
            message: format!("{err:#}"),
        })?;

    let template = git::metadata_for_path(&clone_dir);
    if let Some(meta) = &template {
        tracing::info!(
            branch = meta.branch.as_deref().unwrap_or("-"),
            commit = meta.commit.as_deref().unwrap_or("-"),
            "fetched template"
        );
    }

    if options.node {
        manifest::rename_package(&clone_dir, &options.name).map_err(|err| {
            GenerateError::Manifest {
                path: clone_dir.join(manifest::PACKAGE_MANIFEST),
                message: format!("{err:#}"),
            }
        })?;
    }

    let entries = Scanner::new(options.ignore.iter().cloned())
        .scan(&clone_dir)
        .map_err(|err| GenerateError::Enumerate {
            root: clone_dir.clone(),
            message: format!("{err:#}"),
        })?;
    for entry in &entries {
        tracing::info!(file = %entry.relative.display(), "template file");
    }

    let store = FileStore::new(options.max_open_files)?;
    let paths: Vec<PathBuf> = entries.iter().map(|entry| entry.path.clone()).collect();
    let contents = store.read_all(&paths);

    let mut report = GenerationReport {
        project_dir: project_dir.clone(),
        template,
        ..GenerationReport::default()
    };

    let entity_name = options.entity_name();
    let mut claimed = HashSet::new();
    let mut records = Vec::new();
    let mut binaries = Vec::new();
    for (entry, read) in entries.into_iter().zip(contents) {
        match read {
            Ok(FileContents::Text(text)) => records.push(FileRecord::new(entry.relative, text)),
            Ok(FileContents::Binary(bytes)) => {
                let renamed = rename_path(&entry.relative, entity_name);
                match claim_output(&project_dir, &renamed, &mut claimed) {
                    Ok(output) => binaries.push((output, bytes)),
                    Err(failure) => record_failure(&mut report, failure),
                }
            }
            Err(failure) => record_failure(&mut report, failure),
        }
    }

    let engine = TemplateEngine::new(options.selection, entity_name);
    let mut texts = Vec::new();
    for record in engine.run(records) {
        match record.resolved_content {
            Some(content) => match claim_output(&project_dir, &record.path, &mut claimed) {
                Ok(output) => texts.push((output, content)),
                Err(failure) => record_failure(&mut report, failure),
            },
            None => {
                tracing::debug!(file = %record.path.display(), "nothing left after resolution");
                report.skipped.push(record.path);
            }
        }
    }

    for result in store.write_all(&texts) {
        match result {
            Ok(path) => report.written.push(path),
            Err(failure) => record_failure(&mut report, failure),
        }
    }
    for result in store.write_all(&binaries) {
        match result {
            Ok(path) => report.copied.push(path),
            Err(failure) => record_failure(&mut report, failure),
        }
    }

    if let Err(err) = workspace.close() {
        tracing::warn!(error = %err, "failed to remove temporary clone directory");
    }

    tracing::info!(
        written = report.written.len(),
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "generation finished"
    );
    Ok(report)
}

fn record_failure(report: &mut GenerationReport, failure: FileFailure) {
    tracing::warn!(
        path = %failure.path.display(),
        operation = %failure.operation,
        error = %failure.message,
        "file operation failed"
    );
    report.failures.push(failure);
}

/// Output path for a renamed template path, reserved against later files.
///
/// The renamed path must stay below `project_dir`, and no two template files
/// may land on the same output path.
fn claim_output(
    project_dir: &Path,
    renamed: &Path,
    claimed: &mut HashSet<PathBuf>,
) -> Result<PathBuf, FileFailure> {
    if !is_plain_relative(renamed) {
        return Err(FileFailure::rejected(
            renamed,
            FileOperation::Rename,
            "renamed path leaves the project directory",
        ));
    }
    let output = project_dir.join(renamed);
    if !claimed.insert(output.clone()) {
        return Err(FileFailure::rejected(
            output,
            FileOperation::Write,
            "another template file renames to the same path",
        ));
    }
    Ok(output)
}

fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

fn validate_name(name: &str) -> Result<(), GenerateError> {
    if !name.trim().is_empty() && is_plain_relative(Path::new(name)) {
        Ok(())
    } else {
        Err(GenerateError::InvalidName(name.to_owned()))
    }
}
