//! Git integration utilities.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Serialize;

/// Fetches a template repository into a local directory.
pub trait SourceFetcher {
    /// Populate `destination` (which must not exist yet) from `remote`.
    fn fetch(&self, remote: &str, destination: &Path) -> Result<()>;
}

/// Fetcher shelling out to the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCliFetcher {
    program: String,
    shallow: bool,
}

impl Default for GitCliFetcher {
    fn default() -> Self {
        Self {
            program: "git".into(),
            shallow: true,
        }
    }
}

impl GitCliFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone full history instead of only the tip commit.
    pub fn with_full_history(mut self) -> Self {
        self.shallow = false;
        self
    }

    fn clone_args(&self, remote: &str, destination: &Path) -> Vec<String> {
        let mut args = vec!["clone".to_owned(), "--quiet".to_owned()];
        if self.shallow {
            args.push("--depth".into());
            args.push("1".into());
        }
        args.push(remote.to_owned());
        args.push(destination.to_string_lossy().into_owned());
        args
    }
}

impl SourceFetcher for GitCliFetcher {
    fn fetch(&self, remote: &str, destination: &Path) -> Result<()> {
        let args = self.clone_args(remote, destination);
        tracing::debug!(program = %self.program, ?args, "cloning template");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git clone exited with {}: {}", output.status, stderr.trim());
        }
        Ok(())
    }
}

/// Information about the fetched template, reported after generation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateMetadata {
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub root: PathBuf,
}

/// Read branch and HEAD commit of the repository at `path`, if it is one.
pub fn metadata_for_path(path: &Path) -> Option<TemplateMetadata> {
    let repo = gix::discover(path).ok()?;
    let branch = repo
        .head_name()
        .ok()
        .flatten()
        .map(|name| name.shorten().to_string());
    let commit = repo.head_id().ok().map(|id| id.detach().to_string());
    let root = repo
        .work_dir()
        .map(Path::to_path_buf)
        .or_else(|| repo.path().parent().map(Path::to_path_buf))?;

    Some(TemplateMetadata {
        branch,
        commit,
        root,
    })
}
