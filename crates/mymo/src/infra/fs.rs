//! Filesystem adapters: bounded reads and writes, and recursive cleanup.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Contents of a template file as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Text(String),
    /// Not valid UTF-8; copied through untouched.
    Binary(Vec<u8>),
}

/// Operation that failed for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    /// Mapping a template path to its output path.
    Rename,
    CreateDir,
    Write,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOperation::Read => "read",
            FileOperation::Rename => "rename",
            FileOperation::CreateDir => "create directory",
            FileOperation::Write => "write",
        })
    }
}

/// A per-file failure. Recorded and logged, never fatal for the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub operation: FileOperation,
    pub message: String,
}

impl FileFailure {
    fn new(path: &Path, operation: FileOperation, err: &io::Error) -> Self {
        Self::rejected(path, operation, err.to_string())
    }

    /// A failure decided before touching the filesystem.
    pub fn rejected(
        path: impl Into<PathBuf>,
        operation: FileOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            operation,
            message: message.into(),
        }
    }
}

/// Reads and writes files on a fixed-size pool so at most
/// `max_open_files` handles are open at once.
pub struct FileStore {
    pool: ThreadPool,
}

impl FileStore {
    pub fn new(max_open_files: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_open_files.max(1))
            .thread_name(|index| format!("mymo-io-{index}"))
            .build()
            .context("failed to build file I/O pool")?;
        Ok(Self { pool })
    }

    /// Read every path, preserving input order.
    pub fn read_all(&self, paths: &[PathBuf]) -> Vec<Result<FileContents, FileFailure>> {
        self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    read_file(path).map_err(|err| FileFailure::new(path, FileOperation::Read, &err))
                })
                .collect()
        })
    }

    /// Write every `(path, bytes)` pair, creating parent directories first.
    pub fn write_all<C>(&self, writes: &[(PathBuf, C)]) -> Vec<Result<PathBuf, FileFailure>>
    where
        C: AsRef<[u8]> + Sync,
    {
        self.pool.install(|| {
            writes
                .par_iter()
                .map(|(path, contents)| write_file(path, contents.as_ref()).map(|()| path.clone()))
                .collect()
        })
    }
}

/// Read a file as text, falling back to raw bytes when it is not UTF-8.
pub fn read_file(path: &Path) -> io::Result<FileContents> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => FileContents::Text(text),
        Err(err) => FileContents::Binary(err.into_bytes()),
    })
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<(), FileFailure> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|err| FileFailure::new(parent, FileOperation::CreateDir, &err))?;
    }
    fs::write(path, contents).map_err(|err| FileFailure::new(path, FileOperation::Write, &err))
}

/// Recursively delete `path`. Returns `false` when there was nothing to delete.
pub fn remove_tree(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
