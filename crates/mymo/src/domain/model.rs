//! Domain models for template selections, marker regions, and file records.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// ORM backend whose regions survive resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum OrmBackend {
    /// No ORM: every ORM related region is stripped.
    #[default]
    None,
    /// Keep `ORM` and `POSTGRES` regions.
    Postgres,
    /// Keep `ORM` and `MONGO` regions.
    Mongo,
}

impl OrmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrmBackend::None => "none",
            OrmBackend::Postgres => "postgres",
            OrmBackend::Mongo => "mongo",
        }
    }

    /// Whether any ORM was selected.
    pub fn is_selected(&self) -> bool {
        !matches!(self, OrmBackend::None)
    }
}

impl fmt::Display for OrmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrmBackend {
    type Err = OrmParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(OrmBackend::None),
            "postgres" | "postgresql" | "pg" => Ok(OrmBackend::Postgres),
            "mongo" | "mongodb" => Ok(OrmBackend::Mongo),
            other => Err(OrmParseError::UnknownBackend(other.to_string())),
        }
    }
}

/// Error returned when parsing an [`OrmBackend`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OrmParseError {
    #[error("unknown orm backend '{0}' (expected postgres or mongo)")]
    UnknownBackend(String),
}

/// Feature selection applied to every file of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionConfig {
    pub orm_backend: OrmBackend,
    pub include_mocking: bool,
}

impl SelectionConfig {
    pub fn new(orm_backend: OrmBackend, include_mocking: bool) -> Self {
        Self {
            orm_backend,
            include_mocking,
        }
    }
}

/// Named region categories recognized in template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Comment,
    Orm,
    PostgresOnly,
    MongoOnly,
    MockingOnly,
}

impl Category {
    /// Tag written in the marker lines, e.g. `// POSTGRES_START`.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Comment => "COMMENT",
            Category::Orm => "ORM",
            Category::PostgresOnly => "POSTGRES",
            Category::MongoOnly => "MONGO",
            Category::MockingOnly => "MSW",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One matched start/end marker pair and the text between them.
///
/// Offsets are byte offsets into the scanned text: `start_offset` is the first
/// byte of the start marker line, `end_offset` is one past the end marker line
/// (including its newline when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegion {
    pub category: Category,
    pub start_offset: usize,
    pub end_offset: usize,
    pub inner_text: String,
}

/// A template file travelling through the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the template root.
    pub path: PathBuf,
    pub raw_content: String,
    /// `None` until resolved, and `None` afterwards when there is nothing to write.
    pub resolved_content: Option<String>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, raw_content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_content: raw_content.into(),
            resolved_content: None,
        }
    }
}
