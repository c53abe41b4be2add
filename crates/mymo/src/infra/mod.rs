//! Infrastructure adapters for IO, git, config, and logging.

pub mod config;
pub mod fs;
pub mod git;
pub mod logging;
pub mod manifest;
