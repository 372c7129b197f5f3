use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::config::ConfigError;
use crate::readers::ReadError;

/// Everything that can stop a load. None of these are recovered from.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to read a globbed path: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Cannot parse an acquisition time from {dir:?} (got {stamp:?})")]
    AcquisitionTime { dir: PathBuf, stamp: String },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Process {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Failed to connect to the database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
