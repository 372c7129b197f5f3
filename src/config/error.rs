use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("data_roots must contain at least one glob pattern")]
    NoDataRoots,
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("Environment variable {name} has an invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
