//! Error types for catalog handling and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Problems that make a catalog unusable.
///
/// These abort the pipeline before any graph exists. Recoverable problems
/// (dangling or duplicate relationships) are build warnings instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog entry #{index} has no id")]
    MissingId { index: usize },

    #[error("catalog entry '{id}' has no path")]
    MissingPath { id: String },

    #[error("catalog id '{id}' is declared more than once")]
    DuplicateId { id: String },

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading or saving an analysis configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
