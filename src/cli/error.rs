//! CLI-level errors (wraps config and resolver errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::resolver::ResolverError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot open output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Resolver(#[from] ResolverError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
