//! Error types for the CLI

use core_types::CompileError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The source did not compile
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor failure
    #[error("REPL error: {0}")]
    Repl(String),

    /// Unreadable or malformed options file
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
