//! Sable compiler CLI library
//!
//! Argument parsing, options-file loading, the batch driver and the REPL
//! behind the `sablec` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod repl;

pub use cli::{Cli, EmitMode};
pub use driver::{BatchReport, Driver};
pub use error::{CliError, CliResult};
pub use repl::{ReplSession, ReplStep};
