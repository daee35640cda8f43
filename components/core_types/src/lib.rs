//! Shared types for the Sable compiler.
//!
//! This crate provides the foundational types every compiler component
//! agrees on: compile errors, source locations and compile options.
//!
//! # Overview
//!
//! - [`CompileError`] - A failure to compile, with position and expectations
//! - [`ErrorKind`] - Category of a compile failure
//! - [`SourcePosition`] - Location in the user's original source text
//! - [`CompileOptions`] - Output configuration (types, modules, target, JSX)
//!
//! # Examples
//!
//! ```
//! use core_types::{CompileError, CompileOptions, ErrorKind, ModuleKind};
//!
//! let options = CompileOptions::default().with_module_kind(ModuleKind::CommonJs);
//! assert_eq!(options.module_kind, ModuleKind::CommonJs);
//!
//! let error = CompileError::new(ErrorKind::SyntaxError, "Expected \")\"");
//! assert!(error.is_user_error());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod options;
mod source;

pub use error::{CompileError, ErrorKind};
pub use options::{CompileOptions, ModuleKind, TargetVersion};
pub use source::SourcePosition;
