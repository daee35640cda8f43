//! Integration test suite for the Sable compiler
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use codegen;
    pub use core_types;
    pub use parser;
    pub use sable_cli;
}
