//! Integration test runner for unit tests
//! This file makes cargo test discover the unit test modules

#[path = "unit/test_error.rs"]
mod test_error;

#[path = "unit/test_options.rs"]
mod test_options;
