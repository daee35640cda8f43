//! Tracing subscriber setup
//!
//! Nothing is installed unless `SABLE_LOG` or `RUST_LOG` is set. `SABLE_LOG`
//! wins when both are present and takes the usual filter syntax:
//!
//! ```bash
//! SABLE_LOG=debug sablec app.sable
//! SABLE_LOG=codegen=trace SABLE_LOG_FORMAT=json sablec app.sable
//! ```
//!
//! Events always go to stderr so compiled output on stdout stays clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Output format of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text lines
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Format named by a `SABLE_LOG_FORMAT` value
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var("SABLE_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber when logging was requested
///
/// Returns whether a subscriber was installed by this call.
pub fn init_tracing() -> bool {
    if std::env::var_os("SABLE_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return false;
    }

    let filter = build_filter();
    let format = LogFormat::from_value(std::env::var("SABLE_LOG_FORMAT").ok().as_deref());
    match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
    }
}
