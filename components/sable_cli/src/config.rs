//! JSON options file
//!
//! Any subset of the compile options may be given; missing keys keep their
//! defaults:
//!
//! ```json
//! { "module_kind": "commonjs", "target": "es2015", "jsx_factory": "h" }
//! ```

use crate::error::{CliError, CliResult};
use core_types::CompileOptions;
use std::path::Path;

/// Read compile options from a JSON file
///
/// # Errors
/// Returns `CliError::Config` naming the file when it cannot be read or parsed.
pub fn load(path: &Path) -> CliResult<CompileOptions> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| CliError::Config(format!("{}: {}", path.display(), error)))?;
    let options = parse(&text).map_err(|error| match error {
        CliError::Config(message) => CliError::Config(format!("{}: {}", path.display(), message)),
        other => other,
    })?;
    tracing::debug!(path = %path.display(), ?options, "loaded options file");
    Ok(options)
}

/// Parse compile options from JSON text
///
/// # Errors
/// Returns `CliError::Config` for malformed JSON or unknown option values.
pub fn parse(text: &str) -> CliResult<CompileOptions> {
    serde_json::from_str(text).map_err(|error| CliError::Config(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ModuleKind, TargetVersion};

    #[test]
    fn test_partial_options_keep_defaults() {
        let options = parse(r#"{ "target": "es2015" }"#).unwrap();
        assert_eq!(options.target, TargetVersion::Es2015);
        assert_eq!(options.module_kind, ModuleKind::EsModule);
        assert!(!options.emit_type_annotations);
    }

    #[test]
    fn test_module_aliases() {
        assert_eq!(parse(r#"{ "module_kind": "cjs" }"#).unwrap().module_kind, ModuleKind::CommonJs);
        assert_eq!(parse(r#"{ "module_kind": "esm" }"#).unwrap().module_kind, ModuleKind::EsModule);
    }

    #[test]
    fn test_unknown_value_is_config_error() {
        let error = parse(r#"{ "target": "es3" }"#).unwrap_err();
        assert!(matches!(error, CliError::Config(_)));
    }

    #[test]
    fn test_missing_file_names_path() {
        let error = load(Path::new("/nonexistent/sable.json")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/sable.json"));
    }
}
