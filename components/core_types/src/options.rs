//! Compile options.
//!
//! Options are plain data so the CLI can build them from flags or from a JSON
//! options file:
//!
//! ```json
//! { "emit_type_annotations": true, "module_kind": "commonjs", "target": "es2015" }
//! ```

use serde::Deserialize;

/// Module system used for import/export statements in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// `import`/`export` statements are emitted as written
    #[default]
    #[serde(alias = "esm", alias = "es")]
    EsModule,
    /// Imports become `require` calls, exports become `exports.name` assignments
    #[serde(alias = "cjs")]
    CommonJs,
}

/// Language level of the emitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetVersion {
    /// ES2015: no `**`, no `??`
    Es2015,
    /// ES2017: async functions, `**`, no `??`
    Es2017,
    /// ES2020: nullish coalescing and optional chaining
    Es2020,
    /// Latest syntax, nothing is lowered
    #[default]
    EsNext,
}

impl TargetVersion {
    /// Whether the exponent operator can be emitted as-is
    pub fn supports_exponent_operator(self) -> bool {
        self >= TargetVersion::Es2017
    }

    /// Whether `??` and `??=` can be emitted as-is
    pub fn supports_nullish_coalescing(self) -> bool {
        self >= TargetVersion::Es2020
    }
}

/// Options controlling a single compilation
///
/// # Examples
///
/// ```
/// use core_types::{CompileOptions, TargetVersion};
///
/// let options = CompileOptions::default()
///     .with_type_annotations(true)
///     .with_target(TargetVersion::Es2015)
///     .with_jsx_factory(Some("h".to_string()));
///
/// assert!(options.emit_type_annotations);
/// assert_eq!(options.jsx_factory.as_deref(), Some("h"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Keep type annotations in the output (TypeScript output)
    pub emit_type_annotations: bool,
    /// Module system of the output
    pub module_kind: ModuleKind,
    /// Language level of the output
    pub target: TargetVersion,
    /// Function used to build JSX elements; `None` preserves JSX syntax
    pub jsx_factory: Option<String>,
}

impl CompileOptions {
    /// Enable or disable type annotation output
    pub fn with_type_annotations(mut self, enabled: bool) -> Self {
        self.emit_type_annotations = enabled;
        self
    }

    /// Select the module system
    pub fn with_module_kind(mut self, module_kind: ModuleKind) -> Self {
        self.module_kind = module_kind;
        self
    }

    /// Select the output language level
    pub fn with_target(mut self, target: TargetVersion) -> Self {
        self.target = target;
        self
    }

    /// Select the JSX factory
    pub fn with_jsx_factory(mut self, jsx_factory: Option<String>) -> Self {
        self.jsx_factory = jsx_factory;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CompileOptions::default();
        assert!(!options.emit_type_annotations);
        assert_eq!(options.module_kind, ModuleKind::EsModule);
        assert_eq!(options.target, TargetVersion::EsNext);
        assert_eq!(options.jsx_factory, None);
    }

    #[test]
    fn test_target_feature_gates() {
        assert!(!TargetVersion::Es2015.supports_exponent_operator());
        assert!(TargetVersion::Es2017.supports_exponent_operator());
        assert!(!TargetVersion::Es2017.supports_nullish_coalescing());
        assert!(TargetVersion::EsNext.supports_nullish_coalescing());
    }
}
