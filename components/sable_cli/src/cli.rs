//! Command-line arguments

use crate::config;
use crate::error::CliResult;
use clap::{Parser, ValueEnum};
use core_types::{CompileOptions, ModuleKind, TargetVersion};
use std::path::PathBuf;

/// What the compiler writes for each input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmitMode {
    /// JavaScript (or TypeScript with `--types`) source text
    #[default]
    Js,
    /// Indented dump of the parse tree
    Tree,
    /// ESTree syntax tree as JSON
    Ast,
}

/// `--module` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModuleArg {
    /// ES module `import`/`export`
    Esm,
    /// `require` and `exports`
    Commonjs,
}

impl From<ModuleArg> for ModuleKind {
    fn from(arg: ModuleArg) -> Self {
        match arg {
            ModuleArg::Esm => ModuleKind::EsModule,
            ModuleArg::Commonjs => ModuleKind::CommonJs,
        }
    }
}

/// `--target` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    /// ES2015
    #[value(name = "es2015")]
    Es2015,
    /// ES2017
    #[value(name = "es2017")]
    Es2017,
    /// ES2020
    #[value(name = "es2020")]
    Es2020,
    /// Latest syntax
    #[value(name = "esnext")]
    EsNext,
}

impl From<TargetArg> for TargetVersion {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Es2015 => TargetVersion::Es2015,
            TargetArg::Es2017 => TargetVersion::Es2017,
            TargetArg::Es2020 => TargetVersion::Es2020,
            TargetArg::EsNext => TargetVersion::EsNext,
        }
    }
}

/// Sable to JavaScript compiler
#[derive(Debug, Parser)]
#[command(name = "sablec", version, about = "Compile Sable source to JavaScript")]
pub struct Cli {
    /// Source files; standard input is read when none are given
    pub files: Vec<PathBuf>,

    /// Compile inline source instead of files
    #[arg(short, long, value_name = "CODE", conflicts_with = "files")]
    pub eval: Option<String>,

    /// Start the interactive REPL
    #[arg(short, long, conflicts_with_all = ["files", "eval"])]
    pub repl: bool,

    /// Output kind
    #[arg(long, value_enum, default_value_t = EmitMode::Js)]
    pub emit: EmitMode,

    /// Module system of the output
    #[arg(long, value_enum)]
    pub module: Option<ModuleArg>,

    /// Language level of the output
    #[arg(long, value_enum)]
    pub target: Option<TargetArg>,

    /// Function that builds JSX elements (keeps JSX syntax when absent)
    #[arg(long, value_name = "NAME")]
    pub jsx_factory: Option<String>,

    /// Keep type annotations (TypeScript output)
    #[arg(long)]
    pub types: bool,

    /// Write one output file per input into this directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// JSON options file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Compile options from the options file, overridden by explicit flags
    ///
    /// # Errors
    /// Returns `CliError::Config` when the options file cannot be used.
    pub fn compile_options(&self) -> CliResult<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => config::load(path)?,
            None => CompileOptions::default(),
        };
        if let Some(module) = self.module {
            options.module_kind = module.into();
        }
        if let Some(target) = self.target {
            options.target = target.into();
        }
        if self.jsx_factory.is_some() {
            options.jsx_factory = self.jsx_factory.clone();
        }
        if self.types {
            options.emit_type_annotations = true;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from(["sablec", "--module", "commonjs", "--target", "es2017", "--types"]).unwrap();
        let options = cli.compile_options().unwrap();
        assert_eq!(options.module_kind, ModuleKind::CommonJs);
        assert_eq!(options.target, TargetVersion::Es2017);
        assert!(options.emit_type_annotations);
    }

    #[test]
    fn test_repl_conflicts_with_files() {
        assert!(Cli::try_parse_from(["sablec", "--repl", "a.sable"]).is_err());
    }
}
