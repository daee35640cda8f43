//! Batch compilation of files, inline code and standard input
//!
//! Every input is compiled on its own. A failing input is reported as
//! `label:line:column: Kind: message` and the batch moves on; the caller
//! decides the exit status from the returned [`BatchReport`].

use crate::cli::EmitMode;
use crate::error::{CliError, CliResult};
use core_types::{CompileError, CompileOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Inputs that produced output
    pub compiled: usize,
    /// Inputs that failed to read, compile or write
    pub failed: usize,
}

impl BatchReport {
    /// True when no input failed
    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

/// Compiles inputs with one set of options and one output mode
#[derive(Debug, Clone)]
pub struct Driver {
    options: CompileOptions,
    emit: EmitMode,
    out_dir: Option<PathBuf>,
}

impl Driver {
    /// Create a driver writing to standard output
    pub fn new(options: CompileOptions, emit: EmitMode) -> Self {
        Self {
            options,
            emit,
            out_dir: None,
        }
    }

    /// Write one file per input into `out_dir` instead of standard output
    pub fn with_out_dir(mut self, out_dir: Option<PathBuf>) -> Self {
        self.out_dir = out_dir;
        self
    }

    /// Options every input is compiled with
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one source text in the selected mode
    ///
    /// The result always ends with a newline.
    ///
    /// # Errors
    /// Returns the compiler's error unchanged.
    pub fn compile_source(&self, source: &str) -> Result<String, CompileError> {
        let mut output = match self.emit {
            EmitMode::Js => codegen::compile(source, &self.options)?,
            EmitMode::Tree => codegen::dump_parse_tree(source)?,
            EmitMode::Ast => codegen::compile_to_ast_json(source, &self.options)?,
        };
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }

    /// Extension of files written to the output directory
    pub fn output_extension(&self) -> &'static str {
        match self.emit {
            EmitMode::Js if self.options.emit_type_annotations => "ts",
            EmitMode::Js => "js",
            EmitMode::Tree => "tree",
            EmitMode::Ast => "json",
        }
    }

    /// Path the output for `input` is written to, when an output directory is set
    pub fn output_path(&self, input: &Path) -> Option<PathBuf> {
        let out_dir = self.out_dir.as_ref()?;
        let stem = input.file_stem().unwrap_or(input.as_os_str()).to_string_lossy();
        Some(out_dir.join(format!("{}.{}", stem, self.output_extension())))
    }

    /// Compile one file, writing the output file or returning the text
    ///
    /// Returns `None` when the output went to a file.
    ///
    /// # Errors
    /// Returns `CliError::Io` for read or write failures and
    /// `CliError::Compile` when the source does not compile.
    pub fn compile_file(&self, path: &Path) -> CliResult<Option<String>> {
        let source = std::fs::read_to_string(path)?;
        let output = self.compile_source(&source)?;
        match self.output_path(path) {
            Some(target) => {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&target, output)?;
                tracing::debug!(input = %path.display(), output = %target.display(), "wrote output");
                Ok(None)
            }
            None => Ok(Some(output)),
        }
    }

    /// Compile every file, continuing past failures
    ///
    /// # Errors
    /// Only failures to write to `out` or `err` are returned; compile and
    /// file errors are reported on `err` and counted.
    pub fn run_files(
        &self,
        files: &[PathBuf],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> std::io::Result<BatchReport> {
        let mut report = BatchReport::default();
        for path in files {
            tracing::debug!(input = %path.display(), "compiling");
            match self.compile_file(path) {
                Ok(output) => {
                    if let Some(output) = output {
                        out.write_all(output.as_bytes())?;
                    }
                    report.compiled += 1;
                }
                Err(error) => {
                    report_failure(err, &path.display().to_string(), &error)?;
                    report.failed += 1;
                }
            }
        }
        tracing::debug!(compiled = report.compiled, failed = report.failed, "batch finished");
        Ok(report)
    }

    /// Compile a single in-memory source labelled `label` in diagnostics
    ///
    /// # Errors
    /// Only failures to write to `out` or `err` are returned.
    pub fn run_source(
        &self,
        label: &str,
        source: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> std::io::Result<BatchReport> {
        match self.compile_source(source) {
            Ok(output) => {
                out.write_all(output.as_bytes())?;
                Ok(BatchReport { compiled: 1, failed: 0 })
            }
            Err(error) => {
                report_failure(err, label, &CliError::Compile(error))?;
                Ok(BatchReport { compiled: 0, failed: 1 })
            }
        }
    }
}

fn report_failure(err: &mut impl Write, label: &str, error: &CliError) -> std::io::Result<()> {
    tracing::warn!(input = label, %error, "compilation failed");
    writeln!(err, "{}:{}", label, error)
}
