//! REPL (Read-Compile-Print Loop) implementation
//!
//! Each complete input is compiled and the output printed. Input that fails
//! only because it ended too early (an open block, bracket or string) switches
//! to the `... ` prompt; further lines are collected until an empty line, then
//! the whole buffer is compiled again.

use crate::driver::Driver;
use crate::error::{CliError, CliResult};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = "... ";

/// What the REPL does with one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplStep {
    /// Input is incomplete; read another line
    Continue,
    /// Compiled output for the buffered input
    Output(String),
    /// A genuine compile error
    Error(String),
    /// Text printed for a `.command`
    Message(String),
    /// Leave the REPL
    Exit,
}

/// Input buffering and command handling, independent of the line editor
#[derive(Debug)]
pub struct ReplSession {
    driver: Driver,
    buffer: String,
    in_multiline: bool,
}

impl ReplSession {
    /// Create a session compiling with `driver`
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            buffer: String::new(),
            in_multiline: false,
        }
    }

    /// Prompt for the next line
    pub fn prompt(&self) -> &'static str {
        if self.in_multiline {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        }
    }

    /// Whether lines are being collected for an incomplete input
    pub fn is_multiline(&self) -> bool {
        self.in_multiline
    }

    /// Drop any buffered input
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_multiline = false;
    }

    /// Feed one line of input
    pub fn feed(&mut self, line: &str) -> ReplStep {
        let trimmed = line.trim();
        if !self.in_multiline {
            if matches!(trimmed, "exit" | "quit" | ".exit") {
                return ReplStep::Exit;
            }
            if trimmed.starts_with('.') {
                return ReplStep::Message(self.command(trimmed));
            }
            if trimmed.is_empty() {
                return ReplStep::Continue;
            }
            self.buffer.push_str(line);
            return self.compile();
        }

        if trimmed.is_empty() {
            return self.compile();
        }
        self.buffer.push('\n');
        self.buffer.push_str(line);
        ReplStep::Continue
    }

    /// Buffered input so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn compile(&mut self) -> ReplStep {
        match self.driver.compile_source(&self.buffer) {
            Ok(output) => {
                self.reset();
                ReplStep::Output(output)
            }
            Err(error) if error.is_incomplete_input() => {
                self.in_multiline = true;
                ReplStep::Continue
            }
            Err(error) => {
                self.reset();
                ReplStep::Error(error.to_string())
            }
        }
    }

    fn command(&self, command: &str) -> String {
        match command {
            ".help" => [
                "REPL Commands:",
                "  .help     - Show this help message",
                "  .clear    - Clear the screen",
                "  .options  - Show the compile options",
                "  .exit     - Exit the REPL",
                "  exit      - Exit the REPL",
                "  quit      - Exit the REPL",
            ]
            .join("\n"),
            ".clear" => "\x1B[2J\x1B[1;1H".to_string(),
            ".options" => format!("{:#?}", self.driver.options()),
            _ => format!("Unknown command: {}\nType .help for available commands", command),
        }
    }
}

/// Run the interactive REPL on the terminal
///
/// # Errors
/// Returns `CliError::Repl` when the line editor fails.
pub fn run_repl(driver: Driver) -> CliResult<()> {
    let mut editor =
        DefaultEditor::new().map_err(|e| CliError::Repl(format!("Failed to initialize editor: {}", e)))?;
    let mut session = ReplSession::new(driver);

    println!("Sable compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Type Sable code or 'exit' to quit.");
    println!();

    loop {
        match editor.readline(session.prompt()) {
            Ok(line) => match session.feed(&line) {
                ReplStep::Continue => {}
                ReplStep::Output(output) => {
                    let _ = editor.add_history_entry(output.trim_end());
                    print!("{}", output);
                }
                ReplStep::Error(message) => eprintln!("Error: {}", message),
                ReplStep::Message(message) => println!("{}", message),
                ReplStep::Exit => {
                    println!("Goodbye!");
                    break;
                }
            },
            Err(ReadlineError::Interrupted) => {
                if session.is_multiline() {
                    println!("^C");
                    session.reset();
                } else {
                    println!("Press Ctrl-D or type 'exit' to quit");
                }
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                return Err(CliError::Repl(format!("Readline error: {}", err)));
            }
        }
    }

    Ok(())
}
