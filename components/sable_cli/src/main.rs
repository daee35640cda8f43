//! Sable compiler CLI
//!
//! Entry point for `sablec`. Parses CLI arguments, builds the compile options
//! and hands the inputs to the batch driver or the REPL.

use clap::Parser as ClapParser;
use sable_cli::{logging, repl, Cli, Driver};
use std::io::{Read, Write};

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let options = match cli.compile_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    let driver = Driver::new(options, cli.emit).with_out_dir(cli.out_dir.clone());

    if cli.repl {
        if let Err(e) = repl::run_repl(driver) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let report = if let Some(code) = &cli.eval {
        driver.run_source("<eval>", code, &mut out, &mut err)
    } else if cli.files.is_empty() {
        let mut source = String::new();
        match std::io::stdin().read_to_string(&mut source) {
            Ok(_) => driver.run_source("<stdin>", &source, &mut out, &mut err),
            Err(e) => Err(e),
        }
    } else {
        driver.run_files(&cli.files, &mut out, &mut err)
    };

    let code = match report.and_then(|report| out.flush().map(|_| report.exit_code())) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}
