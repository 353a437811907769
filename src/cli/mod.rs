//! The yovec Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use miette::Report;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::ast::Node;
use crate::cli::args::{Command, Format, YovecArgs};
use crate::config::Options;
use crate::transpile::env::AliasPolicy;
use crate::{compile, YovecError};

pub mod args;
pub mod output;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = YovecArgs::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Compile {
            file,
            config,
            format,
            output,
            no_mangle,
            unchecked_aliases,
        } => {
            let mut options = load_options_or_exit(config.as_deref());
            if no_mangle {
                options.mangle = false;
            }
            if unchecked_aliases {
                options.alias_policy = AliasPolicy::Unchecked;
            }
            handle_compile(&file, &options, format, output.as_ref());
        }

        Command::Check { file, config } => {
            let options = load_options_or_exit(config.as_deref());
            let program = read_program_or_exit(&file);
            match compile(&program, &options) {
                Ok(compiled) => output::print_status(&format!(
                    "{} ({} lines)",
                    file.display(),
                    compiled.program.children().len()
                )),
                Err(e) => exit_with_error(e),
            }
        }
    }
}

fn handle_compile(file: &Path, options: &Options, format: Format, target: Option<&PathBuf>) {
    let program = read_program_or_exit(file);
    let compiled = compile(&program, options).unwrap_or_else(|e| exit_with_error(e));
    let text = output::render(&compiled.program, format).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    });

    match target {
        Some(path) => {
            if let Err(e) = fs::write(path, text + "\n") {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                process::exit(1);
            }
            output::print_status(&format!("wrote {}", path.display()));
        }
        None => println!("{}", text),
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// `RUST_LOG` wins over `-v`; without either only warnings are shown.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_program_or_exit(path: &Path) -> Node {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path.display(), e);
        process::exit(1);
    });
    let program: Node = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing syntax tree '{}': {}", path.display(), e);
        process::exit(1);
    });
    debug!(file = %path.display(), "loaded program");
    program
}

fn load_options_or_exit(path: Option<&Path>) -> Options {
    let Some(path) = path else {
        return Options::default();
    };
    Options::from_yaml_file(path).unwrap_or_else(|e| {
        eprintln!("Error loading config '{}': {}", path.display(), e);
        process::exit(1);
    })
}

fn exit_with_error(error: YovecError) -> ! {
    let report = Report::new(error);
    eprintln!("{report:?}");
    process::exit(1);
}
