//! Defines the command-line arguments and subcommands for the yovec CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "yovec",
    version,
    about = "Lower vector/matrix programs into flat scalar assignments."
)]
pub struct YovecArgs {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a parsed program (JSON syntax tree) to an output tree.
    Compile {
        /// The JSON syntax tree produced by the parser.
        #[arg(required = true)]
        file: PathBuf,
        /// YAML options file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output representation.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write output here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep register names instead of mangling them.
        #[arg(long)]
        no_mangle: bool,
        /// Do not require export-style alias names to be declared variables.
        #[arg(long)]
        unchecked_aliases: bool,
    },
    /// Check a parsed program for errors without writing output.
    Check {
        /// The JSON syntax tree produced by the parser.
        #[arg(required = true)]
        file: PathBuf,
        /// YAML options file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Output representations for `compile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Output syntax tree as JSON, for the printer.
    Json,
    /// Output syntax tree as an s-expression.
    Tree,
    /// One infix line per output line.
    Listing,
}
