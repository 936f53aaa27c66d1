//! Defines the command-line arguments and subcommands for the sass-nesting CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sass-nesting",
    version,
    about = "Checks parsed Sass stylesheet trees for illegal nesting."
)]
pub struct NestingArgs {
    /// Log every rule that fires (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check serialized stylesheet trees (JSON) for illegal nesting.
    Check {
        /// Tree files, or directories searched recursively for `*.json`.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// How failures are reported.
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,

        /// Name used in traces for nodes that carry no filename.
        #[arg(long, default_value = "an unknown file")]
        default_filename: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// miette report with a source excerpt.
    Human,
    /// Sass-style "Syntax error ... on line N of file" trace.
    Trace,
    /// One JSON object per checked file.
    Json,
}
