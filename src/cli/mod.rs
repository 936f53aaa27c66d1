//! The sass-nesting Command-Line Interface.
//!
//! Reads stylesheet trees serialized as JSON, runs the nesting checker on
//! each and reports the outcome.

use crate::ast::Node;
use crate::cli::args::{Command, NestingArgs, OutputFormat};
use crate::cli::output::{FileOutcome, Reporter, Summary};
use crate::validation::check_nesting;
use clap::Parser;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::{fs, process};
use thiserror::Error;
use walkdir::WalkDir;

pub mod args;
pub mod output;

/// Failures that prevent a tree from being checked at all.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid stylesheet tree: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// The main entry point for the CLI.
pub fn run() {
    let args = NestingArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Check {
            paths,
            format,
            default_filename,
        } => handle_check(&paths, format, &default_filename),
    };

    match result {
        Ok(summary) if summary.unreadable > 0 => process::exit(2),
        Ok(summary) if summary.failed > 0 => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // A logger may already be installed when the CLI is driven from tests.
    let _ = builder.try_init();
}

/// Handles the `check` subcommand.
///
/// A file that cannot be read or parsed is reported and skipped; only a
/// failure to enumerate the inputs aborts the run.
fn handle_check(
    paths: &[PathBuf],
    format: OutputFormat,
    default_filename: &str,
) -> Result<Summary, CliError> {
    let files = collect_tree_files(paths)?;
    info!("checking {} tree file(s)", files.len());

    let mut reporter = Reporter::new(format, default_filename);
    for file in &files {
        let outcome = match load_tree(file) {
            Ok(tree) => match check_nesting(&tree) {
                Ok(()) => FileOutcome::Passed,
                Err(err) => {
                    debug!("{} failed: {}", file.display(), err);
                    FileOutcome::Failed(err)
                }
            },
            Err(err) => {
                debug!("skipping {}: {}", file.display(), err);
                FileOutcome::Unreadable(err)
            }
        };
        reporter.report(file, outcome);
    }
    Ok(reporter.finish())
}

/// Expands directories into the `*.json` files below them, in a stable order.
fn collect_tree_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|source| CliError::Walk {
                path: path.clone(),
                source,
            })?;
            let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
            if entry.file_type().is_file() && is_json {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn load_tree(path: &Path) -> Result<Node, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
