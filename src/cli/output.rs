//! Handles all user-facing output for the CLI.
//!
//! Passing files are listed on stdout; failures go to stderr as a miette
//! report or a Sass-style trace, or to stdout as JSON lines.

use crate::cli::args::OutputFormat;
use crate::cli::CliError;
use crate::errors::{print_error, Frame, NestingError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Result of checking one tree file.
#[derive(Debug)]
pub enum FileOutcome {
    Passed,
    Failed(NestingError),
    /// The file could not be read or is not a stylesheet tree.
    Unreadable(CliError),
}

/// Per-outcome counts for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub unreadable: usize,
}

/// One line of `--format json` output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub file: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub frames: &'a [Frame],
}

impl<'a> JsonReport<'a> {
    pub fn new(path: &Path, outcome: &'a FileOutcome) -> Self {
        let file = path.display().to_string();
        match outcome {
            FileOutcome::Passed => Self {
                file,
                ok: true,
                message: None,
                rule: None,
                error: None,
                frames: &[],
            },
            FileOutcome::Failed(err) => Self {
                file,
                ok: false,
                message: Some(err.message()),
                rule: err.rule(),
                error: None,
                frames: err.frames(),
            },
            FileOutcome::Unreadable(err) => Self {
                file,
                ok: false,
                message: None,
                rule: None,
                error: Some(err.to_string()),
                frames: &[],
            },
        }
    }
}

pub struct Reporter {
    format: OutputFormat,
    default_filename: String,
    stdout: StandardStream,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, default_filename: &str) -> Self {
        Self {
            format,
            default_filename: default_filename.to_string(),
            stdout: StandardStream::stdout(ColorChoice::Auto),
            summary: Summary::default(),
        }
    }

    pub fn report(&mut self, path: &Path, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Passed => self.summary.passed += 1,
            FileOutcome::Failed(_) => self.summary.failed += 1,
            FileOutcome::Unreadable(_) => self.summary.unreadable += 1,
        }

        match self.format {
            OutputFormat::Json => {
                let report = JsonReport::new(path, &outcome);
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("Error: failed to serialize report: {e}"),
                }
            }
            OutputFormat::Human => match outcome {
                FileOutcome::Passed => self.status(Color::Green, "ok", path),
                FileOutcome::Failed(err) => {
                    self.status(Color::Red, "FAILED", path);
                    print_error(err);
                }
                FileOutcome::Unreadable(err) => {
                    self.status(Color::Yellow, "ERROR", path);
                    eprintln!("Error: {err}");
                }
            },
            OutputFormat::Trace => match outcome {
                FileOutcome::Passed => self.status(Color::Green, "ok", path),
                FileOutcome::Failed(err) => {
                    self.status(Color::Red, "FAILED", path);
                    eprintln!("{}", err.backtrace_report(&self.default_filename));
                }
                FileOutcome::Unreadable(err) => {
                    self.status(Color::Yellow, "ERROR", path);
                    eprintln!("Error: {err}");
                }
            },
        }
    }

    /// Prints the pass/fail summary (not in JSON mode) and returns the counts.
    pub fn finish(&mut self) -> Summary {
        let summary = self.summary;
        if self.format == OutputFormat::Json {
            return summary;
        }
        let color = if summary.failed == 0 && summary.unreadable == 0 {
            Color::Green
        } else {
            Color::Red
        };
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(
            self.stdout,
            "{} passed, {} failed",
            summary.passed, summary.failed
        );
        if summary.unreadable > 0 {
            let _ = write!(self.stdout, ", {} unreadable", summary.unreadable);
        }
        let _ = writeln!(self.stdout);
        let _ = self.stdout.reset();
        summary
    }

    fn status(&mut self, color: Color, label: &str, path: &Path) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stdout, "{label}");
        let _ = self.stdout.reset();
        let _ = writeln!(self.stdout, " {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_for_failure_lists_frames() {
        let mut err = NestingError::new("@return may only be used within a function.")
            .with_rule("return_parent");
        err.modify_backtrace(Some("_lib.scss"), Some(4));
        err.add_backtrace(Some("main.scss".into()), Some(1));
        let outcome = FileOutcome::Failed(err);

        let json = serde_json::to_value(JsonReport::new(Path::new("tree.json"), &outcome)).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["rule"], "return_parent");
        assert_eq!(json["frames"][0]["filename"], "_lib.scss");
        assert_eq!(json["frames"][1]["line"], 1);
    }

    #[test]
    fn json_report_for_pass_omits_message() {
        let outcome = FileOutcome::Passed;
        let json = serde_json::to_value(JsonReport::new(Path::new("tree.json"), &outcome)).unwrap();
        assert_eq!(json["ok"], true);
        assert!(json.get("message").is_none());
        assert_eq!(json["frames"], serde_json::json!([]));
    }

    #[test]
    fn json_report_for_unreadable_file_carries_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let outcome = FileOutcome::Unreadable(CliError::Json {
            path: "broken.json".into(),
            source,
        });
        let json = serde_json::to_value(JsonReport::new(Path::new("broken.json"), &outcome)).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json.get("message").is_none());
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("'broken.json' is not a valid stylesheet tree"));
    }
}
