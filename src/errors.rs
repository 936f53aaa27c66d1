//! Nesting Error Handling
//!
//! A single failure type for the nesting pass. It starts life with one empty
//! location frame and is enriched as it unwinds through the traversal, so by
//! the time a caller sees it the frames read like a multi-file call stack.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

pub type SourceArc = Arc<NamedSource<String>>;

/// Source text of the document a failure surfaced through.
#[derive(Debug, Clone)]
pub struct SourceTemplate {
    pub filename: Option<String>,
    pub text: String,
    source: SourceArc,
}

impl SourceTemplate {
    pub fn new(filename: Option<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let name = filename.clone().unwrap_or_else(|| "stdin".to_string());
        Self {
            source: Arc::new(NamedSource::new(name, text.clone())),
            filename,
            text,
        }
    }

    /// Byte range of the 1-based `line`, excluding its line terminator.
    fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (idx, content) in self.text.split_inclusive('\n').enumerate() {
            if idx + 1 == line {
                let len = content.trim_end_matches(['\n', '\r']).len();
                return Some((offset, len));
            }
            offset += content.len();
        }
        None
    }
}

/// One location in the failure's trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub filename: Option<String>,
    pub line: Option<usize>,
}

impl Frame {
    pub fn new(filename: Option<String>, line: Option<usize>) -> Self {
        Self { filename, line }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// An illegal nesting found by the checker.
///
/// `frames[0]` is where the violation happened; each further frame is an
/// `@import` the failure unwound through, outermost last.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct NestingError {
    message: String,
    rule: Option<&'static str>,
    frames: Vec<Frame>,
    #[serde(skip)]
    template: Option<SourceTemplate>,
}

impl NestingError {
    /// Creates a failure with a single, still empty, location frame.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            rule: None,
            frames: vec![Frame::default()],
            template: None,
        }
    }

    /// Records the name of the rule that produced this failure.
    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn rule(&self) -> Option<&'static str> {
        self.rule
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Filename of the innermost frame.
    pub fn filename(&self) -> Option<&str> {
        self.frames.first().and_then(|f| f.filename.as_deref())
    }

    /// Line of the innermost frame.
    pub fn line(&self) -> Option<usize> {
        self.frames.first().and_then(|f| f.line)
    }

    pub fn template(&self) -> Option<&SourceTemplate> {
        self.template.as_ref()
    }

    /// Attaches the document source unless one is already attached.
    pub fn attach_template(&mut self, template: SourceTemplate) {
        if self.template.is_none() {
            self.template = Some(template);
        }
    }

    /// Fills location fields the most recent frames are still missing.
    ///
    /// Walks from the outermost frame inwards. A field a frame already has is
    /// kept and stops that field from propagating further; a field that was
    /// filled keeps propagating to older frames.
    pub fn modify_backtrace(&mut self, filename: Option<&str>, line: Option<usize>) {
        let mut filename = filename;
        let mut line = line;
        for frame in self.frames.iter_mut().rev() {
            if filename.is_none() && line.is_none() {
                break;
            }
            match frame.filename {
                Some(_) => filename = None,
                None => frame.filename = filename.map(str::to_string),
            }
            match frame.line {
                Some(_) => line = None,
                None => frame.line = line,
            }
        }
    }

    /// Appends a new outermost frame.
    pub fn add_backtrace(&mut self, filename: Option<String>, line: Option<usize>) {
        self.frames.push(Frame::new(filename, line));
    }

    /// Renders the failure as a Sass-style syntax error trace.
    ///
    /// Continuation lines of the message are aligned under its first line,
    /// and frames without a filename are attributed to `default_filename`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sass_nesting::NestingError;
    /// let mut err = NestingError::new("@return may only be used within a function.");
    /// err.modify_backtrace(Some("_lib.scss"), Some(4));
    /// err.add_backtrace(Some("main.scss".into()), Some(1));
    /// assert_eq!(
    ///     err.backtrace_report("an unknown file"),
    ///     "Syntax error: @return may only be used within a function.\n        on line 4 of _lib.scss\n        from line 1 of main.scss"
    /// );
    /// ```
    pub fn backtrace_report(&self, default_filename: &str) -> String {
        const PREFIX: &str = "Syntax error: ";
        let mut lines = self.message.split('\n');
        let mut out = format!("{PREFIX}{}", lines.next().unwrap_or_default());
        for rest in lines {
            out.push('\n');
            out.push_str(&" ".repeat(PREFIX.len()));
            out.push_str(rest);
        }
        for (i, frame) in self.frames.iter().enumerate() {
            let verb = if i == 0 { "on" } else { "from" };
            let line = frame.line.map(|l| l.to_string()).unwrap_or_default();
            let file = frame.filename.as_deref().unwrap_or(default_filename);
            out.push_str(&format!("\n        {verb} line {line} of {file}"));
        }
        out
    }

    /// Whether the innermost frame points into the attached template.
    fn innermost_in_template(&self) -> Option<(&SourceTemplate, usize)> {
        let template = self.template.as_ref()?;
        let frame = self.frames.first()?;
        if frame.filename != template.filename {
            return None;
        }
        Some((template, frame.line?))
    }
}

impl Diagnostic for NestingError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.rule
            .map(|rule| Box::new(format!("nesting::{rule}")) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.frames.len() < 2 {
            return None;
        }
        let chain = self.frames[1..]
            .iter()
            .map(|f| {
                format!(
                    "imported from line {} of {}",
                    f.line.map(|l| l.to_string()).unwrap_or_default(),
                    f.filename.as_deref().unwrap_or("an unknown file")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Some(Box::new(chain))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        let (template, _) = self.innermost_in_template()?;
        Some(&*template.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (template, line) = self.innermost_in_template()?;
        let (offset, len) = template.line_span(line)?;
        let label = self.message.lines().next().unwrap_or_default().to_string();
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(label),
            offset,
            len.max(1),
        ))))
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a NestingError with full miette diagnostics
pub fn print_error(error: NestingError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_error_has_one_empty_frame() {
        let err = NestingError::new("boom");
        assert_eq!(err.frames(), &[Frame::default()]);
        assert_eq!(err.filename(), None);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn modify_backtrace_only_fills_missing_fields() {
        let mut err = NestingError::new("boom");
        err.modify_backtrace(Some("a.scss"), Some(3));
        err.modify_backtrace(Some("b.scss"), Some(9));
        assert_eq!(err.filename(), Some("a.scss"));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn modify_backtrace_stops_at_frames_that_have_the_field() {
        let mut err = NestingError::new("boom");
        err.modify_backtrace(None, Some(3));
        err.add_backtrace(Some("main.scss".into()), Some(1));
        err.modify_backtrace(Some("_partial.scss"), None);

        assert_eq!(err.frames()[0], Frame::new(None, Some(3)));
        assert_eq!(err.frames()[1], Frame::new(Some("main.scss".into()), Some(1)));
    }

    #[test]
    fn filled_fields_keep_propagating_to_older_frames() {
        let mut err = NestingError::new("boom");
        err.add_backtrace(None, Some(2));
        err.modify_backtrace(Some("x.scss"), None);

        assert_eq!(err.frames()[0].filename.as_deref(), Some("x.scss"));
        assert_eq!(err.frames()[1].filename.as_deref(), Some("x.scss"));
    }

    #[test]
    fn attach_template_keeps_the_first() {
        let mut err = NestingError::new("boom");
        err.attach_template(SourceTemplate::new(Some("inner.scss".into()), "a"));
        err.attach_template(SourceTemplate::new(Some("outer.scss".into()), "b"));
        assert_eq!(err.template().unwrap().text, "a");
    }

    #[test]
    fn multi_line_message_is_aligned() {
        let mut err = NestingError::new("first\nsecond");
        err.modify_backtrace(None, Some(7));
        assert_eq!(
            err.backtrace_report("an unknown file"),
            "Syntax error: first\n              second\n        on line 7 of an unknown file"
        );
    }

    #[test]
    fn line_span_covers_requested_line() {
        let template = SourceTemplate::new(None, "a {\n  b: c;\n}\n");
        assert_eq!(template.line_span(1), Some((0, 3)));
        assert_eq!(template.line_span(2), Some((4, 7)));
        assert_eq!(template.line_span(3), Some((12, 1)));
        assert_eq!(template.line_span(9), None);
    }

    #[test]
    fn diagnostic_labels_offending_line() {
        let mut err = NestingError::new("Extend directives may only be used within rules.")
            .with_rule("extend_parent");
        err.modify_backtrace(Some("main.scss"), Some(2));
        err.attach_template(SourceTemplate::new(
            Some("main.scss".into()),
            "a {\n  b: { @extend .c; }\n}\n",
        ));

        let output = format!("{:?}", miette::Report::new(err));
        assert!(output.contains("nesting::extend_parent"));
        assert!(output.contains("Extend directives may only be used within rules."));
    }

    #[test]
    fn no_label_when_failure_is_in_another_file() {
        let mut err = NestingError::new("boom");
        err.modify_backtrace(Some("_partial.scss"), Some(2));
        err.attach_template(SourceTemplate::new(Some("main.scss".into()), "a\nb\n"));
        assert!(err.labels().is_none());
        assert!(err.source_code().is_none());
    }
}
