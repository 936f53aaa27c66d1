//! AST module for parsed Sass stylesheets
//!
//! This module provides the node types the nesting checker walks. Trees are
//! produced by an external parser (or deserialized from JSON) and are only
//! ever borrowed by the checker.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

pub mod builder;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A single node of a stylesheet tree.
///
/// Every node carries the file it was parsed from and the line it starts on,
/// so errors can point back at the source. Import nodes hold the top-level
/// nodes of the resolved imported file as their children.
///
/// # Examples
///
/// ```rust
/// use sass_nesting::ast::{Node, NodeKind};
/// let rule = Node::rule("a", 1).with_children(vec![Node::comment(2)]);
/// assert_eq!(rule.kind.name(), "rule");
/// assert_eq!(rule.children.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub line: usize,
}

/// The closed set of stylesheet node kinds with their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// The document itself. `template` is the full source text.
    Root {
        #[serde(default)]
        template: String,
    },
    Rule {
        selector: String,
    },
    Property(Property),
    /// A generic `@directive`, e.g. `@font-face` or `@page`.
    Directive {
        value: String,
    },
    /// `@media`; a specialised directive.
    Media {
        query: String,
    },
    /// `@mixin` definition.
    MixinDef {
        name: String,
    },
    /// `@include` invocation.
    Mixin {
        name: String,
    },
    Function {
        name: String,
    },
    Return,
    /// `$name: value`
    Variable {
        name: String,
    },
    Comment,
    Debug,
    Warn,
    Each,
    For,
    If,
    While,
    Import {
        path: String,
    },
    Charset {
        name: String,
    },
    Extend {
        selector: String,
    },
}

/// Payload of a property declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropValue,
    #[serde(default)]
    pub syntax: PropSyntax,
}

/// The parsed value of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum PropValue {
    /// A plain, unquoted string literal such as `hover` in `:a hover`.
    String(String),
    /// Any other SassScript expression, kept in its source form.
    Script(String),
}

/// Which declaration syntax a property was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropSyntax {
    /// `name: value`
    #[default]
    New,
    /// `:name value`
    Old,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl NodeKind {
    /// Stable snake_case name of the kind, used in rule names and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Root { .. } => "root",
            NodeKind::Rule { .. } => "rule",
            NodeKind::Property(_) => "prop",
            NodeKind::Directive { .. } => "directive",
            NodeKind::Media { .. } => "media",
            NodeKind::MixinDef { .. } => "mixindef",
            NodeKind::Mixin { .. } => "mixin",
            NodeKind::Function { .. } => "function",
            NodeKind::Return => "return",
            NodeKind::Variable { .. } => "variable",
            NodeKind::Comment => "comment",
            NodeKind::Debug => "debug",
            NodeKind::Warn => "warn",
            NodeKind::Each => "each",
            NodeKind::For => "for",
            NodeKind::If => "if",
            NodeKind::While => "while",
            NodeKind::Import { .. } => "import",
            NodeKind::Charset { .. } => "charset",
            NodeKind::Extend { .. } => "extend",
        }
    }

    /// Wrapper kinds whose children see through them to the enclosing container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sass_nesting::ast::NodeKind;
    /// assert!(NodeKind::If.is_transparent());
    /// assert!(!NodeKind::Rule { selector: "a".into() }.is_transparent());
    /// ```
    pub const fn is_transparent(&self) -> bool {
        matches!(
            self,
            NodeKind::Each
                | NodeKind::For
                | NodeKind::If
                | NodeKind::Import { .. }
                | NodeKind::Mixin { .. }
                | NodeKind::While
        )
    }

    /// True for generic directives and their specialisations (`@media`).
    pub const fn is_directive(&self) -> bool {
        matches!(self, NodeKind::Directive { .. } | NodeKind::Media { .. })
    }
}

impl Node {
    /// Builds a node of the given kind with no children and no filename.
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            filename: None,
            line,
        }
    }

    /// The source template, if this is a root node.
    pub fn template(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Root { template } => Some(template),
            _ => None,
        }
    }

    /// Hint appended to "properties are only allowed within ..." errors.
    ///
    /// A valueless old-syntax property such as a bare `:hover` is usually a
    /// pseudo-class selector missing its escape, so the hint suggests the
    /// escaped form. Returns `None` for every node that is not such a property.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sass_nesting::ast::{Node, PropSyntax, PropValue};
    /// let prop = Node::property("hover", PropValue::String(String::new()), 1)
    ///     .with_syntax(PropSyntax::Old);
    /// assert_eq!(
    ///     prop.selector_hint().as_deref(),
    ///     Some("\nIf \":hover\" should be a selector, use \"\\:hover\" instead.")
    /// );
    /// ```
    pub fn selector_hint(&self) -> Option<String> {
        let NodeKind::Property(prop) = &self.kind else {
            return None;
        };
        if prop.syntax == PropSyntax::New {
            return None;
        }
        let PropValue::String(value) = &prop.value else {
            return None;
        };
        if !value.is_empty() {
            return None;
        }
        let declaration = prop.declaration();
        Some(format!(
            "\nIf {} should be a selector, use \"\\{}\" instead.",
            dump(&declaration),
            declaration
        ))
    }
}

impl Property {
    /// Renders the declaration the way it was written.
    pub fn declaration(&self) -> String {
        let value = match &self.value {
            PropValue::String(s) | PropValue::Script(s) => s.as_str(),
        };
        let rendered = match self.syntax {
            PropSyntax::Old => format!(":{} {}", self.name, value),
            PropSyntax::New => format!("{}: {}", self.name, value),
        };
        rendered.trim_end().to_string()
    }
}

// ------------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------------

/// Double-quotes `s` with Ruby `String#dump` escaping: named escapes for
/// common control characters, `\xNN` for the rest, and `\uNNNN` (or
/// `\u{N}` beyond the BMP) for anything outside ASCII.
fn dump(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{08}' => out.push_str("\\b"),
            '\u{07}' => out.push_str("\\a"),
            '\u{1B}' => out.push_str("\\e"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c if c.is_ascii() => out.push(c),
            c if (c as u32) <= 0xFFFF => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push_str(&format!("\\u{{{:X}}}", c as u32)),
        }
    }
    out.push('"');
    out
}
