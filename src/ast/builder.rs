//! Fluent constructors for stylesheet trees.
//!
//! Parsers and tests build trees through these helpers instead of spelling
//! out every `Node` literal.

use super::{Node, NodeKind, PropSyntax, PropValue, Property};

impl Node {
    pub fn root(template: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Root {
                template: template.into(),
            },
            1,
        )
    }

    pub fn rule(selector: impl Into<String>, line: usize) -> Self {
        Self::new(
            NodeKind::Rule {
                selector: selector.into(),
            },
            line,
        )
    }

    /// A new-syntax (`name: value`) property.
    pub fn property(name: impl Into<String>, value: PropValue, line: usize) -> Self {
        Self::new(
            NodeKind::Property(Property {
                name: name.into(),
                value,
                syntax: PropSyntax::New,
            }),
            line,
        )
    }

    pub fn directive(value: impl Into<String>, line: usize) -> Self {
        Self::new(
            NodeKind::Directive {
                value: value.into(),
            },
            line,
        )
    }

    pub fn media(query: impl Into<String>, line: usize) -> Self {
        Self::new(
            NodeKind::Media {
                query: query.into(),
            },
            line,
        )
    }

    pub fn mixin_def(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::MixinDef { name: name.into() }, line)
    }

    pub fn mixin(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Mixin { name: name.into() }, line)
    }

    pub fn function(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Function { name: name.into() }, line)
    }

    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Variable { name: name.into() }, line)
    }

    pub fn import(path: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Import { path: path.into() }, line)
    }

    pub fn charset(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Charset { name: name.into() }, line)
    }

    pub fn extend(selector: impl Into<String>, line: usize) -> Self {
        Self::new(
            NodeKind::Extend {
                selector: selector.into(),
            },
            line,
        )
    }

    pub fn return_(line: usize) -> Self {
        Self::new(NodeKind::Return, line)
    }

    pub fn comment(line: usize) -> Self {
        Self::new(NodeKind::Comment, line)
    }

    pub fn debug(line: usize) -> Self {
        Self::new(NodeKind::Debug, line)
    }

    pub fn warn(line: usize) -> Self {
        Self::new(NodeKind::Warn, line)
    }

    pub fn each(line: usize) -> Self {
        Self::new(NodeKind::Each, line)
    }

    pub fn for_(line: usize) -> Self {
        Self::new(NodeKind::For, line)
    }

    pub fn if_(line: usize) -> Self {
        Self::new(NodeKind::If, line)
    }

    pub fn while_(line: usize) -> Self {
        Self::new(NodeKind::While, line)
    }

    // ------------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------------

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the filename on this node and every descendant that has none yet.
    ///
    /// Descendants that already carry a filename (e.g. the contents of an
    /// import) keep it.
    pub fn in_file(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        self.set_missing_filename(&filename);
        self
    }

    /// Switches a property to the given declaration syntax. No-op for other kinds.
    pub fn with_syntax(mut self, syntax: PropSyntax) -> Self {
        if let NodeKind::Property(prop) = &mut self.kind {
            prop.syntax = syntax;
        }
        self
    }

    fn set_missing_filename(&mut self, filename: &str) {
        if self.filename.is_none() {
            self.filename = Some(filename.to_string());
        }
        for child in &mut self.children {
            child.set_missing_filename(filename);
        }
    }
}
