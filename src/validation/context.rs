//! Effective-parent tracking.
//!
//! A `NestingScope` is the container a node is checked against. It is `Copy`
//! and passed down by value, so leaving a subtree (normally or with an error)
//! hands the caller back its own, untouched scope.

use crate::ast::Node;

#[derive(Debug, Clone, Copy, Default)]
pub struct NestingScope<'a> {
    parent: Option<&'a Node>,
}

impl<'a> NestingScope<'a> {
    /// Scope of the tree root: nothing to check against.
    pub fn root() -> Self {
        Self { parent: None }
    }

    /// Scope whose effective parent is `parent`.
    pub fn under(parent: &'a Node) -> Self {
        Self {
            parent: Some(parent),
        }
    }

    /// The nearest enclosing non-transparent node, if any.
    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// Scope for the children of `node`.
    ///
    /// Transparent wrappers (`@each`, `@for`, `@if`, `@import`, `@include`,
    /// `@while`) pass the current scope through unchanged.
    pub fn enter(self, node: &'a Node) -> Self {
        if node.kind.is_transparent() {
            self
        } else {
            Self::under(node)
        }
    }
}
