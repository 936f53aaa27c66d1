//! Nesting checker
//!
//! Walks a stylesheet tree depth-first and fails on the first node that is
//! not allowed inside its effective parent. Errors are enriched with
//! location frames as they unwind: every node fills in missing location
//! fields, import nodes add a frame for the importing file, and the root
//! attaches the document source.

use log::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::errors::{NestingError, SourceTemplate};
use crate::validation::context::NestingScope;
use crate::validation::rules;

/// Checks a whole document.
///
/// # Example
/// ```rust
/// use sass_nesting::ast::{Node, PropValue};
/// use sass_nesting::check_nesting;
///
/// // a { @if $x { color: red } }
/// let tree = Node::root("").with_child(
///     Node::rule("a", 1).with_child(
///         Node::if_(1).with_child(Node::property("color", PropValue::String("red".into()), 1)),
///     ),
/// );
/// assert!(check_nesting(&tree).is_ok());
/// ```
pub fn check_nesting(root: &Node) -> Result<(), NestingError> {
    NestingChecker::visit(root, NestingScope::root())
}

pub struct NestingChecker;

impl NestingChecker {
    /// Checks `node` and its subtree against `scope`.
    ///
    /// Exposed so callers can check a detached subtree under a known
    /// container. The caller's `scope` is never modified.
    pub fn visit<'a>(node: &'a Node, scope: NestingScope<'a>) -> Result<(), NestingError> {
        Self::visit_node(node, scope).map_err(|mut err| {
            err.modify_backtrace(node.filename.as_deref(), Some(node.line));
            err
        })
    }

    fn visit_node<'a>(node: &'a Node, scope: NestingScope<'a>) -> Result<(), NestingError> {
        trace!("visiting {} at line {}", node.kind.name(), node.line);

        if let Some(parent) = scope.parent() {
            if let Some(violation) = rules::check_pair(parent, node) {
                debug!(
                    "{} rejected {} inside {} at {}:{}",
                    violation.rule,
                    node.kind.name(),
                    parent.kind.name(),
                    node.filename.as_deref().unwrap_or("-"),
                    node.line
                );
                return Err(NestingError::new(violation.message).with_rule(violation.rule));
            }
        }

        match &node.kind {
            NodeKind::Root { template } => Self::visit_root(node, template, scope),
            NodeKind::Import { .. } => Self::visit_import(node, scope),
            _ => Self::visit_children(node, scope),
        }
    }

    fn visit_children<'a>(node: &'a Node, scope: NestingScope<'a>) -> Result<(), NestingError> {
        let inner = scope.enter(node);
        node.children
            .iter()
            .try_for_each(|child| Self::visit(child, inner))
    }

    fn visit_root<'a>(
        node: &'a Node,
        template: &str,
        scope: NestingScope<'a>,
    ) -> Result<(), NestingError> {
        Self::visit_children(node, scope).map_err(|mut err| {
            if !template.is_empty() && err.template().is_none() {
                debug!("attaching source of {}", node.filename.as_deref().unwrap_or("stdin"));
                err.attach_template(SourceTemplate::new(node.filename.clone(), template));
            }
            err
        })
    }

    fn visit_import<'a>(node: &'a Node, scope: NestingScope<'a>) -> Result<(), NestingError> {
        Self::visit_children(node, scope).map_err(|mut err| {
            if let Some(first) = node.children.first() {
                err.modify_backtrace(first.filename.as_deref(), None);
            }
            debug!(
                "unwinding through import at {}:{}",
                node.filename.as_deref().unwrap_or("-"),
                node.line
            );
            err.add_backtrace(node.filename.clone(), Some(node.line));
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PropValue;

    fn prop(line: usize) -> Node {
        Node::property("color", PropValue::String("red".into()), line)
    }

    #[test]
    fn root_itself_is_never_checked() {
        // A lone property node checked as the tree top has no parent.
        assert!(check_nesting(&prop(1)).is_ok());
    }

    #[test]
    fn failure_records_offending_node_location() {
        let tree = Node::root("")
            .with_child(Node::rule("a", 1).with_child(Node::charset("UTF-8", 2)))
            .in_file("main.scss");

        let err = check_nesting(&tree).unwrap_err();
        assert_eq!(err.message(), "@charset may only be used at the root of a document.");
        assert_eq!(err.rule(), Some("charset_parent"));
        assert_eq!(err.filename(), Some("main.scss"));
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.frames().len(), 1);
    }

    #[test]
    fn missing_filename_is_filled_by_ancestors() {
        let mut tree = Node::root("").with_child(Node::rule("a", 1).with_child(Node::return_(3)));
        tree.filename = Some("main.scss".into());

        let err = check_nesting(&tree).unwrap_err();
        assert_eq!(err.filename(), Some("main.scss"));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn children_of_failing_node_are_not_visited() {
        // The inner charset would produce a different message if reached.
        let tree = Node::root("").with_child(
            Node::rule("a", 1)
                .with_child(Node::return_(2).with_child(Node::charset("x", 3))),
        );
        let err = check_nesting(&tree).unwrap_err();
        assert_eq!(err.rule(), Some("return_parent"));
    }

    #[test]
    fn first_violation_in_document_order_wins() {
        let tree = Node::root("").with_children(vec![
            Node::rule("a", 1).with_child(prop(2)),
            Node::rule("b", 3).with_child(Node::extend(".a", 4)).with_child(Node::charset("x", 5)),
            Node::return_(6),
        ]);
        let err = check_nesting(&tree).unwrap_err();
        assert_eq!(err.rule(), Some("charset_parent"));
        assert_eq!(err.line(), Some(5));
    }

    #[test]
    fn template_is_attached_at_root() {
        let tree = Node::root("a {\n  @charset 'x';\n}\n")
            .with_child(Node::rule("a", 1).with_child(Node::charset("x", 2)))
            .in_file("main.scss");

        let err = check_nesting(&tree).unwrap_err();
        let template = err.template().unwrap();
        assert_eq!(template.filename.as_deref(), Some("main.scss"));
        assert!(template.text.contains("@charset"));
    }

    #[test]
    fn scope_is_unchanged_after_a_failing_subtree() {
        let rule = Node::rule("a", 1);
        let bad = Node::mixin("m", 2).with_child(Node::function("f", 3));
        let good = Node::if_(4).with_child(prop(5));

        let scope = NestingScope::under(&rule);
        assert!(NestingChecker::visit(&bad, scope).is_err());
        assert!(NestingChecker::visit(&good, scope).is_ok());
        assert!(std::ptr::eq(scope.parent().unwrap(), &rule));
    }
}
