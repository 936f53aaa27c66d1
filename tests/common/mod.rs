//! Shared stylesheet trees for the integration tests.

#![allow(dead_code)]

use sass_nesting::ast::{Node, PropSyntax, PropValue};

pub fn prop(name: &str, value: &str, line: usize) -> Node {
    Node::property(name, PropValue::String(value.into()), line)
}

pub fn old_prop(name: &str, value: &str, line: usize) -> Node {
    prop(name, value, line).with_syntax(PropSyntax::Old)
}

/// A document from `main.scss` holding `children` at the top level.
pub fn document(children: Vec<Node>) -> Node {
    Node::root("").with_children(children).in_file("main.scss")
}

/// `@import "<path>"` at `line` of the importing file, whose resolved
/// contents are `imported` (already tagged with their own filename).
pub fn import_of(path: &str, line: usize, imported: Vec<Node>) -> Node {
    Node::import(path, line).with_children(imported)
}

/// Top-level nodes of `_partial.scss`: a valid rule, then a stray `@return`
/// on line 4.
pub fn partial_with_stray_return() -> Vec<Node> {
    vec![
        Node::rule(".ok", 1).with_child(prop("color", "red", 2)),
        Node::return_(4),
    ]
    .into_iter()
    .map(|n| n.in_file("_partial.scss"))
    .collect()
}
