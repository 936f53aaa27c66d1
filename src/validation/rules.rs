//! The nesting rule table.
//!
//! Rules are looked up by node kind in two directions: what a container
//! refuses to hold (`child_rule`) and what a node refuses to live in
//! (`parent_rule`). Kinds without an entry accept everything.

use crate::ast::{Node, NodeKind};

/// A named legality predicate. Returns the error message on violation.
#[derive(Clone, Copy)]
pub struct NestingRule {
    pub name: &'static str,
    check: fn(parent: &Node, child: &Node) -> Option<String>,
}

impl NestingRule {
    pub fn check(&self, parent: &Node, child: &Node) -> Option<String> {
        (self.check)(parent, child)
    }
}

impl std::fmt::Debug for NestingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NestingRule").field(&self.name).finish()
    }
}

/// A rule that fired, with the message it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static str,
    pub message: String,
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Restriction a container of kind `parent` places on its children.
pub fn child_rule(parent: &NodeKind) -> Option<NestingRule> {
    match parent {
        NodeKind::Function { .. } => Some(FUNCTION_CHILD),
        NodeKind::Property(_) => Some(PROP_CHILD),
        _ => None,
    }
}

/// Restriction a node of kind `child` places on its container.
pub fn parent_rule(child: &NodeKind) -> Option<NestingRule> {
    match child {
        NodeKind::Charset { .. } => Some(CHARSET_PARENT),
        NodeKind::Extend { .. } => Some(EXTEND_PARENT),
        NodeKind::Function { .. } => Some(FUNCTION_PARENT),
        NodeKind::Import { .. } => Some(IMPORT_PARENT),
        NodeKind::MixinDef { .. } => Some(MIXINDEF_PARENT),
        NodeKind::Property(_) => Some(PROP_PARENT),
        NodeKind::Return => Some(RETURN_PARENT),
        _ => None,
    }
}

/// Checks `child` against its effective `parent`.
///
/// The container's child rule is consulted first; the child's parent rule
/// only runs when the container had nothing to say.
pub fn check_pair(parent: &Node, child: &Node) -> Option<Violation> {
    let fired = |rule: NestingRule| {
        rule.check(parent, child).map(|message| Violation {
            rule: rule.name,
            message,
        })
    };
    child_rule(&parent.kind)
        .and_then(fired)
        .or_else(|| parent_rule(&child.kind).and_then(fired))
}

// ============================================================================
// RULES
// ============================================================================

const CHARSET_PARENT: NestingRule = NestingRule {
    name: "charset_parent",
    check: invalid_charset_parent,
};
const EXTEND_PARENT: NestingRule = NestingRule {
    name: "extend_parent",
    check: invalid_extend_parent,
};
const FUNCTION_PARENT: NestingRule = NestingRule {
    name: "function_parent",
    check: invalid_function_parent,
};
const FUNCTION_CHILD: NestingRule = NestingRule {
    name: "function_child",
    check: invalid_function_child,
};
const IMPORT_PARENT: NestingRule = NestingRule {
    name: "import_parent",
    check: invalid_import_parent,
};
const MIXINDEF_PARENT: NestingRule = NestingRule {
    name: "mixindef_parent",
    check: invalid_mixindef_parent,
};
const PROP_CHILD: NestingRule = NestingRule {
    name: "prop_child",
    check: invalid_prop_child,
};
const PROP_PARENT: NestingRule = NestingRule {
    name: "prop_parent",
    check: invalid_prop_parent,
};
const RETURN_PARENT: NestingRule = NestingRule {
    name: "return_parent",
    check: invalid_return_parent,
};

fn invalid_charset_parent(parent: &Node, _child: &Node) -> Option<String> {
    (!is_root(parent)).then(|| "@charset may only be used at the root of a document.".into())
}

fn invalid_extend_parent(parent: &Node, _child: &Node) -> Option<String> {
    let allowed = matches!(
        parent.kind,
        NodeKind::Rule { .. } | NodeKind::MixinDef { .. }
    );
    (!allowed).then(|| "Extend directives may only be used within rules.".into())
}

fn invalid_function_parent(parent: &Node, _child: &Node) -> Option<String> {
    (!is_root(parent)).then(|| "Functions may only be defined at the root of a document.".into())
}

fn invalid_function_child(_parent: &Node, child: &Node) -> Option<String> {
    let allowed = matches!(
        child.kind,
        NodeKind::Comment
            | NodeKind::Debug
            | NodeKind::Each
            | NodeKind::For
            | NodeKind::If
            | NodeKind::Return
            | NodeKind::Variable { .. }
            | NodeKind::Warn
            | NodeKind::While
    );
    (!allowed)
        .then(|| "Functions can only contain variable declarations and control directives.".into())
}

fn invalid_import_parent(parent: &Node, _child: &Node) -> Option<String> {
    (!is_root(parent))
        .then(|| "Import directives may only be used at the root of a document.".into())
}

fn invalid_mixindef_parent(parent: &Node, _child: &Node) -> Option<String> {
    (!is_root(parent)).then(|| "Mixins may only be defined at the root of a document.".into())
}

fn invalid_prop_child(_parent: &Node, child: &Node) -> Option<String> {
    let allowed = matches!(child.kind, NodeKind::Comment | NodeKind::Property(_));
    (!allowed).then(|| "Illegal nesting: Only properties may be nested beneath properties.".into())
}

fn invalid_prop_parent(parent: &Node, child: &Node) -> Option<String> {
    let allowed = parent.kind.is_directive()
        || matches!(
            parent.kind,
            NodeKind::Rule { .. } | NodeKind::Property(_) | NodeKind::MixinDef { .. }
        );
    (!allowed).then(|| {
        format!(
            "Properties are only allowed within rules, directives, or other properties.{}",
            child.selector_hint().unwrap_or_default()
        )
    })
}

fn invalid_return_parent(parent: &Node, _child: &Node) -> Option<String> {
    let allowed = matches!(parent.kind, NodeKind::Function { .. });
    (!allowed).then(|| "@return may only be used within a function.".into())
}

fn is_root(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Root { .. })
}
