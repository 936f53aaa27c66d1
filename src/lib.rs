pub use crate::errors::{Frame, NestingError, SourceTemplate};

pub mod ast;
pub mod cli;
pub mod errors;
pub mod validation;

// Re-exports for concise imports
pub use ast::{Node, NodeKind};
pub use validation::{check_nesting, NestingChecker, NestingScope};
