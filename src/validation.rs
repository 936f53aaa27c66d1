//! Structural validation of stylesheet trees.

pub mod check_nesting;
pub mod context;
pub mod rules;

pub use check_nesting::{check_nesting, NestingChecker};
pub use context::NestingScope;
