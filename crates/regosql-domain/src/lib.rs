//! Pure residual compilation (no IO).
//!
//! Input: a residual produced by partial policy evaluation, plus the compile policy.
//! Output: a SQL predicate and per-conjunction column bindings.

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod normalize;
pub mod operator;
pub mod policy;

mod compile;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use compile::{CompiledConjunction, CompiledResidual, compile_conjunction, compile_residual};
pub use error::{CompileError, OperandIssue};
pub use model::{Conjunction, Expr, Residual, Term, UnknownCollection};
pub use policy::{CompileConfig, DuplicateColumns, EmptyResidual, LiteralStyle};
