use regosql_types::ids;
use std::fmt;

/// Why an operand pair could not be split into a column and a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandIssue {
    /// Neither side references the unknown collection.
    NoUnknownReference,
    /// Both sides reference the unknown collection (a join, not a filter).
    BothSidesUnknown,
    /// The reference does not address a field of a collection element.
    NotAColumn,
}

impl fmt::Display for OperandIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperandIssue::NoUnknownReference => "neither operand references the unknown collection",
            OperandIssue::BothSidesUnknown => "both operands reference the unknown collection",
            OperandIssue::NotAColumn => "reference does not address a column",
        };
        f.write_str(s)
    }
}

/// Compilation failure. Every variant carries the offending expression text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported operator `{operator}` in `{expr}`")]
    UnsupportedOperator { operator: String, expr: String },

    #[error("unrecognized operand in `{expr}`: {reason}")]
    UnrecognizedOperand { reason: OperandIssue, expr: String },

    #[error("comparison `{expr}` has {arity} operand(s), expected 2")]
    MalformedComparison { arity: usize, expr: String },

    #[error("value in `{expr}` has no SQL literal form")]
    UnsupportedValue { expr: String },

    #[error("column `{column}` bound to both {first} and {second} in `{expr}`")]
    ConflictingBinding {
        column: String,
        first: String,
        second: String,
        expr: String,
    },

    #[error("residual has no conjunctions")]
    EmptyResidual,
}

impl CompileError {
    /// Stable code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedOperator { .. } => ids::CODE_UNSUPPORTED_OPERATOR,
            CompileError::UnrecognizedOperand { .. } => ids::CODE_UNRECOGNIZED_OPERAND,
            CompileError::MalformedComparison { .. } => ids::CODE_MALFORMED_COMPARISON,
            CompileError::UnsupportedValue { .. } => ids::CODE_UNSUPPORTED_VALUE,
            CompileError::ConflictingBinding { .. } => ids::CODE_CONFLICTING_BINDING,
            CompileError::EmptyResidual => ids::CODE_EMPTY_RESIDUAL,
        }
    }
}
