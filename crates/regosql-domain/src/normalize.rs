//! Operand normalization: split a binary comparison into a column and a value.

use crate::error::{CompileError, OperandIssue};
use crate::model::{Expr, Term, UnknownCollection};
use crate::policy::LiteralStyle;

/// A comparison reduced to the bare column of the unknown collection and the value it
/// is compared against. The value keeps the engine's term untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnBinding<'a> {
    pub column: String,
    pub value: &'a Term,
}

/// Finds the operand that references `unknown` and strips the collection prefix from it.
///
/// The left operand is checked first; otherwise the right operand must be the column.
pub fn normalize<'a>(
    expr: &'a Expr,
    unknown: &UnknownCollection,
) -> Result<ColumnBinding<'a>, CompileError> {
    let operands = match expr {
        Expr::Call { operands, .. } => operands.as_slice(),
        Expr::Term(_) => &[],
    };
    let [lhs, rhs] = operands else {
        return Err(CompileError::MalformedComparison {
            arity: operands.len(),
            expr: expr.to_string(),
        });
    };

    let unrecognized = |reason| CompileError::UnrecognizedOperand {
        reason,
        expr: expr.to_string(),
    };

    let (column_side, value) = match (unknown.is_referenced_by(lhs), unknown.is_referenced_by(rhs)) {
        (true, false) => (lhs, rhs),
        (false, true) => (rhs, lhs),
        (true, true) => return Err(unrecognized(OperandIssue::BothSidesUnknown)),
        (false, false) => return Err(unrecognized(OperandIssue::NoUnknownReference)),
    };

    let column = unknown
        .column(column_side)
        .ok_or_else(|| unrecognized(OperandIssue::NotAColumn))?;
    Ok(ColumnBinding { column, value })
}

/// Writes a value term in the requested literal style. `None` when the style has no
/// literal for the term (e.g. a reference or an array under [`LiteralStyle::Sql`]).
pub fn render_value(value: &Term, style: LiteralStyle) -> Option<String> {
    match style {
        LiteralStyle::Rego => Some(value.to_string()),
        LiteralStyle::Sql => match value {
            Term::Null => Some("NULL".to_string()),
            Term::Boolean(true) => Some("TRUE".to_string()),
            Term::Boolean(false) => Some("FALSE".to_string()),
            Term::Number(n) => Some(n.clone()),
            Term::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            _ => None,
        },
    }
}
