//! Comparison operators the compiler can express in SQL.
//!
//! Supporting a new operator means one entry in [`OPERATORS`] plus its [`SqlOperator`]
//! variant; the conjunction compiler does not change.

use crate::error::CompileError;
use crate::model::Expr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlOperator {
    Eq,
}

impl SqlOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlOperator::Eq => "=",
        }
    }

    /// Equality comparisons also contribute a column binding.
    pub fn is_equality(self) -> bool {
        matches!(self, SqlOperator::Eq)
    }
}

/// Engine operator name -> SQL operator. `eq` is unification (`=`), `equal` is `==`.
const OPERATORS: &[(&str, SqlOperator)] = &[("eq", SqlOperator::Eq), ("equal", SqlOperator::Eq)];

pub fn lookup(name: &str) -> Option<SqlOperator> {
    OPERATORS
        .iter()
        .find(|(engine_name, _)| *engine_name == name)
        .map(|(_, op)| *op)
}

/// Resolves the SQL operator of a call expression.
///
/// Negated calls are rejected: `not eq(..)` has no equality column binding.
pub fn map_operator(expr: &Expr) -> Result<SqlOperator, CompileError> {
    let Expr::Call { negated, .. } = expr else {
        return Err(CompileError::UnsupportedOperator {
            operator: String::new(),
            expr: expr.to_string(),
        });
    };
    let name = expr.operator_name().unwrap_or_default();

    match lookup(&name) {
        Some(op) if !negated => Ok(op),
        _ => Err(CompileError::UnsupportedOperator {
            operator: if *negated { format!("not {name}") } else { name },
            expr: expr.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use crate::test_support::{eq, users_field};

    #[test]
    fn equality_maps_to_sql_equals() {
        assert_eq!(map_operator(&eq(users_field("a"), Term::number(1))), Ok(SqlOperator::Eq));
        let strict = Expr::call("equal", vec![users_field("a"), Term::number(1)]);
        assert_eq!(map_operator(&strict).map(SqlOperator::as_sql), Ok("="));
    }

    #[test]
    fn unsupported_operator_names_the_operator() {
        let expr = Expr::call("neq", vec![users_field("a"), Term::number(1)]);
        let err = map_operator(&expr).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedOperator {
                operator: "neq".to_string(),
                expr: "neq(data.users[_].a, 1)".to_string(),
            }
        );
    }

    #[test]
    fn namespaced_operator_is_unsupported() {
        let expr = Expr::call("internal.member_2", vec![Term::number(1), users_field("a")]);
        let err = map_operator(&expr).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnsupportedOperator { ref operator, .. } if operator == "internal.member_2"
        ));
    }

    #[test]
    fn negated_equality_is_unsupported() {
        let expr = eq(users_field("a"), Term::number(1)).negate();
        let err = map_operator(&expr).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnsupportedOperator { ref operator, .. } if operator == "not eq"
        ));
    }
}
