use crate::error::CompileError;
use crate::model::{Conjunction, Expr, Residual};
use crate::normalize::{normalize, render_value};
use crate::operator::map_operator;
use crate::policy::{CompileConfig, DuplicateColumns, EmptyResidual};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// One conjunction as SQL text plus its equality bindings.
///
/// A conjunction with no comparisons compiles to empty text and no bindings; it places
/// no constraint on the row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledConjunction {
    pub sql: String,
    pub bindings: BTreeMap<String, String>,
}

impl CompiledConjunction {
    pub fn is_unconstrained(&self) -> bool {
        self.sql.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompiledResidual {
    /// The residual had no conjunctions: no row can satisfy the rule.
    Never,
    /// Some conjunction had no constraints: every row satisfies the rule.
    Always,
    Where {
        sql: String,
        conjunctions: Vec<CompiledConjunction>,
    },
}

impl CompiledResidual {
    /// Text to place after `WHERE `.
    pub fn where_sql(&self) -> &str {
        match self {
            CompiledResidual::Never => "FALSE",
            CompiledResidual::Always => "TRUE",
            CompiledResidual::Where { sql, .. } => sql,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, CompiledResidual::Never)
    }

    pub fn is_always(&self) -> bool {
        matches!(self, CompiledResidual::Always)
    }

    pub fn conjunctions(&self) -> &[CompiledConjunction] {
        match self {
            CompiledResidual::Where { conjunctions, .. } => conjunctions,
            _ => &[],
        }
    }
}

/// Compiles one conjunction: `col = v AND col2 = v2`, in expression order.
///
/// Non-call expressions are skipped. Any failing comparison fails the whole conjunction.
pub fn compile_conjunction(
    conjunction: &Conjunction,
    cfg: &CompileConfig,
) -> Result<CompiledConjunction, CompileError> {
    let mut fragments = Vec::with_capacity(conjunction.exprs.len());
    let mut bindings = BTreeMap::new();

    for expr in &conjunction.exprs {
        if !matches!(expr, Expr::Call { .. }) {
            continue;
        }

        let op = map_operator(expr)?;
        let binding = normalize(expr, &cfg.unknown)?;
        let value = render_value(binding.value, cfg.literal_style).ok_or_else(|| {
            CompileError::UnsupportedValue {
                expr: expr.to_string(),
            }
        })?;

        fragments.push(format!("{} {} {}", binding.column, op.as_sql(), value));

        if op.is_equality() {
            bind(&mut bindings, binding.column, value, expr, cfg.duplicate_columns)?;
        }
    }

    Ok(CompiledConjunction {
        sql: fragments.join(" AND "),
        bindings,
    })
}

fn bind(
    bindings: &mut BTreeMap<String, String>,
    column: String,
    value: String,
    expr: &Expr,
    duplicates: DuplicateColumns,
) -> Result<(), CompileError> {
    match (bindings.entry(column), duplicates) {
        (Entry::Vacant(slot), _) => {
            slot.insert(value);
        }
        (Entry::Occupied(mut slot), DuplicateColumns::LastWins) => {
            slot.insert(value);
        }
        (Entry::Occupied(slot), DuplicateColumns::RejectConflicts) => {
            if *slot.get() != value {
                return Err(CompileError::ConflictingBinding {
                    column: slot.key().clone(),
                    first: slot.get().clone(),
                    second: value,
                    expr: expr.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Compiles a residual into one predicate: compiled conjunctions joined with ` OR `.
///
/// Aborts on the first failing conjunction; no partial predicate is produced.
pub fn compile_residual(
    residual: &Residual,
    cfg: &CompileConfig,
) -> Result<CompiledResidual, CompileError> {
    if residual.is_empty() {
        return match cfg.empty_residual {
            EmptyResidual::Deny => Ok(CompiledResidual::Never),
            EmptyResidual::Reject => Err(CompileError::EmptyResidual),
        };
    }

    let conjunctions = residual
        .conjunctions
        .iter()
        .map(|c| compile_conjunction(c, cfg))
        .collect::<Result<Vec<_>, _>>()?;

    if conjunctions.iter().any(CompiledConjunction::is_unconstrained) {
        return Ok(CompiledResidual::Always);
    }

    let sql = conjunctions
        .iter()
        .map(|c| c.sql.as_str())
        .collect::<Vec<_>>()
        .join(" OR ");

    Ok(CompiledResidual::Where { sql, conjunctions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use crate::policy::LiteralStyle;
    use crate::test_support::{config, eq, users_field};

    fn login_and_password() -> Conjunction {
        Conjunction::new(vec![
            eq(users_field("login"), Term::string("bob")),
            eq(users_field("password"), Term::string("pass")),
        ])
    }

    #[test]
    fn conjunction_joins_with_and_and_collects_bindings() {
        let compiled = compile_conjunction(&login_and_password(), &config()).expect("compile");
        assert_eq!(compiled.sql, "login = \"bob\" AND password = \"pass\"");
        assert_eq!(compiled.bindings.len(), 2);
        assert_eq!(compiled.bindings["login"], "\"bob\"");
        assert_eq!(compiled.bindings["password"], "\"pass\"");
    }

    #[test]
    fn single_conjunction_residual() {
        let residual = Residual::new(vec![login_and_password()]);
        let compiled = compile_residual(&residual, &config()).expect("compile");
        assert_eq!(
            compiled.where_sql(),
            "login = \"bob\" AND password = \"pass\""
        );
        assert_eq!(compiled.conjunctions().len(), 1);
    }

    #[test]
    fn conjunctions_join_with_or() {
        let residual = Residual::new(vec![
            Conjunction::new(vec![eq(users_field("login"), Term::string("bob"))]),
            Conjunction::new(vec![eq(users_field("login"), Term::string("ali"))]),
        ]);
        let compiled = compile_residual(&residual, &config()).expect("compile");
        assert_eq!(compiled.where_sql(), "login = \"bob\" OR login = \"ali\"");
    }

    #[test]
    fn non_call_expressions_are_skipped() {
        let conjunction = Conjunction::new(vec![
            Expr::Term(Term::Boolean(true)),
            eq(Term::string("bob"), users_field("login")),
            Expr::Term(Term::path("input", ["debug"])),
        ]);
        let compiled = compile_conjunction(&conjunction, &config()).expect("compile");
        assert_eq!(compiled.sql, "login = \"bob\"");
    }

    #[test]
    fn unsupported_operator_fails_without_partial_text() {
        let conjunction = Conjunction::new(vec![
            eq(users_field("login"), Term::string("bob")),
            Expr::call("neq", vec![users_field("password"), Term::string("pass")]),
        ]);
        let err = compile_conjunction(&conjunction, &config()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { ref operator, .. } if operator == "neq"));

        let residual = Residual::new(vec![login_and_password(), conjunction]);
        assert!(compile_residual(&residual, &config()).is_err());
    }

    #[test]
    fn empty_residual_is_never_by_default() {
        let compiled = compile_residual(&Residual::default(), &config()).expect("compile");
        assert!(compiled.is_never());
        assert_eq!(compiled.where_sql(), "FALSE");
        assert!(compiled.conjunctions().is_empty());
    }

    #[test]
    fn empty_residual_can_be_rejected() {
        let mut cfg = config();
        cfg.empty_residual = EmptyResidual::Reject;
        assert_eq!(
            compile_residual(&Residual::default(), &cfg),
            Err(CompileError::EmptyResidual)
        );
    }

    #[test]
    fn unconstrained_conjunction_makes_residual_always_true() {
        let residual = Residual::new(vec![
            Conjunction::new(vec![eq(users_field("login"), Term::string("bob"))]),
            Conjunction::new(vec![Expr::Term(Term::Boolean(true))]),
        ]);
        let compiled = compile_residual(&residual, &config()).expect("compile");
        assert!(compiled.is_always());
        assert_eq!(compiled.where_sql(), "TRUE");
    }

    #[test]
    fn empty_conjunction_compiles_to_nothing() {
        let compiled = compile_conjunction(&Conjunction::default(), &config()).expect("compile");
        assert!(compiled.is_unconstrained());
        assert!(compiled.bindings.is_empty());
    }

    #[test]
    fn conflicting_duplicate_column_is_rejected() {
        let conjunction = Conjunction::new(vec![
            eq(users_field("login"), Term::string("bob")),
            eq(users_field("login"), Term::string("ali")),
        ]);
        let err = compile_conjunction(&conjunction, &config()).unwrap_err();
        assert_eq!(
            err,
            CompileError::ConflictingBinding {
                column: "login".to_string(),
                first: "\"bob\"".to_string(),
                second: "\"ali\"".to_string(),
                expr: "eq(data.users[_].login, \"ali\")".to_string(),
            }
        );
    }

    #[test]
    fn identical_duplicate_column_is_merged() {
        let conjunction = Conjunction::new(vec![
            eq(users_field("login"), Term::string("bob")),
            eq(Term::string("bob"), users_field("login")),
        ]);
        let compiled = compile_conjunction(&conjunction, &config()).expect("compile");
        assert_eq!(compiled.sql, "login = \"bob\" AND login = \"bob\"");
        assert_eq!(compiled.bindings.len(), 1);
    }

    #[test]
    fn last_wins_overwrites_duplicate_binding() {
        let mut cfg = config();
        cfg.duplicate_columns = DuplicateColumns::LastWins;
        let conjunction = Conjunction::new(vec![
            eq(users_field("login"), Term::string("bob")),
            eq(users_field("login"), Term::string("ali")),
        ]);
        let compiled = compile_conjunction(&conjunction, &cfg).expect("compile");
        assert_eq!(compiled.sql, "login = \"bob\" AND login = \"ali\"");
        assert_eq!(compiled.bindings["login"], "\"ali\"");
    }

    #[test]
    fn sql_literal_style() {
        let mut cfg = config();
        cfg.literal_style = LiteralStyle::Sql;
        let compiled = compile_conjunction(&login_and_password(), &cfg).expect("compile");
        assert_eq!(compiled.sql, "login = 'bob' AND password = 'pass'");
        assert_eq!(compiled.bindings["login"], "'bob'");
    }

    #[test]
    fn sql_literal_style_rejects_composite_values() {
        let mut cfg = config();
        cfg.literal_style = LiteralStyle::Sql;
        let conjunction = Conjunction::new(vec![eq(
            users_field("roles"),
            Term::Array(vec![Term::string("admin")]),
        )]);
        let err = compile_conjunction(&conjunction, &cfg).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedValue { .. }));
    }
}
