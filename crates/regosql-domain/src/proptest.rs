//! Property-based tests for the compiler.
//!
//! These tests use proptest to verify invariants around:
//! - Column bindings of equality-only conjunctions
//! - Operand side independence
//! - Output determinism and OR/AND join shape
//! - Rejection of unsupported operators

use crate::compile::{compile_conjunction, compile_residual};
use crate::error::CompileError;
use crate::model::{Conjunction, Expr, Residual, Term};
use crate::normalize::normalize;
use crate::test_support::{config, eq, users, users_field};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_field() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

fn arb_value() -> impl Strategy<Value = Term> {
    prop_oneof![
        "[a-zA-Z0-9 '\"]{0,12}".prop_map(Term::String),
        (-1000i64..1000).prop_map(Term::number),
        any::<bool>().prop_map(Term::Boolean),
        Just(Term::Null),
    ]
}

/// A comparison with the column on a random side.
fn arb_comparison() -> impl Strategy<Value = (String, Term, bool)> {
    (arb_field(), arb_value(), any::<bool>())
}

fn comparison_expr(field: &str, value: &Term, column_left: bool) -> Expr {
    if column_left {
        eq(users_field(field), value.clone())
    } else {
        eq(value.clone(), users_field(field))
    }
}

/// Equality-only conjunction over distinct fields.
fn arb_conjunction() -> impl Strategy<Value = Vec<(String, Term, bool)>> {
    prop::collection::vec(arb_comparison(), 1..6).prop_map(|items| {
        let mut seen = BTreeSet::new();
        items
            .into_iter()
            .filter(|(f, _, _)| seen.insert(f.clone()))
            .collect()
    })
}

fn build_conjunction(items: &[(String, Term, bool)]) -> Conjunction {
    Conjunction::new(
        items
            .iter()
            .map(|(f, v, left)| comparison_expr(f, v, *left))
            .collect(),
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn bindings_cover_every_distinct_field(items in arb_conjunction()) {
        let compiled = compile_conjunction(&build_conjunction(&items), &config()).unwrap();

        let keys: BTreeSet<&str> = compiled.bindings.keys().map(String::as_str).collect();
        let fields: BTreeSet<&str> = items.iter().map(|(f, _, _)| f.as_str()).collect();
        prop_assert_eq!(keys, fields);

        for (field, value, _) in &items {
            prop_assert_eq!(&compiled.bindings[field], &value.to_string());
        }
    }

    #[test]
    fn swapping_operands_yields_same_binding((field, value, _) in arb_comparison()) {
        let left = comparison_expr(&field, &value, true);
        let right = comparison_expr(&field, &value, false);
        let unknown = users();

        let a = normalize(&left, &unknown).unwrap();
        let b = normalize(&right, &unknown).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn compiling_twice_is_byte_identical(
        conjunctions in prop::collection::vec(arb_conjunction(), 1..5)
    ) {
        let residual = Residual::new(conjunctions.iter().map(|c| build_conjunction(c)).collect());
        let a = compile_residual(&residual, &config()).unwrap();
        let b = compile_residual(&residual, &config()).unwrap();
        prop_assert_eq!(a.where_sql().as_bytes(), b.where_sql().as_bytes());
    }

    #[test]
    fn residual_is_or_of_and_joined_conjunctions(
        conjunctions in prop::collection::vec(arb_conjunction(), 1..5)
    ) {
        let residual = Residual::new(conjunctions.iter().map(|c| build_conjunction(c)).collect());
        let compiled = compile_residual(&residual, &config()).unwrap();

        let expected = conjunctions
            .iter()
            .map(|items| {
                items
                    .iter()
                    .map(|(f, v, _)| format!("{f} = {v}"))
                    .collect::<Vec<_>>()
                    .join(" AND ")
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        prop_assert_eq!(compiled.where_sql(), expected.as_str());

        let per_conjunction: Vec<&str> =
            compiled.conjunctions().iter().map(|c| c.sql.as_str()).collect();
        prop_assert_eq!(per_conjunction.join(" OR "), expected);
    }

    #[test]
    fn neq_anywhere_rejects_the_conjunction(
        items in arb_conjunction(),
        position in any::<prop::sample::Index>(),
        (field, value, _) in arb_comparison(),
    ) {
        let mut conjunction = build_conjunction(&items);
        let at = position.index(conjunction.exprs.len() + 1);
        conjunction
            .exprs
            .insert(at, Expr::call("neq", vec![users_field(&field), value]));

        let err = compile_conjunction(&conjunction, &config()).unwrap_err();
        let is_unsupported = matches!(
            err,
            CompileError::UnsupportedOperator { ref operator, .. } if operator == "neq"
        );
        prop_assert!(is_unsupported);
    }
}
