//! Public facade over regosql's residual compiler.
//!
//! Compile a partial-evaluation residual into a SQL predicate:
//!
//! ```
//! use regosql::{CompileConfig, Conjunction, Expr, Residual, Term, UnknownCollection};
//!
//! let users = UnknownCollection::parse("data.users[_]").unwrap();
//! let login = Term::Ref(vec![
//!     Term::var("data"),
//!     Term::string("users"),
//!     Term::var("$01"),
//!     Term::string("login"),
//! ]);
//! let residual = Residual::new(vec![Conjunction::new(vec![Expr::call(
//!     "eq",
//!     vec![login, Term::string("bob")],
//! )])]);
//!
//! let compiled = regosql::compile_residual(&residual, &CompileConfig::new(users)).unwrap();
//! assert_eq!(compiled.where_sql(), "login = \"bob\"");
//! ```

#![forbid(unsafe_code)]

pub use regosql_domain::engine;
pub use regosql_domain::{
    CompileConfig, CompileError, CompiledConjunction, CompiledResidual, Conjunction,
    DuplicateColumns, EmptyResidual, Expr, LiteralStyle, OperandIssue, Residual, Term,
    UnknownCollection, compile_conjunction, compile_residual,
};
