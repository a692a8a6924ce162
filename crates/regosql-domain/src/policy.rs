use crate::model::UnknownCollection;

/// What an empty residual (zero conjunctions) compiles to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyResidual {
    /// The engine found no way for the rule to pass: deny every row.
    #[default]
    Deny,
    /// Refuse to compile; the caller must handle the case itself.
    Reject,
}

/// How repeated equality comparisons on one column within a conjunction are bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateColumns {
    /// Identical repeats are merged; differing values fail the conjunction.
    #[default]
    RejectConflicts,
    /// The last comparison wins in the binding map.
    LastWins,
}

/// How comparison values are written into the SQL text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiteralStyle {
    /// The engine's own textual form (`"bob"`, `42`, `true`).
    #[default]
    Rego,
    /// SQL literals (`'bob'`, `42`, `TRUE`, `NULL`). Non-scalar values are rejected.
    Sql,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileConfig {
    pub unknown: UnknownCollection,
    pub empty_residual: EmptyResidual,
    pub duplicate_columns: DuplicateColumns,
    pub literal_style: LiteralStyle,
}

impl CompileConfig {
    pub fn new(unknown: UnknownCollection) -> Self {
        Self {
            unknown,
            empty_residual: EmptyResidual::default(),
            duplicate_columns: DuplicateColumns::default(),
            literal_style: LiteralStyle::default(),
        }
    }
}
