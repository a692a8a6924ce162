use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for regosql compile reports.
pub const SCHEMA_REPORT_V1: &str = "regosql.report.v1";

/// What the compiled residual means for the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Rows must satisfy the `where` predicate.
    Where,
    /// Every row passes: some conjunction carried no constraints.
    Always,
    /// No row passes: the residual had no conjunctions.
    Never,
    /// Compilation or evaluation failed; see `error`.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub duration_ms: u64,
}

/// One compiled conjunction, kept in residual order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConjunctionReport {
    pub sql: String,
    /// Column -> value text, usable for parameterized queries.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

/// Result of a full (non-partial) evaluation, when one was requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub query: String,
    pub allowed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorReport {
    /// Stable code from [`crate::ids`].
    pub code: String,
    pub message: String,
}

/// The compile report envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompileReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    /// Unknown collection the residual was compiled against (e.g. `data.users`).
    pub unknown: String,
    pub outcome: Outcome,

    /// Predicate ready to follow `WHERE `. Absent on error.
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conjunctions: Vec<ConjunctionReport>,

    /// SHA-256 of the where clause, stable across runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl CompileReport {
    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::Error
    }
}
