use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `regosql.toml` schema v1.
///
/// This is a *user-facing* config model: values stay strings here and are validated
/// during resolution, so error messages can name the offending key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RegosqlConfigV1 {
    /// Optional schema string for tooling (`regosql.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `strict` (default) or `compat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Unknown collection the residual is compiled against, e.g. `data.users`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<String>,

    /// `deny` (compile to FALSE) or `reject` (fail).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_residual: Option<String>,

    /// `reject_conflicts` or `last_wins`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_columns: Option<String>,

    /// `rego` (engine text) or `sql` (SQL literals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal_style: Option<String>,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Where and how to reach the policy engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Server root, e.g. `http://localhost:8181`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Query for partial evaluation, e.g. `data.example.allow == true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Query for full evaluation, e.g. `data.example.allow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,

    /// Per-call timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}
