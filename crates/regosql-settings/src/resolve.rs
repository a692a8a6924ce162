use crate::{model::RegosqlConfigV1, presets};
use anyhow::Context;
use regosql_domain::model::UnknownCollection;
use regosql_domain::policy::{CompileConfig, DuplicateColumns, EmptyResidual, LiteralStyle};
use std::time::Duration;

pub const DEFAULT_PROFILE: &str = "strict";
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8181";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub unknown: Option<String>,
    pub literal_style: Option<String>,
    pub engine_url: Option<String>,
    pub query: Option<String>,
    pub decision: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    pub url: String,
    pub query: Option<String>,
    pub decision: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub compile: CompileConfig,
    pub engine: EngineSettings,
}

pub fn resolve_config(
    cfg: RegosqlConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let preset = presets::preset(&profile)
        .with_context(|| format!("unknown profile: {profile} (expected strict|compat)"))?;

    let unknown_s = overrides
        .unknown
        .clone()
        .or(cfg.unknown.clone())
        .context("no unknown collection configured (set `unknown` or pass --unknown)")?;
    let unknown = UnknownCollection::parse(&unknown_s).context("invalid unknown")?;

    let mut compile = CompileConfig::new(unknown);
    compile.empty_residual = preset.empty_residual;
    compile.duplicate_columns = preset.duplicate_columns;
    compile.literal_style = preset.literal_style;

    if let Some(v) = cfg.empty_residual.as_deref() {
        compile.empty_residual = parse_empty_residual(v)?;
    }
    if let Some(v) = cfg.duplicate_columns.as_deref() {
        compile.duplicate_columns = parse_duplicate_columns(v)?;
    }
    if let Some(v) = overrides
        .literal_style
        .as_deref()
        .or(cfg.literal_style.as_deref())
    {
        compile.literal_style = parse_literal_style(v)?;
    }

    let engine = EngineSettings {
        url: overrides
            .engine_url
            .or(cfg.engine.url)
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string()),
        query: overrides.query.or(cfg.engine.query),
        decision: overrides.decision.or(cfg.engine.decision),
        timeout: Duration::from_millis(
            overrides
                .timeout_ms
                .or(cfg.engine.timeout_ms)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        ),
    };

    Ok(ResolvedConfig {
        profile: preset.profile,
        compile,
        engine,
    })
}

fn parse_empty_residual(v: &str) -> anyhow::Result<EmptyResidual> {
    match v {
        "deny" => Ok(EmptyResidual::Deny),
        "reject" => Ok(EmptyResidual::Reject),
        other => anyhow::bail!("unknown empty_residual: {other} (expected deny|reject)"),
    }
}

fn parse_duplicate_columns(v: &str) -> anyhow::Result<DuplicateColumns> {
    match v {
        "reject_conflicts" | "reject" => Ok(DuplicateColumns::RejectConflicts),
        "last_wins" => Ok(DuplicateColumns::LastWins),
        other => {
            anyhow::bail!("unknown duplicate_columns: {other} (expected reject_conflicts|last_wins)")
        }
    }
}

fn parse_literal_style(v: &str) -> anyhow::Result<LiteralStyle> {
    match v {
        "rego" => Ok(LiteralStyle::Rego),
        "sql" => Ok(LiteralStyle::Sql),
        other => anyhow::bail!("unknown literal_style: {other} (expected rego|sql)"),
    }
}
