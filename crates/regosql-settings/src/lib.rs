//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{EngineConfig, RegosqlConfigV1};
pub use resolve::{EngineSettings, Overrides, ResolvedConfig};

/// Parse `regosql.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<RegosqlConfigV1> {
    let cfg: RegosqlConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (profile + file settings + overrides).
pub fn resolve_config(
    cfg: RegosqlConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
