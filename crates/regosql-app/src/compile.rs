//! The `compile` use case: decode a residual document and compile it into a report.

use anyhow::Context;
use regosql_domain::{CompileConfig, Residual, compile_residual};
use regosql_settings::{Overrides, RegosqlConfigV1, ResolvedConfig};
use regosql_types::CompileReport;

use crate::Stopwatch;
use crate::report::{compile_error_report, compiled_report};

/// Input for the compile use case.
#[derive(Clone, Debug)]
pub struct CompileInput<'a> {
    /// Compile response or bare query set, as JSON text.
    pub residual_text: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the compile use case.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// The generated report. Compile failures are reported here, not as `Err`.
    pub report: CompileReport,
    /// The resolved configuration used.
    pub resolved: ResolvedConfig,
}

/// Parse and resolve config text. Empty text means defaults.
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        RegosqlConfigV1::default()
    } else {
        regosql_settings::parse_config_toml(config_text).context("parse config")?
    };

    regosql_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Run the compile use case: resolve config, decode the residual, compile, produce a report.
pub fn run_compile(input: CompileInput<'_>) -> anyhow::Result<CompileOutput> {
    let watch = Stopwatch::start("compile");

    let resolved = load_config(input.config_text, input.overrides)?;
    let residual =
        regosql_opa::decode_compile_response(input.residual_text).context("decode residual")?;

    let report = compile_to_report(&residual, &resolved.compile, &watch);
    Ok(CompileOutput { report, resolved })
}

pub(crate) fn compile_to_report(
    residual: &Residual,
    cfg: &CompileConfig,
    watch: &Stopwatch,
) -> CompileReport {
    let unknown = cfg.unknown.to_string();

    match compile_residual(residual, cfg) {
        Ok(compiled) => {
            tracing::info!(
                %unknown,
                conjunctions = residual.conjunctions.len(),
                where_sql = compiled.where_sql(),
                "residual compiled"
            );
            compiled_report(&unknown, &compiled, watch.run_meta())
        }
        Err(err) => {
            tracing::warn!(%unknown, code = err.code(), error = %err, "residual rejected");
            compile_error_report(&unknown, &err, watch.run_meta())
        }
    }
}
