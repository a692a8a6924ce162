use anyhow::Context;
use regosql_domain::fingerprint::fingerprint_for_predicate;
use regosql_domain::{CompileError, CompiledResidual};
use regosql_types::{
    CompileReport, ConjunctionReport, ErrorReport, Outcome, RunMeta, SCHEMA_REPORT_V1, ToolMeta,
    ids,
};

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "regosql".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn empty_report(unknown: &str, outcome: Outcome, run: RunMeta) -> CompileReport {
    CompileReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run,
        unknown: unknown.to_string(),
        outcome,
        where_clause: None,
        conjunctions: Vec::new(),
        fingerprint: None,
        decision: None,
        error: None,
    }
}

pub(crate) fn compiled_report(
    unknown: &str,
    compiled: &CompiledResidual,
    run: RunMeta,
) -> CompileReport {
    let outcome = match compiled {
        CompiledResidual::Never => Outcome::Never,
        CompiledResidual::Always => Outcome::Always,
        CompiledResidual::Where { .. } => Outcome::Where,
    };
    let where_sql = compiled.where_sql();

    let mut report = empty_report(unknown, outcome, run);
    report.where_clause = Some(where_sql.to_string());
    report.fingerprint = Some(fingerprint_for_predicate(unknown, where_sql));
    report.conjunctions = compiled
        .conjunctions()
        .iter()
        .map(|c| ConjunctionReport {
            sql: c.sql.clone(),
            bindings: c.bindings.clone(),
        })
        .collect();
    report
}

pub(crate) fn error_report(unknown: &str, code: &str, message: String, run: RunMeta) -> CompileReport {
    let mut report = empty_report(unknown, Outcome::Error, run);
    report.error = Some(ErrorReport {
        code: code.to_string(),
        message,
    });
    report
}

pub(crate) fn compile_error_report(unknown: &str, err: &CompileError, run: RunMeta) -> CompileReport {
    error_report(unknown, err.code(), err.to_string(), run)
}

pub fn parse_report_json(text: &str) -> anyhow::Result<CompileReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse regosql report")
}

pub fn serialize_report(report: &CompileReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// 0 on success, 2 when the residual could not be compiled, 1 on any other failure.
pub fn report_exit_code(report: &CompileReport) -> i32 {
    match &report.error {
        None => 0,
        Some(err) if ids::COMPILE_CODES.contains(&err.code.as_str()) => 2,
        Some(_) => 1,
    }
}

/// The most severe exit code across a batch; 0 for an empty batch.
pub fn batch_exit_code(reports: &[CompileReport]) -> i32 {
    reports.iter().map(report_exit_code).max().unwrap_or(0)
}
