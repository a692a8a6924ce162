//! The `evaluate` use case: ask the policy engine for a residual, compile it, and
//! optionally take a full decision as well. A batch repeats both steps for each input
//! document under one timer.

use anyhow::Context;
use regosql_domain::engine::{EngineError, EvalContext, FullRequest, PartialRequest, PolicyEngine};
use regosql_settings::ResolvedConfig;
use regosql_types::{CompileReport, Decision, ids};
use serde_json::Value;

use crate::Stopwatch;
use crate::compile::compile_to_report;
use crate::report::error_report;

pub struct EvaluateInput<'a> {
    pub engine: &'a dyn PolicyEngine,
    pub ctx: &'a EvalContext,
    pub resolved: &'a ResolvedConfig,
    /// `input` document passed to the engine with both requests.
    pub input: Option<Value>,
}

pub struct EvaluateBatchInput<'a> {
    pub engine: &'a dyn PolicyEngine,
    pub ctx: &'a EvalContext,
    pub resolved: &'a ResolvedConfig,
    /// One report is produced per document, in order.
    pub inputs: Vec<Value>,
}

/// Engine failures are reported with code `engine_error`; only a missing query is an `Err`.
pub fn run_evaluate(input: EvaluateInput<'_>) -> anyhow::Result<CompileReport> {
    let watch = Stopwatch::start("evaluate");
    let query = partial_query(input.resolved)?;
    Ok(evaluate_one(
        input.engine,
        input.ctx,
        input.resolved,
        &query,
        input.input,
        &watch,
    ))
}

/// Evaluates every input independently: a failing input gets an error report and the
/// rest still run.
pub fn run_evaluate_batch(input: EvaluateBatchInput<'_>) -> anyhow::Result<Vec<CompileReport>> {
    let watch = Stopwatch::start("evaluate_batch");
    let query = partial_query(input.resolved)?;
    if input.inputs.is_empty() {
        anyhow::bail!("batch has no input documents");
    }

    let reports = input
        .inputs
        .into_iter()
        .enumerate()
        .map(|(index, doc)| {
            let _span = tracing::info_span!("batch", index).entered();
            evaluate_one(
                input.engine,
                input.ctx,
                input.resolved,
                &query,
                Some(doc),
                &watch,
            )
        })
        .collect::<Vec<_>>();

    tracing::info!(inputs = reports.len(), "batch evaluated");
    Ok(reports)
}

fn partial_query(resolved: &ResolvedConfig) -> anyhow::Result<String> {
    resolved
        .engine
        .query
        .clone()
        .context("no partial evaluation query configured (set `engine.query` or pass --query)")
}

fn evaluate_one(
    engine: &dyn PolicyEngine,
    ctx: &EvalContext,
    resolved: &ResolvedConfig,
    query: &str,
    input: Option<Value>,
    watch: &Stopwatch,
) -> CompileReport {
    let unknown = resolved.compile.unknown.to_string();
    let _span = tracing::info_span!("evaluate", %query, %unknown).entered();

    let partial = PartialRequest {
        query: query.to_string(),
        input: input.clone(),
        unknowns: vec![unknown.clone()],
    };
    let residual = match engine.partial_evaluate(ctx, &partial) {
        Ok(residual) => residual,
        Err(err) => return engine_failure(&unknown, &err, watch),
    };

    let mut report = compile_to_report(&residual, &resolved.compile, watch);
    if report.is_error() {
        return report;
    }

    if let Some(decision) = &resolved.engine.decision {
        let full = FullRequest {
            query: decision.clone(),
            input,
        };
        let allowed = match engine.full_evaluate(ctx, &full) {
            Ok(allowed) => allowed,
            Err(err) => return engine_failure(&unknown, &err, watch),
        };
        tracing::info!(decision = %decision, allowed, "full evaluation");
        report.decision = Some(Decision {
            query: decision.clone(),
            allowed,
        });
        report.run = watch.run_meta();
    }

    report
}

fn engine_failure(unknown: &str, err: &EngineError, watch: &Stopwatch) -> CompileReport {
    tracing::error!(error = %err, "policy engine failed");
    error_report(unknown, ids::CODE_ENGINE_ERROR, err.to_string(), watch.run_meta())
}
