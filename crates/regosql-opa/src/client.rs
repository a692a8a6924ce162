//! Blocking OPA REST client.
//!
//! - partial evaluation: `POST /v1/compile` with `{query, input, unknowns}`
//! - full evaluation: `POST /v1/query` with `{query, input}`. `/v1/query` only returns
//!   variable bindings, so the decision is sent as `regosql_decision := (<decision>)` and
//!   is allowed only when exactly one result binds it to `true`

use crate::decode::decode_queries;
use regosql_domain::engine::{EngineError, EvalContext, FullRequest, PartialRequest, PolicyEngine};
use regosql_domain::model::Residual;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpaClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

/// Variable the decision value is bound to in full evaluation queries.
pub const DECISION_VAR: &str = "regosql_decision";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Vec<serde_json::Map<String, Value>>,
}

impl QueryResponse {
    /// Undefined (no result), ambiguous (several) and non-`true` values all deny.
    fn allowed(&self) -> bool {
        match self.result.as_slice() {
            [bindings] => bindings.get(DECISION_VAR) == Some(&Value::Bool(true)),
            _ => false,
        }
    }
}

fn decision_query(decision: &str) -> String {
    format!("{DECISION_VAR} := ({decision})")
}

impl OpaClient {
    /// `base_url` is the server root, e.g. `http://localhost:8181`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EngineError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, ctx: &EvalContext, endpoint: &str, body: &Value) -> Result<Value, EngineError> {
        ctx.check()?;

        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "engine request");

        let mut request = self.http.post(&url).json(body);
        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                EngineError::DeadlineExceeded
            } else {
                EngineError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| EngineError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        // A cancellation that raced the request still wins.
        ctx.check()?;
        serde_json::from_str(&text).map_err(|e| EngineError::Decode(e.to_string()))
    }
}

impl PolicyEngine for OpaClient {
    fn partial_evaluate(
        &self,
        ctx: &EvalContext,
        request: &PartialRequest,
    ) -> Result<Residual, EngineError> {
        let mut body = json!({
            "query": request.query,
            "unknowns": request.unknowns,
        });
        if let Some(input) = &request.input {
            body["input"] = input.clone();
        }

        let response = self.post(ctx, "/v1/compile", &body)?;
        let residual = decode_queries(&response).map_err(|e| EngineError::Decode(e.to_string()))?;
        tracing::debug!(
            query = %request.query,
            conjunctions = residual.conjunctions.len(),
            "partial evaluation finished"
        );
        Ok(residual)
    }

    fn full_evaluate(&self, ctx: &EvalContext, request: &FullRequest) -> Result<bool, EngineError> {
        let mut body = json!({ "query": decision_query(&request.query) });
        if let Some(input) = &request.input {
            body["input"] = input.clone();
        }

        let response = self.post(ctx, "/v1/query", &body)?;
        let parsed = QueryResponse::deserialize(&response)
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        let allowed = parsed.allowed();
        tracing::debug!(query = %request.query, allowed, "full evaluation finished");
        Ok(allowed)
    }
}
