//! Decoding of partial evaluation results from OPA's JSON AST.
//!
//! Accepted documents:
//! - a compile API response: `{"result": {"queries": [[expr, ...], ...]}}`
//! - the bare result object: `{"queries": [...]}`
//! - the bare query set: `[[expr, ...], ...]`
//!
//! A missing `queries` key means the engine found no conjunction at all.

use regosql_domain::model::{Conjunction, Expr, Residual, Term};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported term type `{0}`")]
    UnsupportedTermType(String),

    #[error("malformed `{kind}` term: {reason}")]
    MalformedTerm { kind: String, reason: &'static str },

    #[error("expression has no terms")]
    EmptyExpression,

    #[error("unrecognized document: expected a compile response or a query set")]
    UnrecognizedDocument,
}

#[derive(Debug, Default, Deserialize)]
struct CompileResult {
    #[serde(default)]
    queries: Option<Vec<Vec<RawExpr>>>,
    #[serde(default)]
    support: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawExpr {
    #[serde(default)]
    negated: bool,
    terms: RawTerms,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTerms {
    Call(Vec<RawTerm>),
    Single(RawTerm),
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

/// Decodes a compile response (or bare query set) from text.
pub fn decode_compile_response(text: &str) -> Result<Residual, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    decode_queries(&value)
}

/// Decodes a compile response (or bare query set) from a parsed JSON value.
pub fn decode_queries(value: &Value) -> Result<Residual, DecodeError> {
    let result = match value {
        Value::Array(_) => CompileResult {
            queries: Some(Vec::<Vec<RawExpr>>::deserialize(value)?),
            support: Vec::new(),
        },
        Value::Object(map) if map.contains_key("result") => {
            CompileResult::deserialize(&map["result"])?
        }
        Value::Object(map) if map.contains_key("queries") || map.is_empty() => {
            CompileResult::deserialize(value)?
        }
        _ => return Err(DecodeError::UnrecognizedDocument),
    };

    if !result.support.is_empty() {
        tracing::warn!(
            modules = result.support.len(),
            "residual depends on support modules; references into them cannot be compiled"
        );
    }

    let conjunctions = result
        .queries
        .unwrap_or_default()
        .into_iter()
        .map(|query| {
            query
                .into_iter()
                .map(expr)
                .collect::<Result<Vec<_>, _>>()
                .map(Conjunction::new)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Residual::new(conjunctions))
}

fn expr(raw: RawExpr) -> Result<Expr, DecodeError> {
    match raw.terms {
        RawTerms::Single(t) => Ok(Expr::Term(term(t)?)),
        RawTerms::Call(terms) => {
            let mut terms = terms.into_iter();
            let operator = term(terms.next().ok_or(DecodeError::EmptyExpression)?)?;
            let operands = terms.map(term).collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Call {
                negated: raw.negated,
                operator,
                operands,
            })
        }
    }
}

fn term(raw: RawTerm) -> Result<Term, DecodeError> {
    let malformed = |reason| DecodeError::MalformedTerm {
        kind: raw.kind.clone(),
        reason,
    };

    match raw.kind.as_str() {
        "null" => Ok(Term::Null),
        "boolean" => raw
            .value
            .as_bool()
            .map(Term::Boolean)
            .ok_or_else(|| malformed("expected a boolean value")),
        // With `arbitrary_precision` the number prints exactly as the engine wrote it.
        "number" => match &raw.value {
            Value::Number(n) => Ok(Term::Number(n.to_string())),
            _ => Err(malformed("expected a number value")),
        },
        "string" => raw
            .value
            .as_str()
            .map(Term::string)
            .ok_or_else(|| malformed("expected a string value")),
        "var" => raw
            .value
            .as_str()
            .map(Term::var)
            .ok_or_else(|| malformed("expected a string value")),
        "ref" => {
            let segments = terms(&raw.value).ok_or_else(|| malformed("expected a term array"))??;
            if segments.is_empty() {
                return Err(malformed("reference has no head"));
            }
            Ok(Term::Ref(segments))
        }
        "array" => Ok(Term::Array(
            terms(&raw.value).ok_or_else(|| malformed("expected a term array"))??,
        )),
        "set" => Ok(Term::Set(
            terms(&raw.value).ok_or_else(|| malformed("expected a term array"))??,
        )),
        "call" => Ok(Term::Call(
            terms(&raw.value).ok_or_else(|| malformed("expected a term array"))??,
        )),
        "object" => {
            let pairs: Vec<(RawTerm, RawTerm)> = Vec::deserialize(&raw.value)
                .map_err(|_| malformed("expected an array of key/value pairs"))?;
            let pairs = pairs
                .into_iter()
                .map(|(k, v)| Ok((term(k)?, term(v)?)))
                .collect::<Result<Vec<_>, DecodeError>>()?;
            Ok(Term::Object(pairs))
        }
        other => Err(DecodeError::UnsupportedTermType(other.to_string())),
    }
}

/// `None` when `value` is not an array of term objects.
fn terms(value: &Value) -> Option<Result<Vec<Term>, DecodeError>> {
    let raw = Vec::<RawTerm>::deserialize(value).ok()?;
    Some(raw.into_iter().map(term).collect())
}
