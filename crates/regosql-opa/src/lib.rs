//! Open Policy Agent adapter.
//!
//! - [`decode`]: the engine's JSON AST for partial evaluation results -> domain residual
//! - [`client`]: [`regosql_domain::engine::PolicyEngine`] over OPA's REST API

#![forbid(unsafe_code)]

pub mod client;
pub mod decode;

pub use client::OpaClient;
pub use decode::{DecodeError, decode_compile_response, decode_queries};
