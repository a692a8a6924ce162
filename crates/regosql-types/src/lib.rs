//! Stable DTOs and IDs used across the regosql workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted compile report
//! - stable string codes for compile and engine errors

#![forbid(unsafe_code)]

pub mod ids;
pub mod report;

pub use report::{
    CompileReport, ConjunctionReport, Decision, ErrorReport, Outcome, RunMeta, SCHEMA_REPORT_V1,
    ToolMeta,
};
