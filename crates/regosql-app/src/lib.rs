//! Use case orchestration for regosql.
//!
//! This crate provides the application layer: use cases that coordinate the settings,
//! engine adapter, pure compiler and render layers. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod compile;
mod evaluate;
mod render;
mod report;
mod stopwatch;

#[cfg(test)]
mod test_support;

pub use compile::{CompileInput, CompileOutput, load_config, run_compile};
pub use evaluate::{EvaluateBatchInput, EvaluateInput, run_evaluate, run_evaluate_batch};
pub use render::{OutputFormat, render_report, render_reports};
pub use report::{batch_exit_code, parse_report_json, report_exit_code, serialize_report};
pub use stopwatch::Stopwatch;

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .with_target(true)
        .try_init();
}
