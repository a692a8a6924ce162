//! Port to the policy evaluation engine.
//!
//! The compiler never talks to an engine; use cases do, through [`PolicyEngine`]. Every
//! call takes an explicit [`EvalContext`] owned by the caller.

use crate::model::Residual;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Failure reported by the engine. Passed through to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Transport(String),

    #[error("engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("engine response could not be decoded: {0}")]
    Decode(String),

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,
}

/// Per-call evaluation context: optional deadline plus a cooperative cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct EvalContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

/// Cancels every clone of the [`EvalContext`] it was taken from.
#[derive(Clone, Debug)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl EvalContext {
    /// No deadline, not cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::default(),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fails when the context is cancelled or past its deadline.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(EngineError::DeadlineExceeded);
        }
        Ok(())
    }
}

/// Partial evaluation request: `unknowns` are left symbolic in the residual.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialRequest {
    pub query: String,
    pub input: Option<Value>,
    pub unknowns: Vec<String>,
}

/// Full evaluation request: the query is decided against concrete data.
#[derive(Clone, Debug, PartialEq)]
pub struct FullRequest {
    pub query: String,
    pub input: Option<Value>,
}

pub trait PolicyEngine {
    fn partial_evaluate(
        &self,
        ctx: &EvalContext,
        request: &PartialRequest,
    ) -> Result<Residual, EngineError>;

    fn full_evaluate(&self, ctx: &EvalContext, request: &FullRequest) -> Result<bool, EngineError>;
}
