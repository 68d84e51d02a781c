//! Engine error type. Per spec.md §7, only the fatal, "should never
//! happen" structural failures are represented as `Err` — `EmptyModel`
//! renders a background-only image, `InvalidConfig` is clamped at the
//! boundary, and `CancelledJob` is the `RenderOutcome::Cancelled`
//! sentinel.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("internal invariant violated: {invariant} ({detail})")]
    InternalInvariantViolated {
        invariant: &'static str,
        detail: String,
    },
}
