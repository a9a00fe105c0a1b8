//! Error types for the pairing pipeline.

use thiserror::Error;

/// Failures the pairing pipeline surfaces to a caller.
///
/// None of these are retried internally: an infeasible model stays
/// infeasible, and enlarging a time budget is a caller decision.
#[derive(Error, Debug)]
pub enum SolveError {
    /// Malformed or missing required input, rejected before any model is built.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested model would exceed the decision-variable ceiling.
    #[error("model too large: {variables} decision variables (ceiling {ceiling})")]
    ModelTooLarge { variables: usize, ceiling: usize },

    /// The solver proved that no assignment satisfies all constraints.
    #[error("no feasible room assignment exists")]
    Infeasible,

    /// The time budget ran out before any feasible point was found.
    #[error("time limit reached without a feasible assignment")]
    TimeoutNoSolution,

    /// The MILP backend failed for a reason other than infeasibility.
    #[error("solver backend error: {0}")]
    Backend(String),

    /// The solved variables contradict an invariant the model guarantees.
    #[error("solution violates a model invariant: {0}")]
    InvariantViolation(String),
}

/// Result type for pairing operations.
pub type SolveResult<T> = Result<T, SolveError>;
