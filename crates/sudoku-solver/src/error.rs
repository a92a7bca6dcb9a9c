//! Solver error taxonomy (spec §7).

use sudoku_core::BoardError;

/// Errors that can occur while configuring or running a search.
///
/// Per spec §7, `BadInput` is the only error this crate ever raises —
/// `Infeasible`, `Timeout`, and `CallbackTermination` are flags on
/// [`SearchResult`](crate::SearchResult) instead.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolverError {
    /// A malformed board was passed in, or a search option was out of range
    /// (e.g. `concurrent_branches == 0`).
    #[display("{_0}")]
    BadInput(#[error(source)] BoardError),
}
