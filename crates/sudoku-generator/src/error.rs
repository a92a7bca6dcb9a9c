//! Generator error taxonomy (spec §7).

use sudoku_core::BoardError;
use sudoku_solver::SolverError;

/// Errors that can occur while configuring or running puzzle generation.
///
/// Per spec §7, `BadInput` is the only error this crate ever raises —
/// `Infeasible` is a `puzzle: None` entry in
/// [`PuzzleAttempt`](crate::PuzzleAttempt) instead.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GeneratorError {
    /// A malformed board, an option outside its documented range, or an
    /// unsolved `config` where a solved one was required.
    #[display("{_0}")]
    #[error(ignore)]
    BadInput(String),
    /// Propagated from the underlying search.
    #[display("{_0}")]
    Solver(#[error(source)] SolverError),
}

impl From<BoardError> for GeneratorError {
    fn from(err: BoardError) -> Self {
        Self::Solver(SolverError::BadInput(err))
    }
}
