//! Board representation and low-level cell/house mechanics for a sudoku
//! configuration/puzzle generator engine.
//!
//! This crate owns the C1-C3 components: precomputed cell geometry, the
//! digit/candidate bitsets, and the [`Board`] state machine that keeps
//! per-house `used`/`valid` flags in sync as cells are set or cleared.
//! Search (`sudoku-solver`) and generation (`sudoku-generator`) are built on
//! top of it.

mod board;
mod cell_mask;
mod digit;
mod digit_candidates;
mod error;
pub mod geometry;
mod house;

pub use board::Board;
pub use cell_mask::CellMask;
pub use digit::Digit;
pub use digit_candidates::DigitCandidates;
pub use error::BoardError;
pub use house::House;
