//! Sudoku configuration and puzzle generation.
//!
//! Builds on [`sudoku_solver`] in three layers:
//!
//! - [`subtract::generate_puzzle`]: subtractively reduces a solved
//!   configuration to a minimal-clue puzzle with a unique solution.
//! - [`sieve`]: consumes a prebuilt collaborator of "unavoidable sets" to
//!   pick cells the subtractive search must never clear. This crate has no
//!   sieve *producer* — it only consumes one (spec §1).
//! - [`orchestrate::generate`]: the single public entry point dispatching
//!   "generate a config" vs "generate a puzzle with N clues", with optional
//!   digit-label normalization.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use sudoku_generator::{GenerateOptions, VecSieve, generate};
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//! let outcome = generate::<VecSieve>(
//!     GenerateOptions {
//!         num_clues: 81,
//!         amount: 1,
//!         ..Default::default()
//!     },
//!     &mut rng,
//! )?;
//! let board = outcome.items[0].board().unwrap();
//! assert!(board.is_solved());
//! # Ok::<(), sudoku_generator::GeneratorError>(())
//! ```

mod error;
mod normalize;
mod orchestrate;
mod sieve;
mod subtract;

pub use error::GeneratorError;
pub use normalize::normalize;
pub use orchestrate::{GenerateItem, GenerateOptions, GenerateOutcome, generate};
pub use sieve::{Sieve, VecSieve, cells_to_keep_from_sieve};
pub use subtract::{PuzzleAttempt, generate_puzzle};
