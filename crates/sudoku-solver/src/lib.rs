//! Randomized, round-robin backtracking search over [`sudoku_core::Board`].
//!
//! The search (spec §4.2) keeps a small set of DFS frontiers ("stacks")
//! alive at once, ticking through them round-robin: reduce the top board,
//! prune it if it is dead or invalid, expand it into one child per
//! remaining candidate otherwise, and occasionally hedge by spawning a
//! sibling frontier from a child that would otherwise wait its turn. All
//! specializations below ([`first_solution`], [`solutions_flag`],
//! [`all_solutions`]) are thin wrappers over the single [`search`] entry
//! point with different callback/option choices.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use sudoku_core::Board;
//! use sudoku_solver::{SearchOptions, solutions_flag};
//!
//! let board: Board =
//!     "218574639573896124469123578721459386354681792986237415147962853695318247832745961"
//!         .parse()
//!         .unwrap();
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//! let flag = solutions_flag(&board, &mut rng, &SearchOptions::default())?;
//! assert_eq!(flag.as_u8(), 1);
//! # Ok::<(), sudoku_solver::SolverError>(())
//! ```

mod backtrack;
mod error;

pub use backtrack::{
    SearchOptions, SearchResult, SolutionsFlag, all_solutions, first_solution, search,
    solutions_flag,
};
pub use error::SolverError;
