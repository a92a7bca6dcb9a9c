//! Top-level `generate(options)` entry point (spec §4.5).

use std::time::{Duration, Instant};

use log::info;
use rand::Rng;
use sudoku_core::Board;
use sudoku_solver::{SearchResult, first_solution};

use crate::{
    error::GeneratorError,
    normalize::normalize,
    sieve::{Sieve, cells_to_keep_from_sieve},
    subtract::{PuzzleAttempt, generate_puzzle},
};

/// Options for [`generate`].
///
/// `sieve` is generic over the concrete [`Sieve`] implementation so that
/// callers (and tests) can plug in their own collaborator; [`VecSieve`](crate::VecSieve)
/// covers the common case.
pub struct GenerateOptions<'a, Sv: Sieve> {
    /// Clue count target. `81` generates a full configuration instead of a
    /// puzzle.
    pub num_clues: u8,
    /// Number of outputs requested, in `1..=1000`.
    pub amount: u32,
    /// Global wall-clock budget across every output, in milliseconds. `0`
    /// means unbounded.
    pub time_out_ms: u64,
    /// A pre-generated solved configuration to reduce into a puzzle. If
    /// `None` in puzzle mode, a fresh one is generated per output. Ignored
    /// in config mode.
    pub config: Option<Board>,
    /// If `true`, relabel digits so row 0 reads `1..9` (spec §4.6).
    pub normalize: bool,
    /// Enables sieve-guided generation.
    pub use_sieve: bool,
    /// The sieve to consult when `use_sieve` is set. Required when
    /// `use_sieve` is `true` — this crate does not include a sieve
    /// *producer* (spec §1), so `generate` cannot allocate one for you.
    pub sieve: Option<&'a mut Sv>,
    /// Invoked once per generated output.
    pub callback: Option<&'a mut dyn FnMut(&Board)>,
}

impl<Sv: Sieve> Default for GenerateOptions<'_, Sv> {
    fn default() -> Self {
        Self {
            num_clues: 81,
            amount: 1,
            time_out_ms: 0,
            config: None,
            normalize: false,
            use_sieve: false,
            sieve: None,
            callback: None,
        }
    }
}

/// One output of a [`generate`] call: either a freshly solved configuration
/// or a subtractively-generated puzzle.
#[derive(Debug, Clone)]
pub enum GenerateItem {
    /// A config-mode output: the search that produced it.
    Config(SearchResult),
    /// A puzzle-mode output: the subtractive search attempt that produced it.
    Puzzle(PuzzleAttempt),
}

impl GenerateItem {
    /// The produced board, if the search succeeded.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        match self {
            Self::Config(result) => result.solutions.first(),
            Self::Puzzle(attempt) => attempt.puzzle.as_ref(),
        }
    }
}

/// The result of a [`generate`] call.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// One entry per requested output that completed before the deadline.
    pub items: Vec<GenerateItem>,
    /// Wall-clock time spent across the whole call.
    pub time_elapsed: Duration,
}

/// Generates `options.amount` full configurations or puzzles (spec §4.5).
///
/// # Errors
///
/// Returns [`GeneratorError::BadInput`] if `num_clues` is outside `17..=81`,
/// `amount` is outside `1..=1000`, a supplied `config` is not solved, or
/// `use_sieve` is set without a `sieve`.
pub fn generate<Sv: Sieve>(
    mut options: GenerateOptions<'_, Sv>,
    rng: &mut impl Rng,
) -> Result<GenerateOutcome, GeneratorError> {
    if !(17..=81).contains(&options.num_clues) {
        return Err(GeneratorError::BadInput(format!(
            "num_clues must be in 17..=81, got {}",
            options.num_clues
        )));
    }
    if !(1..=1000).contains(&options.amount) {
        return Err(GeneratorError::BadInput(format!(
            "amount must be in 1..=1000, got {}",
            options.amount
        )));
    }
    if let Some(config) = &options.config {
        if !config.is_solved() {
            return Err(GeneratorError::BadInput(
                "config must be a solved board".to_owned(),
            ));
        }
    }
    if options.use_sieve && options.sieve.is_none() {
        return Err(GeneratorError::BadInput(
            "use_sieve requires a prebuilt sieve; this crate has no sieve producer".to_owned(),
        ));
    }

    let start = Instant::now();
    let deadline = (options.time_out_ms != 0).then(|| start + Duration::from_millis(options.time_out_ms));

    let mut items = Vec::with_capacity(options.amount as usize);

    for _ in 0..options.amount {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        let remaining_ms = remaining_millis(deadline);

        if options.num_clues == 81 {
            let mut result = first_solution(&Board::empty(), rng, remaining_ms)?;
            if let Some(board) = result.solutions.first_mut() {
                if options.normalize {
                    normalize(board);
                }
                if let Some(cb) = options.callback.as_mut() {
                    cb(board);
                }
            }
            info!("generated config #{}", items.len() + 1);
            items.push(GenerateItem::Config(result));
            continue;
        }

        let config = match &options.config {
            Some(config) => config.clone(),
            None => {
                let result = first_solution(&Board::empty(), rng, remaining_ms)?;
                result.solutions.into_iter().next().ok_or_else(|| {
                    GeneratorError::BadInput("failed to generate a configuration".to_owned())
                })?
            }
        };

        let cells_to_keep = if options.use_sieve {
            cells_to_keep_from_sieve(options.sieve.as_deref().unwrap(), rng)
        } else {
            Vec::new()
        };

        let mut attempt = generate_puzzle(&config, options.num_clues, &cells_to_keep, deadline, rng)?;
        if options.normalize {
            if let Some(board) = attempt.puzzle.as_mut() {
                normalize(board);
            }
        }
        if let (Some(cb), Some(board)) = (options.callback.as_mut(), attempt.puzzle.as_ref()) {
            cb(board);
        }
        info!(
            "generated puzzle #{} ({})",
            items.len() + 1,
            if attempt.puzzle.is_some() { "found" } else { "infeasible or timed out" }
        );
        items.push(GenerateItem::Puzzle(attempt));
    }

    Ok(GenerateOutcome {
        items,
        time_elapsed: start.elapsed(),
    })
}

fn remaining_millis(deadline: Option<Instant>) -> u64 {
    match deadline {
        None => 0,
        Some(d) => u64::try_from(d.saturating_duration_since(Instant::now()).as_millis()).unwrap_or(u64::MAX),
    }
}
