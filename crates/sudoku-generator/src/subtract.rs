//! Subtractive puzzle generation from a solved configuration (spec §4.3).

use std::time::{Duration, Instant};

use log::debug;
use rand::{Rng, seq::SliceRandom};
use sudoku_core::{Board, CellMask};
use sudoku_solver::{SearchOptions, SolutionsFlag, solutions_flag};

use crate::error::GeneratorError;

/// After this many consecutive pops without success, the search stack is
/// cleared back to the root and resumed from there (spec §4.3 "Recovery").
const POPS_UNTIL_RESET: u32 = 100;

/// The outcome of one [`generate_puzzle`] attempt.
#[derive(Debug, Clone)]
pub struct PuzzleAttempt {
    /// The generated puzzle, or `None` if the search was infeasible or timed
    /// out (spec §7 `Infeasible`/`Timeout`).
    pub puzzle: Option<Board>,
    /// The forbidden-removal cells honored during the search.
    pub cells_kept: Vec<u8>,
    /// Number of stack pops performed.
    pub pops: u64,
    /// Number of stack resets performed.
    pub resets: u64,
    /// Wall-clock time spent on this attempt.
    pub time_elapsed: Duration,
    /// `true` iff the shared deadline was exceeded before a puzzle was found.
    pub timed_out: bool,
}

struct Node {
    board: Board,
    neighbors: Option<Vec<u8>>,
}

/// Subtractively reduces `config` (a solved board) to a puzzle with exactly
/// `num_clues` filled cells and a unique solution, optionally forbidding the
/// removal of any cell in `cells_to_keep` (spec §4.3, §4.4).
///
/// `deadline`, if set, is an absolute point in time shared across multiple
/// attempts by the caller (spec §4.5 "Global budget across all outputs").
///
/// # Errors
///
/// Returns [`GeneratorError::BadInput`] if `num_clues` is outside `17..=81`
/// or `config` is not a solved board.
pub fn generate_puzzle(
    config: &Board,
    num_clues: u8,
    cells_to_keep: &[u8],
    deadline: Option<Instant>,
    rng: &mut impl Rng,
) -> Result<PuzzleAttempt, GeneratorError> {
    if !(17..=81).contains(&num_clues) {
        return Err(GeneratorError::BadInput(format!(
            "num_clues must be in 17..=81, got {num_clues}"
        )));
    }
    if !config.is_solved() {
        return Err(GeneratorError::BadInput(
            "config must be a solved board".to_owned(),
        ));
    }

    let start = Instant::now();

    if num_clues == 81 {
        return Ok(PuzzleAttempt {
            puzzle: Some(config.clone()),
            cells_kept: cells_to_keep.to_vec(),
            pops: 0,
            resets: 0,
            time_elapsed: start.elapsed(),
            timed_out: false,
        });
    }

    let keep_set: CellMask = cells_to_keep.iter().copied().collect();
    let target_empty = 81 - num_clues;

    let mut stack = vec![Node {
        board: config.clone(),
        neighbors: None,
    }];
    let mut pops: u64 = 0;
    let mut resets: u64 = 0;
    let mut local_pops: u32 = 0;

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(PuzzleAttempt {
                puzzle: None,
                cells_kept: cells_to_keep.to_vec(),
                pops,
                resets,
                time_elapsed: start.elapsed(),
                timed_out: true,
            });
        }

        let Some(top) = stack.last_mut() else {
            return Ok(PuzzleAttempt {
                puzzle: None,
                cells_kept: cells_to_keep.to_vec(),
                pops,
                resets,
                time_elapsed: start.elapsed(),
                timed_out: false,
            });
        };

        let flag = solutions_flag(&top.board, rng, &SearchOptions::default())?;
        if flag != SolutionsFlag::One {
            stack.pop();
            record_pop(&mut pops, &mut resets, &mut local_pops, &mut stack);
            continue;
        }

        if top.board.num_empty() >= target_empty {
            return Ok(PuzzleAttempt {
                puzzle: Some(top.board.clone()),
                cells_kept: cells_to_keep.to_vec(),
                pops,
                resets,
                time_elapsed: start.elapsed(),
                timed_out: false,
            });
        }

        if top.neighbors.is_none() {
            let mut candidates: Vec<u8> = top
                .board
                .mask()
                .iter()
                .filter(|ci| !keep_set.contains(*ci))
                .collect();
            candidates.shuffle(rng);
            top.neighbors = Some(candidates);
        }

        let next = top.neighbors.as_mut().unwrap().pop();
        match next {
            Some(ci) => {
                let mut child = top.board.clone();
                child.set(ci, 0);
                stack.push(Node {
                    board: child,
                    neighbors: None,
                });
                debug!("removed clue at cell {ci}, stack depth now {}", stack.len());
            }
            None => {
                stack.pop();
                record_pop(&mut pops, &mut resets, &mut local_pops, &mut stack);
            }
        }
    }
}

fn record_pop(pops: &mut u64, resets: &mut u64, local_pops: &mut u32, stack: &mut Vec<Node>) {
    *pops += 1;
    *local_pops += 1;
    if *local_pops >= POPS_UNTIL_RESET {
        debug!("{POPS_UNTIL_RESET} consecutive pops, resetting stack to root (pops so far: {pops})");
        stack.truncate(1);
        *resets += 1;
        *local_pops = 0;
    }
}
