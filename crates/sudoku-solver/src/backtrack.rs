//! Multi-stack randomized backtracking search (spec §4.2).

use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::{Rng, seq::SliceRandom};
use sudoku_core::{Board, BoardError};

use crate::error::SolverError;

/// Options controlling a [`search`] run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Overall wall-clock budget in milliseconds. `0` means unbounded.
    pub time_out_ms: u64,
    /// Number of DFS frontiers interleaved round-robin. Must be positive.
    pub concurrent_branches: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_out_ms: 0,
            concurrent_branches: 9,
        }
    }
}

/// The outcome of a [`search`] run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Solutions found, in discovery order.
    pub solutions: Vec<Board>,
    /// Number of scheduler ticks performed.
    pub iterations: u64,
    /// Number of DFS frontiers spawned over the run (including the root).
    pub branches: u64,
    /// Wall-clock time spent in the search.
    pub time_elapsed: Duration,
    /// `true` iff the search drained every frontier without timing out or
    /// being stopped by the callback.
    pub complete: bool,
    /// `true` iff `time_out_ms` was exceeded.
    pub timed_out: bool,
    /// `true` iff `on_solution` returned `false`.
    pub terminated_by_callback: bool,
}

struct Frame {
    board: Board,
    children: Option<Vec<Board>>,
}

/// `0`/`1`/`2`(="≥2") summary of a board's solution count (spec §4.2, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionsFlag {
    /// No solution exists.
    Zero,
    /// Exactly one solution exists.
    One,
    /// Two or more solutions exist.
    AtLeastTwo,
}

impl SolutionsFlag {
    /// The numeric encoding (`0`, `1`, or `2`).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::AtLeastTwo => 2,
        }
    }
}

/// Runs the round-robin multi-stack backtracking search described in
/// spec §4.2 over `board`, reporting each solution to `on_solution` as it is
/// found. `on_solution` returning `false` stops the search early and sets
/// [`SearchResult::terminated_by_callback`].
///
/// # Errors
///
/// Returns [`SolverError::BadInput`] if `options.concurrent_branches == 0`.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use sudoku_core::Board;
/// use sudoku_solver::{SearchOptions, search};
///
/// let board: Board =
///     "218574639573896124469123578721459386354681792986237415147962853695318247832745961"
///         .parse()
///         .unwrap();
/// let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
/// let result = search(&board, &SearchOptions::default(), &mut rng, |_, _| false)?;
/// assert_eq!(result.solutions.len(), 1);
/// # Ok::<(), sudoku_solver::SolverError>(())
/// ```
pub fn search(
    board: &Board,
    options: &SearchOptions,
    rng: &mut impl Rng,
    mut on_solution: impl FnMut(&Board, usize) -> bool,
) -> Result<SearchResult, SolverError> {
    if options.concurrent_branches == 0 {
        return Err(SolverError::BadInput(BoardError::BadInput(
            "concurrent_branches must be positive".to_owned(),
        )));
    }

    let start = Instant::now();

    let mut root = board.clone();
    root.reset_empty_cells();
    root.reduce();

    let mut stacks: Vec<Vec<Frame>> = vec![vec![Frame {
        board: root,
        children: None,
    }]];
    let mut solutions = Vec::new();
    let mut iterations: u64 = 0;
    let mut branches: u64 = 1;
    let mut timed_out = false;
    let mut terminated_by_callback = false;
    let mut cursor = 0usize;

    loop {
        stacks.retain(|stack| !stack.is_empty());
        if stacks.is_empty() {
            break;
        }
        if options.time_out_ms != 0
            && u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX) >= options.time_out_ms
        {
            debug!("search timed out after {iterations} iterations, {} open stacks", stacks.len());
            timed_out = true;
            break;
        }
        if cursor >= stacks.len() {
            cursor = 0;
        }
        iterations += 1;
        trace!("iteration {iterations}: {} open stacks, cursor {cursor}", stacks.len());

        stacks[cursor].last_mut().unwrap().board.reduce();

        let is_solved = stacks[cursor].last().unwrap().board.is_solved();
        if is_solved {
            let solved = stacks[cursor].pop().unwrap().board;
            solutions.push(solved.clone());
            debug!("found solution #{} after {iterations} iterations", solutions.len());
            if !on_solution(&solved, solutions.len()) {
                debug!("search terminated by callback after {iterations} iterations, {} solutions found", solutions.len());
                terminated_by_callback = true;
                break;
            }
            cursor = (cursor + 1) % stacks.len().max(1);
            continue;
        }

        let prune = {
            let top = &stacks[cursor].last().unwrap().board;
            top.has_dead_cell() || !top.is_valid()
        };
        if prune {
            stacks[cursor].pop();
            cursor = (cursor + 1) % stacks.len().max(1);
            continue;
        }

        let needs_expand = stacks[cursor].last().unwrap().children.is_none();
        if needs_expand {
            let cell = stacks[cursor].last().unwrap().board.pick_empty_cell(rng);
            match cell {
                None => {
                    stacks[cursor].pop();
                }
                Some(ci) => {
                    let mut children: Vec<Board> = {
                        let parent = &stacks[cursor].last().unwrap().board;
                        parent
                            .candidates(ci)
                            .into_iter()
                            .map(|d| {
                                let mut child = parent.clone();
                                child.set(ci, d);
                                child
                            })
                            .collect()
                    };
                    children.shuffle(rng);
                    stacks[cursor].last_mut().unwrap().children = Some(children);
                }
            }
            cursor = (cursor + 1) % stacks.len().max(1);
            continue;
        }

        let popped = stacks[cursor]
            .last_mut()
            .unwrap()
            .children
            .as_mut()
            .unwrap()
            .pop();
        match popped {
            None => {
                stacks[cursor].pop();
            }
            Some(child) => {
                stacks[cursor].push(Frame {
                    board: child,
                    children: None,
                });
                branches += 1;

                while stacks.len() < options.concurrent_branches {
                    let parent_idx = stacks[cursor].len().saturating_sub(2);
                    let sibling = stacks[cursor]
                        .get_mut(parent_idx)
                        .and_then(|frame| frame.children.as_mut())
                        .and_then(Vec::pop);
                    match sibling {
                        Some(board) => {
                            stacks.push(vec![Frame {
                                board,
                                children: None,
                            }]);
                            branches += 1;
                        }
                        None => break,
                    }
                }
            }
        }
        cursor = (cursor + 1) % stacks.len().max(1);
    }

    Ok(SearchResult {
        solutions,
        iterations,
        branches,
        time_elapsed: start.elapsed(),
        complete: !timed_out && !terminated_by_callback,
        timed_out,
        terminated_by_callback,
    })
}

/// Finds the first solution of `board`, if any (spec §4.2 "firstSolution").
///
/// # Errors
///
/// See [`search`].
pub fn first_solution(
    board: &Board,
    rng: &mut impl Rng,
    time_out_ms: u64,
) -> Result<SearchResult, SolverError> {
    let options = SearchOptions {
        time_out_ms,
        concurrent_branches: 1,
    };
    search(board, &options, rng, |_, _| false)
}

/// Classifies `board`'s solution count as `0`, `1`, or "≥2" (spec §4.2).
///
/// Boards with more than 64 empty cells (fewer than 17 clues) short-circuit
/// to [`SolutionsFlag::AtLeastTwo`] without running the DFS at all — no
/// 17-clue puzzle has a unique solution (spec §8 property 6).
///
/// # Errors
///
/// See [`search`].
pub fn solutions_flag(
    board: &Board,
    rng: &mut impl Rng,
    options: &SearchOptions,
) -> Result<SolutionsFlag, SolverError> {
    if board.num_empty() > 81 - 17 {
        return Ok(SolutionsFlag::AtLeastTwo);
    }
    let result = search(board, options, rng, |_, found_so_far| found_so_far < 2)?;
    Ok(match result.solutions.len() {
        0 => SolutionsFlag::Zero,
        1 => SolutionsFlag::One,
        _ => SolutionsFlag::AtLeastTwo,
    })
}

/// Enumerates every distinct solution of `board` (spec §4.2 "allSolutions").
/// Solutions are deduplicated by digit equality.
///
/// # Errors
///
/// See [`search`].
pub fn all_solutions(
    board: &Board,
    rng: &mut impl Rng,
    options: &SearchOptions,
) -> Result<Vec<Board>, SolverError> {
    let result = search(board, options, rng, |_, _| true)?;
    let mut distinct: Vec<Board> = Vec::new();
    for solution in result.solutions {
        if !distinct.contains(&solution) {
            distinct.push(solution);
        }
    }
    Ok(distinct)
}
