//! Benchmarks for the multi-stack backtracking search.
//!
//! Measures `first_solution` and `solutions_flag` across puzzles with
//! varying clue counts, each derived from the same solved configuration.
//!
//! # Test data
//!
//! - `empty` (0 given): forces a full search from scratch.
//! - `sub_17` (16 given): below the 17-clue floor, `solutions_flag` should
//!   short-circuit without running the DFS at all.
//! - `sparse` (24 given): a puzzle with a unique solution.
//! - `dense` (60 given): close to solved, little search needed.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench backtrack
//! ```

use std::{hint, str::FromStr as _};

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use sudoku_core::Board;
use sudoku_solver::{SearchOptions, first_solution, solutions_flag};

const EMPTY_PROBLEM: &str =
    ".................................................................................";
// 16 given: below the 17-clue floor.
const SUB_17_PROBLEM: &str =
    "..8.7..3...3.......6.....7....4.....3...8...2.....7..........5.....1..4.....4.9..";
// 24 given: unique solution.
const SPARSE_PROBLEM: &str =
    "2.85.46..5...9..2446.....7.....5.....5...1...9...3.4.......2...6..3........74...1";
// 60 given: close to solved.
const DENSE_PROBLEM: &str =
    "2.857463..738961.44.9123.7872..59.863546.179298.23.4151.7962.536953.8.4.83..45..1";

fn bench_first_solution(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_solution");
    for (name, board_str) in [("empty", EMPTY_PROBLEM), ("sparse", SPARSE_PROBLEM)] {
        let board = Board::from_str(board_str).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            b.iter_batched_ref(
                || (hint::black_box(board.clone()), Pcg64::seed_from_u64(0)),
                |(board, rng)| first_solution(board, rng, 0),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_solutions_flag(c: &mut Criterion) {
    let mut group = c.benchmark_group("solutions_flag");
    for (name, board_str) in [
        ("sub_17", SUB_17_PROBLEM),
        ("sparse", SPARSE_PROBLEM),
        ("dense", DENSE_PROBLEM),
    ] {
        let board = Board::from_str(board_str).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            b.iter_batched_ref(
                || (hint::black_box(board.clone()), Pcg64::seed_from_u64(0)),
                |(board, rng)| solutions_flag(board, rng, &SearchOptions::default()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn init_logging(_c: &mut Criterion) {
    let _ = env_logger::try_init();
}

criterion_group!(
    benches,
    init_logging,
    bench_first_solution,
    bench_solutions_flag
);
criterion_main!(benches);
