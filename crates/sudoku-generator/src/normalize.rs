//! Digit relabeling canonicalization (spec §4.6).

use sudoku_core::Board;

/// Relabels `board`'s digits so row 0 reads `1, 2, ..., 9`, by repeatedly
/// swapping whichever digit currently sits at `digits[d-1]` with `d` itself.
///
/// # Panics
///
/// Panics (debug builds) if row 0 is not fully filled; spec §4.6 states this
/// as a precondition rather than a recoverable error.
pub fn normalize(board: &mut Board) {
    for d in 1..=9u8 {
        let at = board.get(d - 1);
        debug_assert_ne!(at, 0, "normalize requires row 0 to be fully filled");
        if at != d {
            board.swap_digits(d, at);
        }
    }
}
