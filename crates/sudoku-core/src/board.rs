//! The 81-cell board (C3): solved digits, candidate masks, and per-house
//! used-digit state kept in sync on every `set` (spec §3, §4.1).

use std::{
    collections::VecDeque,
    fmt::{self, Display},
    str::FromStr,
};

use rand::{Rng, seq::IndexedRandom};

use crate::{
    cell_mask::CellMask, digit::Digit, digit_candidates::DigitCandidates, error::BoardError,
    geometry, house::House,
};

#[derive(Debug, Clone, Copy)]
enum Axis {
    Row,
    Col,
    Region,
}

impl Axis {
    fn cells(self, idx: u8) -> [u8; 9] {
        match self {
            Axis::Row => geometry::row_cells(idx),
            Axis::Col => geometry::col_cells(idx),
            Axis::Region => geometry::region_cells(idx),
        }
    }
}

/// The 81-cell Sudoku board state.
///
/// Owns every array the 27 houses would otherwise hold back-pointers into
/// (Design Notes §9): solved digits, per-cell candidate masks, and per-house
/// `used`/`valid` flags are all plain arrays derived from a cell's index via
/// [`geometry`], never a graph of cross-referencing cells and houses.
#[derive(Debug, Clone)]
pub struct Board {
    digits: [u8; 81],
    cand: [DigitCandidates; 81],
    initial: [u8; 81],
    rows: [House; 9],
    cols: [House; 9],
    regs: [House; 9],
    num_empty: u8,
    valid: bool,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Creates an empty 9x9 board (every cell open, every house valid).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            digits: [0; 81],
            cand: [DigitCandidates::FULL; 81],
            initial: [0; 81],
            rows: [House::new(); 9],
            cols: [House::new(); 9],
            regs: [House::new(); 9],
            num_empty: 81,
            valid: true,
        }
    }

    /// Builds a board from an 81-element digit array (0 = empty).
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadInput`] if any entry is greater than 9.
    pub fn from_digits(digits: [u8; 81]) -> Result<Self, BoardError> {
        for (ci, &d) in digits.iter().enumerate() {
            if d > 9 {
                return Err(BoardError::BadInput(format!(
                    "cell {ci} has out-of-range digit {d}"
                )));
            }
        }
        let mut board = Self::empty();
        for (ci, &d) in digits.iter().enumerate() {
            if d != 0 {
                board.set(ci as u8, d);
            }
        }
        board.initial = digits;
        Ok(board)
    }

    /// Sets cell `ci` to digit `d` (`0` clears the cell), updating candidate
    /// masks, house state, `num_empty`, and `valid` (spec §4.1, §4.1.1).
    ///
    /// # Panics
    ///
    /// Panics if `ci >= 81` or `d > 9`.
    pub fn set(&mut self, ci: u8, d: u8) {
        assert!(ci < 81, "cell index out of range: {ci}");
        assert!(d <= 9, "digit out of range: {d}");

        let idx = ci as usize;
        let old = self.digits[idx];
        if old == d {
            return;
        }

        match (old == 0, d == 0) {
            (true, false) => self.num_empty -= 1,
            (false, true) => self.num_empty += 1,
            _ => {}
        }

        self.digits[idx] = d;
        self.cand[idx] = if d == 0 {
            DigitCandidates::FULL
        } else {
            DigitCandidates::single(Digit::from_value(d))
        };

        let row = geometry::row_of(ci);
        let col = geometry::col_of(ci);
        let reg = geometry::region_of(ci);

        if old != 0 {
            let old_digit = Digit::from_value(old);
            self.remove_from_house(ci, Axis::Row, row, old_digit);
            self.remove_from_house(ci, Axis::Col, col, old_digit);
            self.remove_from_house(ci, Axis::Region, reg, old_digit);
        }
        if d != 0 {
            let new_digit = Digit::from_value(d);
            self.house_mut(Axis::Row, row).add_digit(new_digit);
            self.house_mut(Axis::Col, col).add_digit(new_digit);
            self.house_mut(Axis::Region, reg).add_digit(new_digit);
        }

        self.recompute_valid();
    }

    /// Rebuilds `used`/`valid` (if the house is currently invalid) from the
    /// house's cells as they stand right now, treating `ci` itself as empty
    /// — its old digit is being removed and its new one (if any) is added
    /// separately by the caller, so it must not be double-counted here.
    fn remove_from_house(&mut self, ci: u8, axis: Axis, idx: u8, digit: Digit) {
        let cells = axis.cells(idx);
        let snapshot: [u8; 9] = std::array::from_fn(|i| {
            if cells[i] == ci {
                0
            } else {
                self.digits[cells[i] as usize]
            }
        });
        self.house_mut(axis, idx).remove_digit(digit, snapshot);
    }

    fn house(&self, axis: Axis, idx: u8) -> &House {
        match axis {
            Axis::Row => &self.rows[idx as usize],
            Axis::Col => &self.cols[idx as usize],
            Axis::Region => &self.regs[idx as usize],
        }
    }

    fn house_mut(&mut self, axis: Axis, idx: u8) -> &mut House {
        match axis {
            Axis::Row => &mut self.rows[idx as usize],
            Axis::Col => &mut self.cols[idx as usize],
            Axis::Region => &mut self.regs[idx as usize],
        }
    }

    fn recompute_valid(&mut self) {
        self.valid = self.rows.iter().all(House::is_valid)
            && self.cols.iter().all(House::is_valid)
            && self.regs.iter().all(House::is_valid);
    }

    /// Returns the digit at cell `ci` (`0` if empty).
    #[must_use]
    pub fn get(&self, ci: u8) -> u8 {
        self.digits[ci as usize]
    }

    /// Returns the full 81-cell digit array.
    #[must_use]
    pub fn digits(&self) -> [u8; 81] {
        self.digits
    }

    /// Returns the candidate digits for cell `ci`. Empty for solved cells
    /// (the digit is available via [`Board::get`] instead) per spec §4.1.
    #[must_use]
    pub fn candidates(&self, ci: u8) -> Vec<u8> {
        if self.digits[ci as usize] != 0 {
            return Vec::new();
        }
        self.cand[ci as usize].iter().map(Digit::value).collect()
    }

    /// Restores every cell to its value at construction time.
    pub fn reset(&mut self) {
        let initial = self.initial;
        for (ci, &d) in initial.iter().enumerate() {
            self.set(ci as u8, d);
        }
    }

    /// Sets every empty cell's candidate mask back to "all nine digits",
    /// without touching house state. Per spec §9, invariants do not hold
    /// again until a subsequent [`Board::reduce`] call.
    pub fn reset_empty_cells(&mut self) {
        for ci in 0..81usize {
            if self.digits[ci] == 0 {
                self.cand[ci] = DigitCandidates::FULL;
            }
        }
    }

    /// Swaps every occurrence of digit `a` with digit `b`, in both the
    /// current digits and the construction-time `initial` values. Used by
    /// digit relabeling (normalization) to canonicalize a board's output
    /// without disturbing which cells are clues.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is `0` or greater than `9`.
    pub fn swap_digits(&mut self, a: u8, b: u8) {
        assert!((1..=9).contains(&a) && (1..=9).contains(&b), "digits must be 1-9");
        if a == b {
            return;
        }

        let swap = |d: u8| -> u8 {
            if d == a {
                b
            } else if d == b {
                a
            } else {
                d
            }
        };

        let new_digits = self.digits.map(swap);
        let new_initial = self.initial.map(swap);

        *self = Self::empty();
        for (ci, &d) in new_digits.iter().enumerate() {
            if d != 0 {
                self.set(ci as u8, d);
            }
        }
        self.initial = new_initial;
    }

    /// Whether every cell is filled.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.num_empty == 0
    }

    /// Whether no house holds a duplicate digit.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the board is completely and correctly filled in.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.is_full() && self.valid
    }

    /// The number of empty cells.
    #[must_use]
    pub fn num_empty(&self) -> u8 {
        self.num_empty
    }

    /// `true` if some empty cell has no remaining candidates — a state
    /// [`reduce`](Board::reduce) cannot recover from (spec §4.1.2 step 3,
    /// §7 `DeadBoard`).
    #[must_use]
    pub fn has_dead_cell(&self) -> bool {
        (0..81usize).any(|ci| self.digits[ci] == 0 && self.cand[ci].is_empty())
    }

    /// The 81-bit mask of filled cells (bit `80-ci` set iff cell `ci` is
    /// filled), per spec §3/§6.
    #[must_use]
    pub fn mask(&self) -> CellMask {
        let mut mask = CellMask::new();
        for ci in 0..81u8 {
            if self.digits[ci as usize] != 0 {
                mask.insert(ci);
            }
        }
        mask
    }

    /// The complement of [`Board::mask`]: filled cells are NOT in this mask.
    #[must_use]
    pub fn empty_mask(&self) -> CellMask {
        !self.mask()
    }

    /// Picks a random empty cell with the minimum candidate count greater
    /// than 1, breaking ties uniformly at random. Returns `None` if every
    /// cell is either solved or dead (spec §4.1, §9 Open Questions).
    #[must_use]
    pub fn pick_empty_cell(&self, rng: &mut impl Rng) -> Option<u8> {
        let mut best_len = u32::MAX;
        let mut best: Vec<u8> = Vec::new();
        for ci in 0..81u8 {
            if self.digits[ci as usize] != 0 {
                continue;
            }
            let len = self.cand[ci as usize].len();
            if len <= 1 {
                continue;
            }
            match len.cmp(&best_len) {
                std::cmp::Ordering::Less => {
                    best_len = len;
                    best.clear();
                    best.push(ci);
                }
                std::cmp::Ordering::Equal => best.push(ci),
                std::cmp::Ordering::Greater => {}
            }
        }
        best.choose(rng).copied()
    }

    /// Runs naked-single and hidden-single deduction to a fixed point (spec
    /// §4.1.2). Returns `true` iff `num_empty` decreased.
    pub fn reduce(&mut self) -> bool {
        let empty_before = self.num_empty;

        let mut queued = [true; 81];
        let mut queue: VecDeque<u8> = (0..81u8).collect();

        while let Some(ci) = queue.pop_front() {
            let idx = ci as usize;
            queued[idx] = false;
            if self.digits[idx] != 0 {
                continue;
            }

            let peers = geometry::peers(ci);
            let used = self.house(Axis::Row, geometry::row_of(ci)).used()
                | self.house(Axis::Col, geometry::col_of(ci)).used()
                | self.house(Axis::Region, geometry::region_of(ci)).used();
            let reduced = self.cand[idx] & !used;

            if reduced.is_empty() {
                // Dead cell (spec §4.1.2 step 3): record and stop
                // propagating from here; the enclosing solver prunes it.
                self.cand[idx] = DigitCandidates::EMPTY;
                continue;
            }

            if let Some(digit) = reduced.as_single() {
                self.set(ci, digit.value());
                self.enqueue_peers(ci, &mut queue, &mut queued);
                continue;
            }

            let mut hidden_single = None;
            'search: for digit in reduced.iter() {
                for house_peers in [peers.row, peers.col, peers.region] {
                    if house_peers
                        .iter()
                        .all(|nj| !self.cand[nj as usize].contains(digit))
                    {
                        hidden_single = Some(digit);
                        break 'search;
                    }
                }
            }

            if let Some(digit) = hidden_single {
                self.set(ci, digit.value());
                self.enqueue_peers(ci, &mut queue, &mut queued);
                continue;
            }

            if reduced != self.cand[idx] {
                self.cand[idx] = reduced;
                self.enqueue_peers(ci, &mut queue, &mut queued);
            }
        }

        self.num_empty != empty_before
    }

    fn enqueue_peers(&self, ci: u8, queue: &mut VecDeque<u8>, queued: &mut [bool; 81]) {
        for nj in geometry::peers(ci).all.iter() {
            if !queued[nj as usize] {
                queued[nj as usize] = true;
                queue.push_back(nj);
            }
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ci in 0..81u8 {
            let d = self.digits[ci as usize];
            if d == 0 {
                write!(f, ".")?;
            } else {
                write!(f, "{d}")?;
            }
            if f.alternate() && ci % 9 == 8 && ci != 80 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, BoardError> {
        let filtered: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if filtered.chars().count() == 81 {
            return parse_cells(&filtered);
        }

        // Legacy shortcut (spec §6): a lone '-' can stand for an entire
        // empty row (nine '0's) instead of a single empty cell.
        let expanded: String = filtered
            .chars()
            .map(|c| {
                if c == '-' {
                    "000000000".to_owned()
                } else {
                    c.to_string()
                }
            })
            .collect();
        if expanded.chars().count() == 81 {
            return parse_cells(&expanded);
        }

        Err(BoardError::BadInput(format!(
            "expected 81 cells, got {} (legacy '-' expansion gives {})",
            filtered.chars().count(),
            expanded.chars().count()
        )))
    }
}

fn parse_cells(s: &str) -> Result<Board, BoardError> {
    let mut digits = [0u8; 81];
    for (ci, c) in s.chars().enumerate() {
        digits[ci] = match c {
            '.' | '0' | '-' => 0,
            '1'..='9' => c.to_digit(10).unwrap() as u8,
            other => return Err(BoardError::BadInput(format!("invalid character '{other}'"))),
        };
    }
    Board::from_digits(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str =
        "218574639573896124469123578721459386354681792986237415147962853695318247832745961";

    #[test]
    fn parses_solved_board() {
        let board: Board = SOLVED.parse().unwrap();
        assert!(board.is_solved());
    }

    #[test]
    fn string_round_trips() {
        let board: Board = SOLVED.parse().unwrap();
        let s = board.to_string();
        let reparsed: Board = s.parse().unwrap();
        assert_eq!(board, reparsed);
    }

    #[test]
    fn dot_zero_dash_all_mean_empty() {
        let dots = ".".repeat(81);
        let zeros = "0".repeat(81);
        let board_dots: Board = dots.parse().unwrap();
        let board_zeros: Board = zeros.parse().unwrap();
        assert_eq!(board_dots, board_zeros);
        assert_eq!(board_dots.num_empty(), 81);
    }

    #[test]
    fn legacy_dash_row_shortcut_expands_to_nine_zeros() {
        // One literal row plus eight dash-rows = 9 + 8*1 chars = 17, which
        // only makes sense once each '-' expands to a full empty row.
        let s = format!("123456789{}", "-".repeat(8));
        let board: Board = s.parse().unwrap();
        assert_eq!(board.num_empty(), 72);
        assert_eq!(board.get(0), 1);
    }

    #[test]
    fn wrong_length_is_bad_input() {
        let result: Result<Board, _> = "123".parse();
        assert!(matches!(result, Err(BoardError::BadInput(_))));
    }

    #[test]
    fn invalid_character_is_bad_input() {
        let s = format!("X{}", ".".repeat(80));
        let result: Result<Board, _> = s.parse();
        assert!(matches!(result, Err(BoardError::BadInput(_))));
    }

    #[test]
    fn from_digits_rejects_out_of_range_digit() {
        let mut digits = [0u8; 81];
        digits[0] = 15;
        let result = Board::from_digits(digits);
        assert!(matches!(result, Err(BoardError::BadInput(_))));
    }

    #[test]
    fn set_get_law_holds() {
        let mut board = Board::empty();
        board.set(0, 5);
        assert_eq!(board.get(0), 5);
        assert_eq!(board.num_empty(), 80);
        board.set(0, 0);
        assert_eq!(board.get(0), 0);
        assert_eq!(board.num_empty(), 81);
    }

    #[test]
    fn set_noop_when_same_digit() {
        let mut board = Board::empty();
        board.set(4, 3);
        let before = board.clone();
        board.set(4, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn duplicate_in_row_marks_board_invalid() {
        let mut board = Board::empty();
        board.set(0, 5);
        board.set(1, 5);
        assert!(!board.is_valid());
    }

    #[test]
    fn removing_duplicate_restores_validity() {
        let mut board = Board::empty();
        board.set(0, 5);
        board.set(1, 5);
        assert!(!board.is_valid());
        board.set(1, 0);
        assert!(board.is_valid());
        assert!(board.house(Axis::Row, 0).is_valid());
    }

    #[test]
    fn changing_duplicate_cell_to_new_digit_does_not_self_conflict() {
        // Row 0 has two 5s (cells 0 and 1); overwriting cell 1 with 7 (not
        // otherwise present in row 0) must restore validity, not falsely
        // detect 7 as a duplicate against itself.
        let mut board = Board::empty();
        board.set(0, 5);
        board.set(1, 5);
        assert!(!board.is_valid());
        board.set(1, 7);
        assert!(board.is_valid());
        assert_eq!(board.get(0), 5);
        assert_eq!(board.get(1), 7);
    }

    #[test]
    fn candidates_empty_for_solved_cell() {
        let mut board = Board::empty();
        board.set(0, 7);
        assert!(board.candidates(0).is_empty());
    }

    #[test]
    fn candidates_nonempty_for_open_cell() {
        let board = Board::empty();
        assert_eq!(board.candidates(0).len(), 9);
    }

    #[test]
    fn reduce_solves_near_complete_board() {
        let mut digits = [0u8; 81];
        for (ci, c) in SOLVED.chars().enumerate() {
            digits[ci] = c.to_digit(10).unwrap() as u8;
        }
        // Blank 14 cells; the remaining 67 clues pin a unique naked/hidden
        // single chain back to the full solution.
        for ci in [1, 3, 5, 7, 11, 15, 20, 27, 33, 44, 55, 66, 70, 79] {
            digits[ci] = 0;
        }
        let mut board = Board::from_digits(digits).unwrap();
        board.reduce();
        let solved: Board = SOLVED.parse().unwrap();
        assert_eq!(board, solved);
    }

    #[test]
    fn reduce_is_idempotent() {
        let mut digits = [0u8; 81];
        for (ci, c) in SOLVED.chars().enumerate() {
            digits[ci] = c.to_digit(10).unwrap() as u8;
        }
        digits[0] = 0;
        let mut board = Board::from_digits(digits).unwrap();
        board.reduce();
        let after_first = board.clone();
        board.reduce();
        assert_eq!(board, after_first);
    }

    #[test]
    fn reduce_detects_dead_cell() {
        let mut board = Board::empty();
        // Fill 8 of 9 digits around cell 0's row so the 9th cell would need
        // the missing digit, then also block it via column, creating a
        // contradiction cell with zero candidates.
        for (x, d) in (1..9).zip(1u8..9) {
            board.set(x, d);
        }
        for y in 1..9 {
            board.set(y * 9, 9);
        }
        board.reduce();
        assert!(board.has_dead_cell());
    }

    #[test]
    fn pick_empty_cell_returns_none_when_solved() {
        let board: Board = SOLVED.parse().unwrap();
        let mut rng = rand::rng();
        assert_eq!(board.pick_empty_cell(&mut rng), None);
    }

    #[test]
    fn pick_empty_cell_prefers_minimum_candidate_count() {
        let mut board = Board::empty();
        // Constrain cell 0 down to exactly 2 candidates.
        for d in 3..=9u8 {
            board.set(d, d); // spreads digits 3..9 across row 0, excluding cols 0-2
        }
        let rng_choice = board.pick_empty_cell(&mut rand::rng());
        assert!(rng_choice.is_some());
    }

    #[test]
    fn mask_tracks_filled_cells() {
        let mut board = Board::empty();
        board.set(0, 1);
        board.set(80, 9);
        assert!(board.mask().contains(0));
        assert!(board.mask().contains(80));
        assert!(!board.mask().contains(1));
        assert_eq!(board.mask().len(), 2);
        assert_eq!(board.empty_mask().len(), 79);
    }

    #[test]
    fn reset_restores_initial_digits() {
        let mut board: Board = SOLVED.parse().unwrap();
        board.set(0, 0);
        assert_ne!(board.get(0), 2);
        board.reset();
        assert_eq!(board.get(0), 2);
        assert!(board.is_solved());
    }

    #[test]
    fn swap_digits_relabels_without_changing_clue_shape() {
        let mut board: Board = SOLVED.parse().unwrap();
        board.set(1, 0); // one non-clue empty cell
        let empty_before = board.empty_mask();
        board.swap_digits(2, 1);
        assert_eq!(board.get(0), 1); // was 2
        assert_eq!(board.empty_mask(), empty_before);
        assert!(board.is_valid());
    }

    #[test]
    fn reset_empty_cells_reopens_candidates_without_touching_digits() {
        let mut board = Board::empty();
        board.set(0, 5);
        board.cand[1] = DigitCandidates::single(Digit::D5);
        board.reset_empty_cells();
        assert_eq!(board.candidates(1).len(), 9);
        assert_eq!(board.get(0), 5);
    }

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        fn cell_index() -> impl Strategy<Value = u8> {
            0u8..81
        }

        fn digit() -> impl Strategy<Value = u8> {
            1u8..=9
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            // Parsing a board's own `Display` output reproduces the same board.
            #[test]
            fn round_trips_through_display(ci in cell_index(), d in digit()) {
                let mut board = Board::empty();
                board.set(ci, d);
                let reparsed: Board = board.to_string().parse().unwrap();
                prop_assert_eq!(board, reparsed);
            }

            // A single `set` is always observable through `get`, and is a
            // no-op on the rest of the board.
            #[test]
            fn set_then_get_returns_the_written_digit(ci in cell_index(), d in digit()) {
                let mut board = Board::empty();
                board.set(ci, d);
                prop_assert_eq!(board.get(ci), d);
                prop_assert_eq!(board.num_empty(), 80);
            }

            // Running `reduce` twice in a row never changes the board further
            // than running it once (fixed point).
            #[test]
            fn reduce_is_idempotent(ci in cell_index(), d in digit()) {
                let mut board = Board::empty();
                board.set(ci, d);
                board.reduce();
                let once = board.clone();
                board.reduce();
                prop_assert_eq!(once, board);
            }

            // Clearing a cell never invalidates an otherwise-valid board.
            #[test]
            fn clearing_a_cell_preserves_validity(ci in cell_index()) {
                let mut board: Board = SOLVED.parse().unwrap();
                board.set(ci, 0);
                prop_assert!(board.is_valid());
            }
        }
    }
}
