//! The sieve collaborator interface and greedy keep-cell selection (spec §4.4, §6).
//!
//! The sieve *producer* (populating a sieve with unavoidable sets) is out of
//! scope (spec §1): this crate only consumes a prebuilt [`Sieve`].

use rand::{Rng, seq::IndexedRandom};
use sudoku_core::{Board, CellMask};

/// An ordered collection of unavoidable-set masks keyed to one configuration
/// (spec §6 "Sieve collaborator").
///
/// A set of cells is *unavoidable* if every proper puzzle derived from
/// [`Sieve::config`] must keep a clue somewhere inside it, or uniqueness is
/// lost. [`cells_to_keep_from_sieve`] uses this to pick cells the subtractive
/// generator is forbidden to clear.
pub trait Sieve {
    /// The unavoidable-set masks currently held.
    fn items(&self) -> &[CellMask];

    /// The number of masks held.
    fn len(&self) -> usize {
        self.items().len()
    }

    /// `true` iff no masks are held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds masks to the sieve.
    fn add(&mut self, items: impl IntoIterator<Item = CellMask>);

    /// Removes and returns every mask overlapping `mask`.
    fn remove_overlapping(&mut self, mask: CellMask) -> Vec<CellMask>;

    /// The first mask, if any.
    fn first(&self) -> Option<CellMask> {
        self.items().first().copied()
    }

    /// A fast, deterministic alternative to [`cells_to_keep_from_sieve`]:
    /// greedily picks the cell covering the most remaining masks, breaking
    /// ties by lowest cell index rather than at random.
    fn generate_mask_cells(&self) -> Vec<u8>;

    /// The configuration this sieve's masks were computed against.
    fn config(&self) -> &Board;
}

/// A minimal in-memory [`Sieve`] backed by a `Vec` of masks.
#[derive(Debug, Clone)]
pub struct VecSieve {
    items: Vec<CellMask>,
    config: Board,
}

impl VecSieve {
    /// Creates an empty sieve keyed to `config`.
    #[must_use]
    pub fn new(config: Board) -> Self {
        Self {
            items: Vec::new(),
            config,
        }
    }
}

impl Sieve for VecSieve {
    fn items(&self) -> &[CellMask] {
        &self.items
    }

    fn add(&mut self, items: impl IntoIterator<Item = CellMask>) {
        self.items.extend(items);
    }

    fn remove_overlapping(&mut self, mask: CellMask) -> Vec<CellMask> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if (*item & mask).is_empty() {
                true
            } else {
                removed.push(*item);
                false
            }
        });
        removed
    }

    fn generate_mask_cells(&self) -> Vec<u8> {
        greedy_cover(&self.items, |counts| {
            // `max_by_key` keeps the *last* element among ties, so scan in
            // reverse to make that last element the lowest cell index.
            (0u8..81).rev().max_by_key(|&ci| counts[ci as usize])
        })
    }

    fn config(&self) -> &Board {
        &self.config
    }
}

/// Picks a minimal set of cells hitting every mask in `sieve` (spec §4.4).
///
/// Greedy max-cover: repeatedly pick the cell belonging to the most
/// remaining masks (ties broken uniformly at random via `rng`), then drop
/// every mask that cell now satisfies.
#[must_use]
pub fn cells_to_keep_from_sieve(sieve: &impl Sieve, rng: &mut impl Rng) -> Vec<u8> {
    greedy_cover(sieve.items(), |counts| {
        let max = *counts.iter().max().unwrap_or(&0);
        if max == 0 {
            return None;
        }
        let tied: Vec<u8> = (0u8..81).filter(|&ci| counts[ci as usize] == max).collect();
        tied.choose(&mut *rng).copied()
    })
}

fn greedy_cover(items: &[CellMask], mut pick: impl FnMut(&[u32; 81]) -> Option<u8>) -> Vec<u8> {
    let mut remaining: Vec<CellMask> = items.to_vec();
    let mut result = Vec::new();
    while !remaining.is_empty() {
        let mut counts = [0u32; 81];
        for mask in &remaining {
            for ci in mask.iter() {
                counts[ci as usize] += 1;
            }
        }
        let Some(picked) = pick(&counts) else {
            break;
        };
        result.push(picked);
        remaining.retain(|mask| !mask.contains(picked));
    }
    result
}
