//! Lazy, restartable combination generators.
//!
//! - `Combinations`: k-subsets of `0..n` in lexicographic order
//! - `non_empty_subsets`: every non-empty subset, smallest first
//! - `MatchingIter`: partial matchings of attack slots to defense cards

use smallvec::SmallVec;

use crate::cards::Card;

/// k-combinations of `0..n`, lexicographic.
///
/// Yields nothing when `k == 0` or `k > n`.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: k == 0 || k > n,
        }
    }

    /// Start over from the first combination.
    pub fn reset(&mut self) {
        *self = Self::new(self.n, self.k);
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        let (n, k) = (self.n, self.k);
        let pivot = (0..k).rev().find(|&i| self.indices[i] != i + n - k);
        match pivot {
            None => {
                self.done = true;
                None
            }
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                Some(self.indices.clone())
            }
        }
    }
}

/// Every non-empty subset of `items`, by size then lexicographic position.
pub fn non_empty_subsets<T: Copy>(items: &[T]) -> impl Iterator<Item = Vec<T>> + '_ {
    (1..=items.len()).flat_map(move |k| {
        Combinations::new(items.len(), k).map(move |idx| idx.iter().map(|&i| items[i]).collect())
    })
}

/// One proposed cover: slot position (among the candidate lists) and card.
pub type Matching = SmallVec<[(usize, Card); 6]>;

/// Partial matchings of slots to candidate cards.
///
/// Slot `i` may be skipped or paired with one of `candidates[i]`; no card is
/// used twice and the empty matching is never produced. This is a
/// mixed-radix odometer (digit 0 = skip), so it holds no more state than
/// one digit per slot and can be restarted with `reset`.
#[derive(Clone, Debug)]
pub struct MatchingIter {
    candidates: Vec<Vec<Card>>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl MatchingIter {
    #[must_use]
    pub fn new(candidates: Vec<Vec<Card>>) -> Self {
        let digits = vec![0; candidates.len()];
        Self {
            exhausted: candidates.iter().all(Vec::is_empty),
            candidates,
            digits,
        }
    }

    pub fn reset(&mut self) {
        self.digits.iter_mut().for_each(|d| *d = 0);
        self.exhausted = self.candidates.iter().all(Vec::is_empty);
    }

    /// Step the odometer; `false` once every digit has wrapped.
    fn advance(&mut self) -> bool {
        for (digit, options) in self.digits.iter_mut().zip(&self.candidates) {
            *digit += 1;
            if *digit <= options.len() {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Iterator for MatchingIter {
    type Item = Matching;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            if !self.advance() {
                self.exhausted = true;
                break;
            }
            let mut picked = Matching::new();
            let mut reused = false;
            for (slot, &digit) in self.digits.iter().enumerate() {
                if digit == 0 {
                    continue;
                }
                let card = self.candidates[slot][digit - 1];
                if picked.iter().any(|&(_, c)| c == card) {
                    reused = true;
                    break;
                }
                picked.push((slot, card));
            }
            if !reused {
                return Some(picked);
            }
        }
        None
    }
}
