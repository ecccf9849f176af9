//! Random draws without replacement from `0..n`.
//!
//! Lazy Fisher-Yates: only swapped slots are stored, so drawing a handful of
//! elements from a range of millions costs a handful of map entries.

use std::collections::HashMap;

use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct RandomPermutation {
    n: usize,
    cur: usize,
    swapped: HashMap<usize, usize>,
}

impl RandomPermutation {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cur: 0,
            swapped: HashMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// All elements drawn.
    #[inline]
    pub fn done(&self) -> bool {
        self.cur >= self.n
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.n - self.cur
    }

    #[inline]
    fn slot(&self, i: usize) -> usize {
        self.swapped.get(&i).copied().unwrap_or(i)
    }

    /// Draw the next element, `None` once all `n` have been drawn.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.done() {
            return None;
        }
        let j = rng.gen_range(self.cur..self.n);
        let picked = self.slot(j);
        let displaced = self.slot(self.cur);
        self.swapped.insert(j, displaced);
        self.swapped.remove(&self.cur);
        self.cur += 1;
        Some(picked)
    }
}
