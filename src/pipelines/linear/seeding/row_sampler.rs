//! Weighted sampling without replacement over seed-hit ranges.
//!
//! Each range in `[lo, hi)` gets mass `1/sqrt(size)`, so a range of 4 rows is
//! twice as likely to be drawn as one of 16. Exhausted ranges drop out of the
//! total mass and are never drawn again.

use rand::Rng;

use super::types::RangeAndPosition;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct RowSampler {
    lo: usize,
    masses: Vec<f64>,
    eliminated: Vec<bool>,
    total: f64,
    live: usize,
}

impl RowSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up sampling over `ranges[lo..hi]`.
    pub fn initialize(&mut self, ranges: &[RangeAndPosition], lo: usize, hi: usize) -> Result<()> {
        if hi <= lo || hi > ranges.len() {
            return Err(Error::EmptySamplerRange { lo, hi });
        }
        self.lo = lo;
        self.masses.clear();
        self.eliminated.clear();
        self.total = 0.0;
        for r in &ranges[lo..hi] {
            debug_assert!(r.range.size > 0);
            let mass = 1.0 / (r.range.size.max(1) as f64).sqrt();
            self.masses.push(mass);
            self.eliminated.push(false);
            self.total += mass;
        }
        self.live = self.masses.len();
        Ok(())
    }

    /// Remove range `i` from further sampling. `i` is an index into the
    /// slice passed to `initialize`.
    pub fn mark_exhausted(&mut self, i: usize) -> Result<()> {
        let j = self.local(i)?;
        debug_assert!(!self.eliminated[j], "range {} exhausted twice", i);
        self.eliminated[j] = true;
        self.total -= self.masses[j];
        self.live -= 1;
        if self.live == 0 {
            self.total = 0.0;
        }
        Ok(())
    }

    /// Draw the next range index, in the same index space as `initialize`.
    pub fn sample_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        if self.live == 0 {
            return Err(Error::SamplerExhausted);
        }
        let dart = rng.gen::<f64>() * self.total;
        let mut acc = 0.0;
        let mut last_live = None;
        for (j, (&mass, &gone)) in self.masses.iter().zip(&self.eliminated).enumerate() {
            if gone {
                continue;
            }
            acc += mass;
            if dart < acc {
                return Ok(self.lo + j);
            }
            last_live = Some(j);
        }
        // Rounding can leave the dart just past the final slice
        last_live
            .map(|j| self.lo + j)
            .ok_or(Error::SamplerExhausted)
    }

    pub fn total_mass(&self) -> f64 {
        self.total
    }

    /// Mass of range `i`, or `None` when out of bounds.
    pub fn mass(&self, i: usize) -> Option<f64> {
        self.local(i).ok().map(|j| self.masses[j])
    }

    /// Ranges not yet exhausted.
    pub fn remaining(&self) -> usize {
        self.live
    }

    pub fn is_exhausted(&self, i: usize) -> bool {
        self.local(i).map(|j| self.eliminated[j]).unwrap_or(true)
    }

    fn local(&self, i: usize) -> Result<usize> {
        match i.checked_sub(self.lo) {
            Some(j) if j < self.masses.len() => Ok(j),
            _ => Err(Error::SamplerIndex {
                index: i,
                len: self.lo + self.masses.len(),
            }),
        }
    }
}
