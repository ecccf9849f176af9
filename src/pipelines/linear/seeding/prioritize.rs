//! Choose which range elements to resolve and extend.

use rand::Rng;

use super::row_sampler::RowSampler;
use super::types::RangeAndPosition;
use crate::core::utils::RandomPermutation;
use crate::error::Result;

/// One element of one range, scheduled for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPick {
    /// Index into the sorted entry list
    pub entry: usize,
    /// Row within that entry's range
    pub elt: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvePlan {
    pub picks: Vec<ElementPick>,
    /// Elements available before budgeting
    pub total_elements: usize,
    /// True when every element was scheduled
    pub exhaustive: bool,
    /// True when the row sampler chose some of the picks
    pub sampled: bool,
}

/// Sort `entries` small-first and schedule elements within `max_elt`.
///
/// When the budget covers everything, every element is scheduled, in a
/// random order within each range. Otherwise ranges of at most `n_small`
/// elements are scheduled whole and the rest of the budget is drawn from the
/// larger ranges with a `RowSampler`.
pub fn prioritize<R: Rng + ?Sized>(
    entries: &mut Vec<RangeAndPosition>,
    n_small: usize,
    max_elt: usize,
    rng: &mut R,
) -> Result<ResolvePlan> {
    entries.retain(|e| !e.range.is_empty());
    entries.sort();

    let total: usize = entries.iter().map(|e| e.range.size).sum();
    let mut plan = ResolvePlan {
        picks: Vec::with_capacity(total.min(max_elt)),
        total_elements: total,
        exhaustive: true,
        sampled: false,
    };
    if entries.is_empty() {
        return Ok(plan);
    }

    if total <= max_elt {
        for (i, e) in entries.iter().enumerate() {
            schedule_whole(&mut plan.picks, i, e.range.size, rng);
        }
        return Ok(plan);
    }

    // Sorted by size, so the small ranges form a prefix
    let n_small_entries = entries.partition_point(|e| e.range.size <= n_small);
    for (i, e) in entries[..n_small_entries].iter().enumerate() {
        schedule_whole(&mut plan.picks, i, e.range.size, rng);
    }

    let budget = max_elt.saturating_sub(plan.picks.len());
    let (lo, hi) = (n_small_entries, entries.len());
    if budget > 0 && lo < hi {
        let mut sampler = RowSampler::new();
        sampler.initialize(entries, lo, hi)?;
        let mut perms: Vec<RandomPermutation> = entries[lo..hi]
            .iter()
            .map(|e| RandomPermutation::new(e.range.size))
            .collect();
        let mut drawn = 0;
        while drawn < budget && sampler.remaining() > 0 {
            let i = sampler.sample_next(rng)?;
            let perm = &mut perms[i - lo];
            if let Some(elt) = perm.next(rng) {
                plan.picks.push(ElementPick { entry: i, elt });
                drawn += 1;
            }
            if perm.done() {
                sampler.mark_exhausted(i)?;
            }
        }
        plan.sampled = true;
    }

    plan.exhaustive = plan.picks.len() == total;
    log::debug!(
        "Element budget {} < {} elements; scheduled {} ({} small ranges whole)",
        max_elt,
        total,
        plan.picks.len(),
        n_small_entries
    );
    Ok(plan)
}

fn schedule_whole<R: Rng + ?Sized>(
    picks: &mut Vec<ElementPick>,
    entry: usize,
    size: usize,
    rng: &mut R,
) {
    let mut perm = RandomPermutation::new(size);
    while let Some(elt) = perm.next(rng) {
        picks.push(ElementPick { entry, elt });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::linear::seeding::{IndexRange, SeedHitPosition};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn entries(sizes: &[usize]) -> Vec<RangeAndPosition> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                RangeAndPosition::new(
                    IndexRange::new(i as u64, s),
                    SeedHitPosition::new(i % 2 == 0, i, i * 3, 12),
                )
            })
            .collect()
    }

    #[test]
    fn test_within_budget_schedules_everything() {
        let mut e = entries(&[3, 0, 2]);
        let mut rng = StdRng::seed_from_u64(5);
        let plan = prioritize(&mut e, 5, 100, &mut rng).unwrap();
        assert_eq!(e.len(), 2);
        assert_eq!(e[0].range.size, 2);
        assert_eq!(plan.picks.len(), 5);
        assert!(plan.exhaustive);
        assert!(!plan.sampled);
        let uniq: HashSet<_> = plan.picks.iter().map(|p| (p.entry, p.elt)).collect();
        assert_eq!(uniq.len(), 5);
    }

    #[test]
    fn test_over_budget_keeps_small_ranges_whole() {
        let mut e = entries(&[400, 2, 3, 1000]);
        let mut rng = StdRng::seed_from_u64(9);
        let plan = prioritize(&mut e, 5, 20, &mut rng).unwrap();
        assert!(plan.sampled);
        assert!(!plan.exhaustive);
        assert_eq!(plan.total_elements, 1405);
        assert_eq!(plan.picks.len(), 20);
        // entries 0 and 1 are the small ranges after sorting
        let small = plan.picks.iter().filter(|p| p.entry < 2).count();
        assert_eq!(small, 5);
        let uniq: HashSet<_> = plan.picks.iter().map(|p| (p.entry, p.elt)).collect();
        assert_eq!(uniq.len(), 20);
    }

    #[test]
    fn test_sampler_exhausts_ranges_without_repeats() {
        // budget exceeds what the large ranges hold once small ones are taken
        let mut e = entries(&[6, 7, 1]);
        let mut rng = StdRng::seed_from_u64(13);
        let plan = prioritize(&mut e, 1, 13, &mut rng).unwrap();
        assert_eq!(plan.picks.len(), 13);
        let uniq: HashSet<_> = plan.picks.iter().map(|p| (p.entry, p.elt)).collect();
        assert_eq!(uniq.len(), 13);
        assert!(!plan.exhaustive);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let run = || {
            let mut e = entries(&[50, 60, 2, 70]);
            let mut rng = StdRng::seed_from_u64(77);
            prioritize(&mut e, 2, 30, &mut rng).unwrap().picks
        };
        assert_eq!(run(), run());
    }
}
