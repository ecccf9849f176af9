//! Core data types for seed hits.

use std::cmp::Ordering;

/// Identity of one seed occurrence within a read.
///
/// Ordered by (offset index, read offset, seed length, strand), with the
/// forward strand sorting before the reverse complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedHitPosition {
    /// Whether the seed was extracted from the forward read
    pub fw: bool,
    /// Index of this seed's offset within the read's seed set
    pub offidx: usize,
    /// Offset of the seed from the 5' end of the read
    pub rdoff: usize,
    pub seedlen: usize,
}

impl SeedHitPosition {
    pub fn new(fw: bool, offidx: usize, rdoff: usize, seedlen: usize) -> Self {
        Self {
            fw,
            offidx,
            rdoff,
            seedlen,
        }
    }

    /// Offset of the seed within the read as aligned.
    ///
    /// For a reverse-complement seed the offset is mirrored into the
    /// reverse-complemented read, which is what the hit's diagonal is
    /// measured against.
    #[inline]
    pub fn oriented_rdoff(&self, read_len: usize) -> usize {
        if self.fw {
            self.rdoff
        } else {
            read_len.saturating_sub(self.rdoff + self.seedlen)
        }
    }
}

impl Ord for SeedHitPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offidx
            .cmp(&other.offidx)
            .then(self.rdoff.cmp(&other.rdoff))
            .then(self.seedlen.cmp(&other.seedlen))
            // true (fw) before false (rc)
            .then(other.fw.cmp(&self.fw))
    }
}

impl PartialOrd for SeedHitPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Opaque handle to a range of index rows plus its cardinality.
///
/// Smaller ranges sort first: they are more specific and cheaper to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexRange {
    pub top: u64,
    pub size: usize,
}

impl IndexRange {
    pub fn new(top: u64, size: usize) -> Self {
        Self { top, size }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Ord for IndexRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size.cmp(&other.size).then(self.top.cmp(&other.top))
    }
}

impl PartialOrd for IndexRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An index range paired with the seed position that produced it.
///
/// Field order gives the derived ordering: range first, then position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeAndPosition {
    pub range: IndexRange,
    pub pos: SeedHitPosition,
    /// Cardinality before any filtering
    pub orig_size: usize,
}

impl RangeAndPosition {
    pub fn new(range: IndexRange, pos: SeedHitPosition) -> Self {
        Self {
            range,
            pos,
            orig_size: range.size,
        }
    }
}

/// One seed position and the index ranges its search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedHit {
    pub pos: SeedHitPosition,
    pub ranges: Vec<IndexRange>,
}

/// All seed hits for one read.
#[derive(Debug, Clone, Default)]
pub struct SeedHits {
    hits: Vec<SeedHit>,
}

impl SeedHits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: SeedHitPosition, ranges: Vec<IndexRange>) {
        self.hits.push(SeedHit { pos, ranges });
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeedHit> {
        self.hits.iter()
    }

    /// Flatten into range/position entries, skipping empty ranges and seeds
    /// on a disabled strand.
    pub fn range_positions(&self, nofw: bool, norc: bool) -> Vec<RangeAndPosition> {
        self.hits
            .iter()
            .filter(|h| if h.pos.fw { !nofw } else { !norc })
            .flat_map(|h| {
                h.ranges
                    .iter()
                    .filter(|r| !r.is_empty())
                    .map(move |r| RangeAndPosition::new(*r, h.pos))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}
