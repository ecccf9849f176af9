//! Databases of DP cells owned by accepted alignments.
//!
//! Cells are bucketed by read offset, so an overlap query touches one small
//! set per aligned read position.

use std::collections::HashSet;

use crate::core::alignment::Mate;
use crate::pipelines::linear::extension::AlnRes;

/// Cells of every accepted alignment for one role.
#[derive(Debug, Clone, Default)]
pub struct RedundantAlignments {
    // cells[read_off] holds (ref_id, fw, ref_off)
    cells: Vec<HashSet<(usize, bool, i64)>>,
    added: usize,
}

impl RedundantAlignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and size for reads of up to `capacity` bases.
    pub fn init(&mut self, capacity: usize) {
        self.reset();
        self.cells.resize_with(capacity, HashSet::new);
    }

    /// Forget all alignments, keeping the capacity.
    pub fn reset(&mut self) {
        for set in &mut self.cells {
            set.clear();
        }
        self.added = 0;
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Alignments added since the last reset.
    pub fn len(&self) -> usize {
        self.added
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0
    }

    /// Whether `res` shares a DP cell with an accepted alignment.
    pub fn overlap(&self, res: &AlnRes) -> bool {
        res.cells.iter().any(|c| {
            self.cells
                .get(c.read_off)
                .is_some_and(|set| set.contains(&(c.ref_id, c.fw, c.ref_off)))
        })
    }

    pub fn add(&mut self, res: &AlnRes) {
        for c in &res.cells {
            if c.read_off >= self.cells.len() {
                self.cells.resize_with(c.read_off + 1, HashSet::new);
            }
            self.cells[c.read_off].insert((c.ref_id, c.fw, c.ref_off));
        }
        self.added += 1;
    }
}

/// Which database an alignment is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedundancyRole {
    Anchor,
    Mate1,
    Mate2,
}

impl RedundancyRole {
    /// Per-mate role; unpaired reads use the mate 1 database.
    pub fn for_mate(mate: Mate) -> Self {
        match mate {
            Mate::Mate2 => RedundancyRole::Mate2,
            Mate::Unpaired | Mate::Mate1 => RedundancyRole::Mate1,
        }
    }

    fn index(self) -> usize {
        match self {
            RedundancyRole::Anchor => 0,
            RedundancyRole::Mate1 => 1,
            RedundancyRole::Mate2 => 2,
        }
    }
}

/// The anchor, mate 1 and mate 2 databases for one read.
#[derive(Debug, Clone, Default)]
pub struct RedundancyDbs {
    dbs: [RedundantAlignments; 3],
}

impl RedundancyDbs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all three; the anchor database is sized for the longer mate.
    pub fn init(&mut self, mate1_len: usize, mate2_len: usize) {
        self.dbs[RedundancyRole::Anchor.index()].init(mate1_len.max(mate2_len));
        self.dbs[RedundancyRole::Mate1.index()].init(mate1_len);
        self.dbs[RedundancyRole::Mate2.index()].init(mate2_len);
    }

    pub fn get(&self, role: RedundancyRole) -> &RedundantAlignments {
        &self.dbs[role.index()]
    }

    pub fn get_mut(&mut self, role: RedundancyRole) -> &mut RedundantAlignments {
        &mut self.dbs[role.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.dbs.iter().all(|db| db.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::{AlnScore, DpCell, GapCounts, RefCoord};

    fn aln(cells: &[(i64, usize)]) -> AlnRes {
        AlnRes {
            mate: Mate::Unpaired,
            coord: RefCoord::new(0, cells[0].0, true),
            read_start: cells[0].1,
            read_end: cells[cells.len() - 1].1 + 1,
            ref_extent: cells.len(),
            score: AlnScore::new(10),
            edits: Vec::new(),
            ambiguous_edits: Vec::new(),
            gaps: GapCounts::default(),
            cells: cells
                .iter()
                .map(|&(ref_off, read_off)| DpCell {
                    ref_id: 0,
                    fw: true,
                    ref_off,
                    read_off,
                })
                .collect(),
        }
    }

    #[test]
    fn test_shared_cell_is_redundant() {
        let mut db = RedundantAlignments::new();
        db.init(10);
        let a = aln(&[(100, 0), (101, 1), (102, 2)]);
        let b = aln(&[(101, 0), (102, 1), (102, 2)]);
        let c = aln(&[(101, 0), (102, 1), (103, 2)]);
        assert!(!db.overlap(&a));
        db.add(&a);
        assert!(db.overlap(&b));
        // same reference offsets, different read offsets
        assert!(!db.overlap(&c));
    }

    #[test]
    fn test_strand_separates_cells() {
        let mut db = RedundantAlignments::new();
        db.init(4);
        let a = aln(&[(5, 0), (6, 1)]);
        let mut b = a.clone();
        for c in &mut b.cells {
            c.fw = false;
        }
        db.add(&a);
        assert!(!db.overlap(&b));
    }

    #[test]
    fn test_dbs_init_and_roles() {
        let mut dbs = RedundancyDbs::new();
        dbs.init(100, 150);
        assert_eq!(dbs.get(RedundancyRole::Anchor).capacity(), 150);
        assert_eq!(dbs.get(RedundancyRole::Mate1).capacity(), 100);
        assert_eq!(dbs.get(RedundancyRole::Mate2).capacity(), 150);

        let a = aln(&[(1, 0)]);
        dbs.get_mut(RedundancyRole::Mate2).add(&a);
        assert!(!dbs.get(RedundancyRole::Anchor).overlap(&a));
        assert!(!dbs.is_empty());

        dbs.init(100, 0);
        assert!(dbs.is_empty());
        assert!(!dbs.get(RedundancyRole::Mate2).overlap(&a));
        assert_eq!(RedundancyRole::for_mate(Mate::Unpaired), RedundancyRole::Mate1);
    }
}
