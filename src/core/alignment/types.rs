//! Shared alignment types used across core and pipelines.

/// Which read of a (possibly paired) fragment something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mate {
    #[default]
    Unpaired,
    Mate1,
    Mate2,
}

impl Mate {
    /// Slot used by per-mate state (mate 1 and unpaired reads share slot 0).
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Mate::Unpaired | Mate::Mate1 => 0,
            Mate::Mate2 => 1,
        }
    }
}

/// A read with 2-bit encoded bases (A=0, C=1, G=2, T=3, N=4).
#[derive(Debug, Clone, Default)]
pub struct Read {
    pub name: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
    pub mate: Mate,
}

impl Read {
    pub fn new(name: impl Into<String>, seq: Vec<u8>, mate: Mate) -> Self {
        let qual = vec![b'I'; seq.len()];
        Self {
            name: name.into(),
            seq,
            qual,
            mate,
        }
    }

    /// Build a read from ASCII bases; anything other than ACGT becomes N.
    pub fn from_ascii(name: impl Into<String>, bases: &[u8], mate: Mate) -> Self {
        Self::new(name, bases.iter().map(|&b| encode_base(b)).collect(), mate)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Reverse complement of the encoded sequence. N stays N.
    pub fn reverse_complement(&self) -> Vec<u8> {
        self.seq
            .iter()
            .rev()
            .map(|&b| if b < 4 { 3 - b } else { 4 })
            .collect()
    }
}

/// Encode an ASCII nucleotide to 0..=4.
#[inline]
pub fn encode_base(b: u8) -> u8 {
    match b {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => 4,
    }
}

/// Which of the three affine-gap DP tables a cell value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DpTable {
    #[default]
    Overall,
    /// Gap in the read (reference bases skipped)
    ReadGap,
    /// Gap in the reference (read bases inserted)
    RefGap,
}

/// Kind of a single alignment edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Mismatch,
    /// Reference base with no read counterpart (deletion from the read)
    ReadGap,
    /// Read base with no reference counterpart (insertion in the read)
    RefGap,
}

/// One edit of an alignment, positioned by read offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
    pub pos: usize,
    pub kind: EditKind,
    /// Read base, 4 for a read gap
    pub read_chr: u8,
    /// Reference base, 4 for a reference gap
    pub ref_chr: u8,
}

impl Edit {
    pub fn mismatch(pos: usize, read_chr: u8, ref_chr: u8) -> Self {
        Self {
            pos,
            kind: EditKind::Mismatch,
            read_chr,
            ref_chr,
        }
    }

    pub fn read_gap(pos: usize, ref_chr: u8) -> Self {
        Self {
            pos,
            kind: EditKind::ReadGap,
            read_chr: 4,
            ref_chr,
        }
    }

    pub fn ref_gap(pos: usize, read_chr: u8) -> Self {
        Self {
            pos,
            kind: EditKind::RefGap,
            read_chr,
            ref_chr: 4,
        }
    }

    /// True when the reference side is ambiguous.
    #[inline]
    pub fn is_ambiguous_ref(&self) -> bool {
        self.kind == EditKind::Mismatch && self.ref_chr > 3
    }
}

/// Reference coordinate: sequence id, 0-based offset, strand of the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RefCoord {
    pub ref_id: usize,
    pub off: i64,
    pub fw: bool,
}

impl RefCoord {
    pub fn new(ref_id: usize, off: i64, fw: bool) -> Self {
        Self { ref_id, off, fw }
    }
}

/// A cell of the global (read x reference) DP table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DpCell {
    pub ref_id: usize,
    pub fw: bool,
    pub ref_off: i64,
    pub read_off: usize,
}
