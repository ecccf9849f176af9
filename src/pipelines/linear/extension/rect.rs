//! DP window framing.
//!
//! Offsets are reference offsets; a diagonal is `ref_off - read_off`, so a
//! seed at reference offset `r` and read offset `q` lies on diagonal `r - q`.
//! Windows are inclusive on both ends.

/// Reference window for one DP problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpRect {
    /// Leftmost reference offset before trimming to the reference
    pub ref_left_pretrim: i64,
    pub ref_right_pretrim: i64,
    /// Leftmost reference offset actually searched
    pub ref_left: i64,
    pub ref_right: i64,
    /// Diagonals an ungapped hit can lie on and still be covered
    pub core_diag_lo: i64,
    pub core_diag_hi: i64,
    pub max_gap: usize,
}

impl DpRect {
    /// Frame the window around a seed hit on diagonal `diag`.
    ///
    /// The window allows `min(max_gaps, max_half)` gaps on either side of the
    /// diagonal. Returns `None` when no part of it overlaps the reference.
    pub fn frame_seed_extension(
        diag: i64,
        read_len: usize,
        ref_len: usize,
        max_gaps: usize,
        max_half: usize,
    ) -> Option<Self> {
        if read_len == 0 || ref_len == 0 {
            return None;
        }
        let max_gap = max_gaps.min(max_half);
        let gap = max_gap as i64;
        let left = diag - gap;
        let right = diag + read_len as i64 - 1 + gap;
        let (ref_left, ref_right) = trim(left, right, ref_len)?;
        Some(Self {
            ref_left_pretrim: left,
            ref_right_pretrim: right,
            ref_left,
            ref_right,
            core_diag_lo: diag - gap,
            core_diag_hi: diag + gap,
            max_gap,
        })
    }

    /// Frame an opposite-mate search window `[left, right]`.
    pub fn frame_mate_window(left: i64, right: i64, ref_len: usize) -> Option<Self> {
        if right < left {
            return None;
        }
        let (ref_left, ref_right) = trim(left, right, ref_len)?;
        Some(Self {
            ref_left_pretrim: left,
            ref_right_pretrim: right,
            ref_left,
            ref_right,
            core_diag_lo: ref_left,
            core_diag_hi: ref_right,
            max_gap: 0,
        })
    }

    /// Frame a search over an entire reference sequence.
    pub fn whole_reference(ref_len: usize, read_len: usize) -> Option<Self> {
        if ref_len == 0 || read_len == 0 {
            return None;
        }
        let right = ref_len as i64 - 1;
        Some(Self {
            ref_left_pretrim: 0,
            ref_right_pretrim: right,
            ref_left: 0,
            ref_right: right,
            core_diag_lo: -(read_len as i64 - 1),
            core_diag_hi: right,
            max_gap: read_len,
        })
    }

    /// Reference positions covered.
    #[inline]
    pub fn width(&self) -> usize {
        (self.ref_right - self.ref_left + 1) as usize
    }

    /// Reference positions trimmed off the left end.
    #[inline]
    pub fn trim_left(&self) -> usize {
        (self.ref_left - self.ref_left_pretrim) as usize
    }

    #[inline]
    pub fn trim_right(&self) -> usize {
        (self.ref_right_pretrim - self.ref_right) as usize
    }

    #[inline]
    pub fn contains_ref(&self, off: i64) -> bool {
        off >= self.ref_left && off <= self.ref_right
    }

    /// Core diagonals as a half-open interval.
    #[inline]
    pub fn core_diagonals(&self) -> (i64, i64) {
        (self.core_diag_lo, self.core_diag_hi + 1)
    }
}

fn trim(left: i64, right: i64, ref_len: usize) -> Option<(i64, i64)> {
    let last = ref_len as i64 - 1;
    if right < 0 || left > last {
        return None;
    }
    Some((left.max(0), right.min(last)))
}
