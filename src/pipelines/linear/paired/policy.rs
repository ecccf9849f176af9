//! Fragment-length and orientation policy.

use crate::core::alignment::Mate;
use crate::defaults;
use crate::pipelines::linear::extension::AlnRes;

/// Expected relative orientation of the two mates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MateOrientation {
    /// Mates point toward each other (Illumina paired-end)
    #[default]
    FR,
    /// Mates point away from each other (mate-pair libraries)
    RF,
    /// Both mates on the same strand, mate 1 upstream
    FF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairClass {
    Concordant,
    Discordant,
}

/// Reference window `[left, right]` to search for the opposite mate, and the
/// strand it must align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateWindow {
    pub left: i64,
    pub right: i64,
    pub fw: bool,
}

pub trait MatePolicy {
    /// Where the opposite mate of `anchor` may lie, or `None` if nowhere on
    /// a reference of `ref_len` bases.
    fn other_mate_window(
        &self,
        anchor: &AlnRes,
        opposite_len: usize,
        ref_len: usize,
    ) -> Option<MateWindow>;

    fn classify(&self, mate1: &AlnRes, mate2: &AlnRes) -> PairClass;
}

/// Concordant pairs span `[min_frag, max_frag]` bases in `orientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentPolicy {
    pub min_frag: usize,
    pub max_frag: usize,
    pub orientation: MateOrientation,
}

impl Default for FragmentPolicy {
    fn default() -> Self {
        Self {
            min_frag: defaults::MIN_FRAGMENT_LEN,
            max_frag: defaults::MAX_FRAGMENT_LEN,
            orientation: MateOrientation::FR,
        }
    }
}

impl FragmentPolicy {
    pub fn new(min_frag: usize, max_frag: usize, orientation: MateOrientation) -> Self {
        Self {
            min_frag,
            max_frag,
            orientation,
        }
    }

    /// Whether the opposite mate lies to the right of the anchor, and the
    /// strand it aligns to.
    fn opposite_placement(&self, anchor_mate: Mate, anchor_fw: bool) -> (bool, bool) {
        match self.orientation {
            MateOrientation::FR => (anchor_fw, !anchor_fw),
            MateOrientation::RF => (!anchor_fw, !anchor_fw),
            MateOrientation::FF => {
                let upstream = anchor_mate != Mate::Mate2;
                (upstream == anchor_fw, anchor_fw)
            }
        }
    }
}

impl MatePolicy for FragmentPolicy {
    fn other_mate_window(
        &self,
        anchor: &AlnRes,
        opposite_len: usize,
        ref_len: usize,
    ) -> Option<MateWindow> {
        if ref_len == 0 || opposite_len == 0 || self.max_frag == 0 {
            return None;
        }
        let span = self.max_frag as i64;
        let (to_right, fw) = self.opposite_placement(anchor.mate, anchor.fw());
        let (left, right) = if to_right {
            (anchor.ref_left(), anchor.ref_left() + span - 1)
        } else {
            (anchor.ref_right() - span + 1, anchor.ref_right())
        };
        let last = ref_len as i64 - 1;
        let (left, right) = (left.max(0), right.min(last));
        if right < left {
            return None;
        }
        Some(MateWindow { left, right, fw })
    }

    fn classify(&self, mate1: &AlnRes, mate2: &AlnRes) -> PairClass {
        if mate1.ref_id() != mate2.ref_id() {
            return PairClass::Discordant;
        }
        let left = mate1.ref_left().min(mate2.ref_left());
        let right = mate1.ref_right().max(mate2.ref_right());
        let frag = (right - left + 1) as usize;
        if frag < self.min_frag || frag > self.max_frag {
            return PairClass::Discordant;
        }
        let oriented = match self.orientation {
            MateOrientation::FR | MateOrientation::RF => {
                if mate1.fw() == mate2.fw() {
                    false
                } else {
                    let (fw_mate, rc_mate) = if mate1.fw() {
                        (mate1, mate2)
                    } else {
                        (mate2, mate1)
                    };
                    if self.orientation == MateOrientation::FR {
                        fw_mate.ref_left() <= rc_mate.ref_left()
                    } else {
                        rc_mate.ref_left() <= fw_mate.ref_left()
                    }
                }
            }
            MateOrientation::FF => {
                mate1.fw() == mate2.fw()
                    && if mate1.fw() {
                        mate1.ref_left() <= mate2.ref_left()
                    } else {
                        mate2.ref_left() <= mate1.ref_left()
                    }
            }
        };
        if oriented {
            PairClass::Concordant
        } else {
            PairClass::Discordant
        }
    }
}
