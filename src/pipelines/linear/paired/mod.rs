//! Paired-end policy: where to look for the opposite mate and whether a
//! pair is concordant.

mod policy;

pub use policy::{FragmentPolicy, MateOrientation, MatePolicy, MateWindow, PairClass};
