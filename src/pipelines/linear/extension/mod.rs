//! DP problem framing and the collaborators the driver extends through.
//!
//! - `rect` - `DpRect`, the reference window searched for one DP problem
//! - `result` - `AlnRes`, an alignment in reference coordinates
//! - `collaborators` - `IndexWalk`, `ReferenceSet`, `DpAligner`, `DpProblem`

mod collaborators;
mod rect;
mod result;

pub use collaborators::{DpAligner, DpProblem, IndexWalk, ReferenceSet};
pub use rect::DpRect;
pub use result::AlnRes;
