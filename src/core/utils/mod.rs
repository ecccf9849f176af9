pub mod hash;
pub mod interval_list;
pub mod random;

pub use hash::{hash_64, read_seed};
pub use interval_list::IntervalMergeList;
pub use random::RandomPermutation;
