//! Seed-hit bookkeeping for the extension driver.
//!
//! # Module Organization
//!
//! - `types` - `SeedHitPosition`, `IndexRange`, `RangeAndPosition`, `SeedHits`
//! - `row_sampler` - Weighted sampling over large ranges
//! - `prioritize` - Picks which range elements get resolved and extended
//!
//! Ranges are explored smallest first. When the total number of range
//! elements exceeds the element budget, small ranges are still explored
//! whole and the leftover budget is spent by sampling rows from the large
//! ranges, weighted toward the more specific ones.

mod prioritize;
mod row_sampler;
mod types;

pub use prioritize::{prioritize, ElementPick, ResolvePlan};
pub use row_sampler::RowSampler;
pub use types::{IndexRange, RangeAndPosition, SeedHit, SeedHitPosition, SeedHits};
