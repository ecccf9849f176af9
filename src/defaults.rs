// src/defaults.rs

// Scoring constants (local mode)
pub const MATCH_BONUS: i64 = 2;
pub const MISMATCH_PENALTY: i64 = 6;
pub const N_PENALTY: i64 = 1;
pub const READ_GAP_OPEN: i64 = 5;
pub const READ_GAP_EXTEND: i64 = 3;
pub const REF_GAP_OPEN: i64 = 5;
pub const REF_GAP_EXTEND: i64 = 3;

// Minimum score: G,20,8 -> 20 + 8 * ln(read_len)
pub const SCORE_MIN_CONST: f64 = 20.0;
pub const SCORE_MIN_COEFF: f64 = 8.0;

// N ceiling: L,0,0.15 -> 0.15 * read_len
pub const N_CEIL_CONST: f64 = 0.0;
pub const N_CEIL_COEFF: f64 = 0.15;

// Element budget: S,1,2 capped -> 1 + 2 * sqrt(total_elements)
pub const MAX_ELT_CONST: f64 = 1.0;
pub const MAX_ELT_COEFF: f64 = 2.0;
pub const MAX_ELT_CAP: f64 = 800.0;

// Seed extension
pub const MAX_HALF: usize = 15;
pub const N_SMALL: usize = 5;
pub const REFSCAN_MIN_RANGE: usize = 300;

// Backtrace candidate domination window (cells per side)
pub const DOMINATION_SQUARE: usize = 40;

// Paired-end fragment bounds
pub const MIN_FRAGMENT_LEN: usize = 0;
pub const MAX_FRAGMENT_LEN: usize = 500;

// Top-k reporting
pub const REPORT_K: usize = 1;
