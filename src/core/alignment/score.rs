//! Tagged alignment score.
//!
//! DP engines traditionally signal "no score here" with a sentinel such as
//! `i64::MIN`. `AlnScore` makes that state explicit so nothing compares or
//! accumulates an unset score by accident.

use std::fmt;

use crate::error::{Error, Result};

/// An alignment score that is either a valid number or not yet computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlnScore {
    Valid(i64),
    #[default]
    Invalid,
}

impl AlnScore {
    #[inline]
    pub fn new(score: i64) -> Self {
        AlnScore::Valid(score)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, AlnScore::Valid(_))
    }

    /// Numeric value, if valid.
    #[inline]
    pub fn value(&self) -> Option<i64> {
        match *self {
            AlnScore::Valid(s) => Some(s),
            AlnScore::Invalid => None,
        }
    }

    /// Numeric value, or `Error::InvalidScore` naming the caller's context.
    #[inline]
    pub fn require(&self, context: &'static str) -> Result<i64> {
        self.value().ok_or(Error::InvalidScore(context))
    }

    /// Add a (possibly negative) delta. Invalid stays invalid.
    #[inline]
    pub fn add(self, delta: i64) -> Self {
        match self {
            AlnScore::Valid(s) => AlnScore::Valid(s + delta),
            AlnScore::Invalid => AlnScore::Invalid,
        }
    }

    /// True iff valid and at least `min`.
    #[inline]
    pub fn at_least(&self, min: i64) -> bool {
        matches!(*self, AlnScore::Valid(s) if s >= min)
    }
}

impl From<i64> for AlnScore {
    fn from(s: i64) -> Self {
        AlnScore::Valid(s)
    }
}

impl fmt::Display for AlnScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlnScore::Valid(s) => write!(f, "{}", s),
            AlnScore::Invalid => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_is_default() {
        assert_eq!(AlnScore::default(), AlnScore::Invalid);
        assert!(!AlnScore::default().is_valid());
    }

    #[test]
    fn test_require() {
        assert_eq!(AlnScore::new(12).require("ctx"), Ok(12));
        assert_eq!(
            AlnScore::Invalid.require("ctx"),
            Err(Error::InvalidScore("ctx"))
        );
    }

    #[test]
    fn test_add_keeps_invalid() {
        assert_eq!(AlnScore::new(10).add(-4), AlnScore::new(6));
        assert_eq!(AlnScore::Invalid.add(5), AlnScore::Invalid);
    }

    #[test]
    fn test_at_least() {
        assert!(AlnScore::new(20).at_least(20));
        assert!(!AlnScore::new(19).at_least(20));
        assert!(!AlnScore::Invalid.at_least(i64::MIN));
    }
}
