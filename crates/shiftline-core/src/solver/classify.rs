//! Deterministic difficulty classification.
//!
//! A pure function of four quantities derived from the optimal solution:
//! block count, par-per-block, lock ordering, and the multi-swipe flag.
//! Candidates matching no rule are rejected; generation simply retries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty label of a validated level, ordered easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Fun,
    Challenging,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Fun,
        Difficulty::Challenging,
        Difficulty::Hard,
    ];

    /// Numeric difficulty value used by the level-file format (1..=4).
    pub fn value(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Fun => 2,
            Difficulty::Challenging => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Lowercase label used by the level-file format.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Fun => "fun",
            Difficulty::Challenging => "challenging",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a label, accepting the legacy "very easy"/"very hard" aliases.
    pub fn from_label(label: &str) -> Option<Difficulty> {
        match label.trim().to_lowercase().as_str() {
            "easy" | "very easy" => Some(Difficulty::Easy),
            "fun" => Some(Difficulty::Fun),
            "challenging" => Some(Difficulty::Challenging),
            "hard" | "very hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of the order in which colors lock along the optimal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockOrdering {
    /// All colors lock on the same step.
    None,
    /// Every color locks on a distinct step.
    Strict,
    /// Partial ties: some steps shared, some not.
    Specific,
}

impl LockOrdering {
    /// Derive the ordering from the multiset of lock-step values.
    pub fn from_steps(steps: &[u32]) -> LockOrdering {
        let mut distinct: Vec<u32> = steps.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() == 1 {
            LockOrdering::None
        } else if distinct.len() == steps.len() {
            LockOrdering::Strict
        } else {
            LockOrdering::Specific
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LockOrdering::None => "none",
            LockOrdering::Strict => "strict",
            LockOrdering::Specific => "specific",
        }
    }
}

impl fmt::Display for LockOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map derived statistics to a difficulty label; `None` rejects the level.
///
/// First matching rule wins. Thresholds are inclusive: a par-per-block of
/// exactly 2.0 still classifies as easy, exactly 2.5 as fun/challenging.
pub fn classify(
    block_count: usize,
    par_per_block: f64,
    ordering: LockOrdering,
    multi_swipe: bool,
) -> Option<Difficulty> {
    if block_count < 1 {
        return None;
    }
    if block_count <= 4 && !multi_swipe && par_per_block <= 2.0 {
        return Some(Difficulty::Easy);
    }
    if block_count <= 3 && multi_swipe && ordering == LockOrdering::None && par_per_block <= 2.5 {
        return Some(Difficulty::Fun);
    }
    if block_count <= 4
        && multi_swipe
        && matches!(ordering, LockOrdering::Specific | LockOrdering::Strict)
        && par_per_block <= 2.5
    {
        return Some(Difficulty::Challenging);
    }
    if block_count <= 4 && multi_swipe && ordering == LockOrdering::Strict && par_per_block > 2.5 {
        return Some(Difficulty::Hard);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easy_boundary_is_inclusive() {
        assert_eq!(
            classify(4, 2.0, LockOrdering::Strict, false),
            Some(Difficulty::Easy)
        );
        assert_eq!(classify(4, 2.01, LockOrdering::Strict, false), None);
    }

    #[test]
    fn test_fun_requires_simultaneous_locks() {
        assert_eq!(
            classify(3, 2.5, LockOrdering::None, true),
            Some(Difficulty::Fun)
        );
        assert_eq!(
            classify(3, 2.5, LockOrdering::Strict, true),
            Some(Difficulty::Challenging)
        );
        // Four blocks are too many for fun.
        assert_eq!(classify(4, 2.5, LockOrdering::None, true), None);
    }

    #[test]
    fn test_challenging_boundary_is_inclusive() {
        assert_eq!(
            classify(4, 2.5, LockOrdering::Specific, true),
            Some(Difficulty::Challenging)
        );
        assert_eq!(
            classify(4, 2.5001, LockOrdering::Specific, true),
            None,
            "above 2.5 only strict ordering can still classify"
        );
    }

    #[test]
    fn test_hard_needs_strict_ordering_above_threshold() {
        assert_eq!(
            classify(4, 2.5001, LockOrdering::Strict, true),
            Some(Difficulty::Hard)
        );
        assert_eq!(classify(5, 3.0, LockOrdering::Strict, true), None);
    }

    #[test]
    fn test_zero_blocks_rejects() {
        assert_eq!(classify(0, 0.0, LockOrdering::None, false), None);
    }

    #[test]
    fn test_ordering_from_steps() {
        assert_eq!(LockOrdering::from_steps(&[3, 3, 3]), LockOrdering::None);
        assert_eq!(LockOrdering::from_steps(&[4]), LockOrdering::None);
        assert_eq!(LockOrdering::from_steps(&[1, 3, 2]), LockOrdering::Strict);
        assert_eq!(
            LockOrdering::from_steps(&[1, 2, 2, 3]),
            LockOrdering::Specific
        );
    }

    #[test]
    fn test_labels_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(d.label()), Some(d));
        }
        assert_eq!(Difficulty::from_label("Very Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("very hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("bogus"), None);
    }

    #[test]
    fn test_difficulty_values() {
        assert_eq!(Difficulty::Easy.value(), 1);
        assert_eq!(Difficulty::Hard.value(), 4);
        assert!(Difficulty::Easy < Difficulty::Hard);
    }
}
