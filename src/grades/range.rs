//! Active grade range selection.
//!
//! A range is a pair of catalogue letters. Membership is decided purely by
//! catalogue index (`start <= letter <= end`). The start letter is never
//! required to precede the end letter: an inverted selection is simply an
//! empty range.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::scale::GradeScale;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRange {
    /// Highest grade eligible for entry
    pub start: String,
    /// Lowest grade eligible for entry
    pub end: String,
}

impl GradeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Range spanning the whole scale, first letter to last.
    pub fn full(scale: &GradeScale) -> Self {
        let grades = scale.grades();
        let start = grades.first().map(|g| g.letter.clone()).unwrap_or_default();
        let end = grades.last().map(|g| g.letter.clone()).unwrap_or_default();
        Self { start, end }
    }

    /// True iff `letter` sits between `start` and `end` inclusive by
    /// catalogue index. Unknown letters are never in range.
    pub fn contains(&self, scale: &GradeScale, letter: &str) -> bool {
        match (
            scale.index_of(&self.start),
            scale.index_of(&self.end),
            scale.index_of(letter),
        ) {
            (Some(start), Some(end), Some(idx)) => start <= idx && idx <= end,
            _ => false,
        }
    }

    /// True when the start letter comes after the end letter on the scale.
    pub fn is_inverted(&self, scale: &GradeScale) -> bool {
        matches!(
            (scale.index_of(&self.start), scale.index_of(&self.end)),
            (Some(start), Some(end)) if start > end
        )
    }

    /// In-range letters, in catalogue order.
    pub fn active_letters<'a>(&self, scale: &'a GradeScale) -> Vec<&'a str> {
        scale
            .letters()
            .filter(|letter| self.contains(scale, letter))
            .collect()
    }
}

impl Default for GradeRange {
    fn default() -> Self {
        Self::full(GradeScale::usp())
    }
}

impl fmt::Display for GradeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Range membership against the default catalogue.
pub fn is_letter_in_range(letter: &str, range: &GradeRange) -> bool {
    range.contains(GradeScale::usp(), letter)
}
