//! Per-letter grade counts.
//!
//! Counts are replaced wholesale by the extractor or edited letter by letter
//! from manual entry. Letters outside the scale never get an entry.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::scale::GradeScale;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeCounts {
    counts: BTreeMap<String, u32>,
}

impl GradeCounts {
    /// Empty mapping: no letter has a defined count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping with every scale letter present and set to 0.
    pub fn zeroed(scale: &GradeScale) -> Self {
        Self {
            counts: scale.letters().map(|l| (l.to_string(), 0)).collect(),
        }
    }

    /// Builds counts from raw manual-entry pairs.
    ///
    /// Quantities go through `parse_quantity`. Letters not on the scale are
    /// skipped.
    pub fn from_entries<'a, I>(scale: &GradeScale, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut counts = Self::new();
        for (letter, raw) in entries {
            let _ = counts.set_raw(scale, letter, raw);
        }
        counts
    }

    /// Defined count for `letter`, if any.
    pub fn get(&self, letter: &str) -> Option<u32> {
        self.counts.get(letter).copied()
    }

    /// Count for `letter`, treating a missing entry as 0.
    pub fn count(&self, letter: &str) -> u32 {
        self.get(letter).unwrap_or(0)
    }

    /// Sets the count for a scale letter. Unknown letters are rejected.
    pub fn set(&mut self, scale: &GradeScale, letter: &str, count: u32) -> Result<()> {
        if !scale.contains(letter) {
            return Err(anyhow!("Unknown grade letter: {}", letter));
        }
        self.counts.insert(letter.to_string(), count);
        Ok(())
    }

    /// Sets the count from manual-entry text (see `parse_quantity`).
    pub fn set_raw(&mut self, scale: &GradeScale, letter: &str, raw: &str) -> Result<()> {
        self.set(scale, letter, parse_quantity(raw))
    }

    /// Clears the entry for `letter`, returning its previous count.
    pub fn remove(&mut self, letter: &str) -> Option<u32> {
        self.counts.remove(letter)
    }

    pub(crate) fn increment(&mut self, letter: &str) {
        *self.counts.entry(letter.to_string()).or_insert(0) += 1;
    }

    /// Defined entries, ordered by letter (not by scale position).
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(l, &c)| (l.as_str(), c))
    }

    /// Number of grades entered across all letters.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Parses a manually entered quantity.
///
/// Accepts optional surrounding whitespace, an optional sign, and a run of
/// leading digits; trailing junk after the digits is ignored ("3 courses" is
/// 3). Anything without leading digits, and any negative value, is 0.
/// Values beyond `u32::MAX` saturate.
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || negative {
        return 0;
    }

    digits
        .bytes()
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as u64)
        })
        .min(u32::MAX as u64) as u32
}
