//! The ordered grade catalogue.
//!
//! Grades are ordered from highest academic standing to lowest. Position in
//! the catalogue, not the letter itself, is what range selection compares.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

static USP_SCALE: OnceLock<GradeScale> = OnceLock::new();

/// One valid grade letter and its point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDefinition {
    pub letter: String,
    pub points: f64,
}

impl GradeDefinition {
    pub fn new(letter: impl Into<String>, points: f64) -> Self {
        Self {
            letter: letter.into(),
            points,
        }
    }
}

/// Ordered sequence of grade definitions, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeScale {
    grades: Vec<GradeDefinition>,
}

impl GradeScale {
    /// Builds a scale, rejecting empty catalogues, duplicate letters,
    /// non-finite or negative points, and points that increase down the list.
    pub fn new(grades: Vec<GradeDefinition>) -> Result<Self> {
        let scale = Self { grades };
        scale.validate()?;
        Ok(scale)
    }

    /// The USP catalogue: A+ (4.5) down to E (1.0).
    pub fn usp() -> &'static GradeScale {
        USP_SCALE.get_or_init(|| GradeScale {
            grades: vec![
                GradeDefinition::new("A+", 4.5),
                GradeDefinition::new("A", 4.0),
                GradeDefinition::new("B+", 3.5),
                GradeDefinition::new("B", 3.0),
                GradeDefinition::new("C+", 2.5),
                GradeDefinition::new("C", 2.0),
                GradeDefinition::new("D", 1.5),
                GradeDefinition::new("E", 1.0),
            ],
        })
    }

    /// Checks the catalogue invariants. Used after deserializing a scale
    /// from configuration, since serde bypasses `new`.
    pub fn validate(&self) -> Result<()> {
        if self.grades.is_empty() {
            return Err(anyhow!("Grade scale must contain at least one grade"));
        }

        let mut seen = HashSet::new();
        for grade in &self.grades {
            if grade.letter.trim().is_empty() {
                return Err(anyhow!("Grade letter must not be empty"));
            }
            if !seen.insert(grade.letter.as_str()) {
                return Err(anyhow!("Duplicate grade letter: {}", grade.letter));
            }
            if !grade.points.is_finite() || grade.points < 0.0 {
                return Err(anyhow!(
                    "Invalid points for grade {}: {}",
                    grade.letter,
                    grade.points
                ));
            }
        }

        for pair in self.grades.windows(2) {
            if pair[1].points > pair[0].points {
                return Err(anyhow!(
                    "Grade points must not increase down the scale: {} ({}) follows {} ({})",
                    pair[1].letter,
                    pair[1].points,
                    pair[0].letter,
                    pair[0].points
                ));
            }
        }

        Ok(())
    }

    pub fn grades(&self) -> &[GradeDefinition] {
        &self.grades
    }

    pub fn letters(&self) -> impl Iterator<Item = &str> {
        self.grades.iter().map(|g| g.letter.as_str())
    }

    /// Catalogue position of `letter`. Exact, case-sensitive match.
    pub fn index_of(&self, letter: &str) -> Option<usize> {
        self.grades.iter().position(|g| g.letter == letter)
    }

    pub fn points(&self, letter: &str) -> Option<f64> {
        self.grades
            .iter()
            .find(|g| g.letter == letter)
            .map(|g| g.points)
    }

    pub fn contains(&self, letter: &str) -> bool {
        self.index_of(letter).is_some()
    }

    /// Highest point value on the scale, the "out of" figure for a GPA.
    pub fn max_points(&self) -> f64 {
        self.grades
            .iter()
            .map(|g| g.points)
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::usp().clone()
    }
}

/// The default catalogue, in order.
pub fn catalogue() -> &'static [GradeDefinition] {
    GradeScale::usp().grades()
}

/// Position of `letter` in the default catalogue.
pub fn index_of(letter: &str) -> Option<usize> {
    GradeScale::usp().index_of(letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usp_catalogue_order() {
        let letters: Vec<&str> = GradeScale::usp().letters().collect();
        assert_eq!(letters, vec!["A+", "A", "B+", "B", "C+", "C", "D", "E"]);
        assert_eq!(catalogue().len(), 8);
        assert_eq!(catalogue()[0].points, 4.5);
        assert_eq!(catalogue()[7].points, 1.0);
    }

    #[test]
    fn test_usp_catalogue_is_valid() {
        assert!(GradeScale::usp().validate().is_ok());
        assert!((GradeScale::usp().max_points() - 4.5).abs() < 0.001);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("A+"), Some(0));
        assert_eq!(index_of("B"), Some(3));
        assert_eq!(index_of("E"), Some(7));
        assert_eq!(index_of("F"), None);
        // Lookup is exact; normalisation is the caller's job
        assert_eq!(index_of("a+"), None);
    }

    #[test]
    fn test_points_lookup() {
        let scale = GradeScale::usp();
        assert_eq!(scale.points("C+"), Some(2.5));
        assert_eq!(scale.points("Z"), None);
    }

    #[test]
    fn test_rejects_duplicate_letters() {
        let result = GradeScale::new(vec![
            GradeDefinition::new("A", 4.0),
            GradeDefinition::new("A", 3.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_increasing_points() {
        let result = GradeScale::new(vec![
            GradeDefinition::new("P", 1.0),
            GradeDefinition::new("HD", 4.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_tied_points() {
        let scale = GradeScale::new(vec![
            GradeDefinition::new("A+", 4.0),
            GradeDefinition::new("A", 4.0),
            GradeDefinition::new("F", 0.0),
        ])
        .unwrap();
        assert_eq!(scale.len(), 3);
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(GradeScale::new(vec![]).is_err());
        assert!(GradeScale::new(vec![GradeDefinition::new("A", f64::NAN)]).is_err());
        assert!(GradeScale::new(vec![GradeDefinition::new(" ", 1.0)]).is_err());
    }
}
