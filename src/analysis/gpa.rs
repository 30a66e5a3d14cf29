//! GPA aggregation.
//!
//! The GPA is the point-weighted mean of the counts for letters in the active
//! range, rounded to two decimals half away from zero (4.125 → 4.13). When no
//! eligible units were entered the result is `None`, which is distinct from a
//! GPA of zero.
//!
//! Sums and the division are done in `Decimal`, so a mean that is exactly
//! half-way in decimal (20.5 / 20 = 1.025) rounds up even when the nearest
//! `f64` sits just below the tie.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::grades::{GradeCounts, GradeRange, GradeScale};

/// Colour band used when presenting a GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GpaBand {
    /// 4.0 and above
    Excellent,
    /// 3.5 to below 4.0
    VeryGood,
    /// 3.0 to below 3.5
    Good,
    /// 2.0 to below 3.0
    Satisfactory,
    /// Below 2.0
    Low,
}

impl GpaBand {
    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 4.0 {
            GpaBand::Excellent
        } else if gpa >= 3.5 {
            GpaBand::VeryGood
        } else if gpa >= 3.0 {
            GpaBand::Good
        } else if gpa >= 2.0 {
            GpaBand::Satisfactory
        } else {
            GpaBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpaBand::Excellent => "excellent",
            GpaBand::VeryGood => "very good",
            GpaBand::Good => "good",
            GpaBand::Satisfactory => "satisfactory",
            GpaBand::Low => "low",
        }
    }
}

/// Result of one aggregation, ready for display or export.
#[derive(Debug, Clone, Serialize)]
pub struct GpaSummary {
    /// Active range the GPA was computed over
    pub range: GradeRange,
    /// Rounded GPA, or null when no eligible grades were entered
    pub gpa: Option<f64>,
    /// Highest point value on the scale
    pub out_of: f64,
    /// Presentation band for the GPA
    pub band: Option<GpaBand>,
    /// Number of grades counted
    pub total_units: u64,
    /// Sum of points over counted grades
    pub total_points: f64,
    /// All counts as entered, including letters outside the range
    pub counts: GradeCounts,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    points: Decimal,
    units: u64,
}

impl Totals {
    /// Point values enter as their shortest decimal form (4.5, not the
    /// binary expansion), so scale values like 3.3 stay exact.
    fn add(&mut self, points: f64, count: u32) {
        if count == 0 {
            return;
        }
        let points = Decimal::from_f64(points).unwrap_or(Decimal::ZERO);
        self.points += points * Decimal::from(count);
        self.units += u64::from(count);
    }

    fn gpa(&self) -> Option<f64> {
        if self.units == 0 {
            return None;
        }
        round_to_hundredths(self.points / Decimal::from(self.units)).to_f64()
    }
}

fn range_totals(counts: &GradeCounts, range: &GradeRange, scale: &GradeScale) -> Totals {
    let mut totals = Totals::default();
    for grade in scale.grades() {
        if !range.contains(scale, &grade.letter) {
            continue;
        }
        totals.add(grade.points, counts.count(&grade.letter));
    }
    totals
}

/// Rounds to two decimal places, ties away from zero.
pub fn round_to_hundredths(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// GPA over the active range, using the default catalogue.
pub fn compute_gpa(counts: &GradeCounts, range: &GradeRange) -> Option<f64> {
    compute_gpa_with_scale(counts, range, GradeScale::usp())
}

/// GPA over the active range. Counts for letters outside the range are
/// ignored, so an inverted range always gives `None`.
pub fn compute_gpa_with_scale(
    counts: &GradeCounts,
    range: &GradeRange,
    scale: &GradeScale,
) -> Option<f64> {
    range_totals(counts, range, scale).gpa()
}

/// GPA over pairs the caller has already filtered to the active range.
/// Letters not on the scale are ignored.
pub fn aggregate<'a, I>(scale: &GradeScale, pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut totals = Totals::default();
    for (letter, count) in pairs {
        if let Some(points) = scale.points(letter) {
            totals.add(points, count);
        }
    }
    totals.gpa()
}

/// Computes the GPA together with the totals and band behind it.
pub fn summarize(counts: &GradeCounts, range: &GradeRange, scale: &GradeScale) -> GpaSummary {
    let totals = range_totals(counts, range, scale);
    let gpa = totals.gpa();

    GpaSummary {
        range: range.clone(),
        gpa,
        out_of: scale.max_points(),
        band: gpa.map(GpaBand::from_gpa),
        total_units: totals.units,
        total_points: totals.points.to_f64().unwrap_or_default(),
        counts: counts.clone(),
    }
}
