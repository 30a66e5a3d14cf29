//! Grade catalogue, active-range selection, and per-letter grade counts.

pub mod counts;
pub mod range;
pub mod scale;

pub use counts::{parse_quantity, GradeCounts};
pub use range::{is_letter_in_range, GradeRange};
pub use scale::{catalogue, index_of, GradeDefinition, GradeScale};
