//! USP GPA Calculator core.
//!
//! Turns a raw OCR transcript of a results screenshot into per-letter grade
//! counts, and computes the grade-point average over an active grade range.

pub mod analysis;
pub mod config;
pub mod grades;
pub mod ocr;
pub mod paths;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

pub use analysis::{compute_gpa, GpaBand, GpaSummary};
pub use grades::{
    catalogue, index_of, is_letter_in_range, GradeCounts, GradeDefinition, GradeRange,
    GradeScale,
};
pub use ocr::{extract_grade_counts, Transcript};

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("usp_gpa.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
