//! CSV reader for manually entered grade counts.
//!
//! Parses a two-column `grade,count` file into `GradeCounts`.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::grades::{parse_quantity, GradeCounts, GradeScale};

/// Load grade counts from a CSV file.
///
/// CSV format expected:
/// grade,count
///
/// Skips the header row and any malformed rows (with warning log).
pub fn counts_from_csv(path: &Path, scale: &GradeScale) -> Result<GradeCounts> {
    let file = File::open(path).context(format!("Failed to open CSV file: {}", path.display()))?;
    counts_from_reader(file, scale)
}

/// Load grade counts from any CSV source (file, stdin, in-memory buffer).
pub fn counts_from_reader<R: Read>(source: R, scale: &GradeScale) -> Result<GradeCounts> {
    let reader = BufReader::new(source);
    let mut counts = GradeCounts::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read line from CSV")?;

        // Skip header row
        if line_num == 0 {
            continue;
        }

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line, scale) {
            Ok((letter, count)) => {
                if counts.get(&letter).is_some() {
                    crate::log(&format!(
                        "Warning: Grade {} listed again on CSV row {}; using the later value",
                        letter,
                        line_num + 1
                    ));
                }
                counts.set(scale, &letter, count)?;
            }
            Err(e) => {
                crate::log(&format!(
                    "Warning: Skipping malformed CSV row {}: {}",
                    line_num + 1,
                    e
                ));
            }
        }
    }

    Ok(counts)
}

/// Parse a single CSV line into a scale letter and count.
fn parse_line(line: &str, scale: &GradeScale) -> Result<(String, u32)> {
    let parts: Vec<&str> = line.split(',').collect();

    if parts.len() < 2 {
        return Err(anyhow!("Expected 2 columns, got {}", parts.len()));
    }

    let letter = parts[0].trim();
    if !scale.contains(letter) {
        return Err(anyhow!("Unknown grade letter: {}", letter));
    }

    Ok((letter.to_string(), parse_quantity(parts[1])))
}
