pub mod extract;
pub mod transcript;

pub use extract::{
    extract_grade_counts, extract_grade_counts_with_scale, scan_grade_candidates,
    tally_candidates, token_count, GradeCandidate,
};
pub use transcript::{parse_tsv_lines, OcrLine, OcrWord, Transcript};

use crate::grades::{GradeCounts, GradeScale};

/// High-level function: OCR transcript → grade counts.
///
/// Runs the strict extractor and logs how it compares with the loose scan.
/// The loose candidates are only logged.
pub fn grade_counts_from_transcript(transcript: &Transcript, scale: &GradeScale) -> GradeCounts {
    let text = transcript.as_str();
    if transcript.is_blank() {
        crate::log("Transcript is empty; no grades to extract");
    }

    let counts = extract_grade_counts_with_scale(text, scale);

    let loose = match scan_grade_candidates(text, scale) {
        Ok(candidates) => candidates.len().to_string(),
        Err(e) => format!("unavailable ({})", e),
    };
    crate::log(&format!(
        "Extracted {} grades from {} tokens (loose scan candidates: {})",
        counts.total(),
        token_count(text),
        loose
    ));

    counts
}
