use anyhow::Result;
use regex::Regex;

use crate::grades::{GradeCounts, GradeScale};

/// Characters that separate tokens in addition to whitespace.
const SEPARATORS: [char; 6] = [',', '\t', '\n', '\r', '|', ';'];

/// A grade-shaped substring found by the loose scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeCandidate {
    /// Scale letter the substring matched
    pub letter: String,
    /// Byte offset of the match in the transcript
    pub offset: usize,
}

/// Splits a transcript into non-empty tokens on whitespace and separators.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|token| !token.is_empty())
}

/// Scale letter equal to `token` ignoring case, if any.
fn match_letter<'a>(scale: &'a GradeScale, token: &str) -> Option<&'a str> {
    let cleaned = token.trim().to_uppercase();
    scale.letters().find(|letter| letter.to_uppercase() == cleaned)
}

/// Counts grade letters in an OCR transcript against the default catalogue.
pub fn extract_grade_counts(text: &str) -> GradeCounts {
    extract_grade_counts_with_scale(text, GradeScale::usp())
}

/// Counts grade letters in an OCR transcript.
///
/// Every scale letter is present in the result, starting at 0. A token only
/// counts when it equals a grade letter exactly (case-insensitive), so
/// course codes, marks, and partial reads such as "A1" or "B++" are
/// ignored. Never fails: noisy or empty text just yields zeros.
pub fn extract_grade_counts_with_scale(text: &str, scale: &GradeScale) -> GradeCounts {
    let mut counts = GradeCounts::zeroed(scale);

    for token in tokenize(text) {
        if let Some(letter) = match_letter(scale, token) {
            counts.increment(letter);
        }
    }

    counts
}

/// Number of tokens the extractor considers, matched or not.
pub fn token_count(text: &str) -> usize {
    tokenize(text).count()
}

/// Builds the loose pattern: any scale letter at the start of a word,
/// longest letters first so "A+" wins over "A".
fn candidate_regex(scale: &GradeScale) -> Result<Regex> {
    let mut letters: Vec<&str> = scale.letters().collect();
    letters.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternatives = letters
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"(?i)\b(?:{})", alternatives))?)
}

/// Diagnostic-only scan for grade-shaped substrings anywhere in the text.
///
/// This over-counts: the "A" of "ACCOUNTING" or the "C" of "CS101" both
/// match. Use it to eyeball a transcript, never as the extracted grades;
/// `extract_grade_counts` is the authoritative result.
pub fn scan_grade_candidates(text: &str, scale: &GradeScale) -> Result<Vec<GradeCandidate>> {
    let re = candidate_regex(scale)?;

    let candidates = re
        .find_iter(text)
        .filter_map(|m| {
            match_letter(scale, m.as_str()).map(|letter| GradeCandidate {
                letter: letter.to_string(),
                offset: m.start(),
            })
        })
        .collect();

    Ok(candidates)
}

/// Tallies loose candidates per letter, for side-by-side display with the
/// strict counts.
pub fn tally_candidates(candidates: &[GradeCandidate], scale: &GradeScale) -> GradeCounts {
    let mut counts = GradeCounts::zeroed(scale);
    for candidate in candidates {
        counts.increment(&candidate.letter);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::GradeDefinition;

    fn counts_of(counts: &GradeCounts) -> Vec<u32> {
        GradeScale::usp().letters().map(|l| counts.count(l)).collect()
    }

    #[test]
    fn test_exact_frequencies() {
        let counts = extract_grade_counts("A+ A B A+ C E A+ D B+");
        assert_eq!(counts_of(&counts), vec![3, 1, 1, 1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        for text in ["", "   ", "\n\t\r"] {
            let counts = extract_grade_counts(text);
            assert_eq!(counts.len(), 8);
            assert_eq!(counts.total(), 0);
        }
    }

    #[test]
    fn test_superstrings_are_ignored() {
        let counts = extract_grade_counts("A1 B++ Cx Ab A++ AB E2");
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.len(), 8);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            extract_grade_counts("a+ a b"),
            extract_grade_counts("A+ A B")
        );
        assert_eq!(extract_grade_counts("c+").count("C+"), 1);
    }

    #[test]
    fn test_mixed_tokens() {
        let counts = extract_grade_counts("A+, MATH101, B, 42, C");
        assert_eq!(counts.count("A+"), 1);
        assert_eq!(counts.count("B"), 1);
        assert_eq!(counts.count("C"), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_all_separators() {
        let counts = extract_grade_counts("A|B;C,D\tE\r\nB+");
        assert_eq!(counts_of(&counts), vec![0, 1, 1, 1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_transcript_table() {
        let transcript = "\
CS111 Introduction to Computing 2024 S1 A+
MA111 Calculus I | B+
UU100 Communication & Information Literacy ; A
ST130 Basic Statistics 78 B";
        let counts = extract_grade_counts(transcript);
        assert_eq!(counts.count("A+"), 1);
        assert_eq!(counts.count("A"), 1);
        assert_eq!(counts.count("B+"), 1);
        assert_eq!(counts.count("B"), 1);
        // "Introduction", "Communication" etc. start with grade letters
        // but are not whole-token matches
        assert_eq!(counts.count("C"), 0);
        assert_eq!(counts.count("E"), 0);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let text = "A+ | MATH101 ; b+ A";
        assert_eq!(extract_grade_counts(text), extract_grade_counts(text));
        assert_eq!(token_count(text), 4);
        assert_eq!(token_count(" ,;| "), 0);
    }

    #[test]
    fn test_loose_scan_over_counts() {
        let text = "ACCOUNTING A CS101 B+";
        let candidates = scan_grade_candidates(text, GradeScale::usp()).unwrap();
        let letters: Vec<&str> = candidates.iter().map(|c| c.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "A", "C", "B+"]);

        let strict = extract_grade_counts(text);
        assert_eq!(strict.total(), 2);
        assert_eq!(tally_candidates(&candidates, GradeScale::usp()).total(), 4);
    }

    #[test]
    fn test_loose_scan_prefers_longest_letter() {
        let candidates = scan_grade_candidates("a+", GradeScale::usp()).unwrap();
        assert_eq!(
            candidates,
            vec![GradeCandidate {
                letter: "A+".to_string(),
                offset: 0
            }]
        );
    }

    #[test]
    fn test_custom_scale() {
        let scale = GradeScale::new(vec![
            GradeDefinition::new("HD", 7.0),
            GradeDefinition::new("D", 6.0),
            GradeDefinition::new("P", 4.0),
        ])
        .unwrap();
        let counts = extract_grade_counts_with_scale("hd HD d P pp", &scale);
        assert_eq!(counts.count("HD"), 2);
        assert_eq!(counts.count("D"), 1);
        assert_eq!(counts.count("P"), 1);
        assert_eq!(counts.len(), 3);
    }
}
