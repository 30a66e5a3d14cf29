//! OCR transcript intake.
//!
//! The OCR engine runs outside this crate. Its result arrives either as plain
//! text or as Tesseract TSV output; both are flattened to one transcript
//! string for the grade extractor.

use serde::Serialize;

/// A single word from OCR with confidence score
#[derive(Debug, Clone, Serialize)]
pub struct OcrWord {
    pub text: String,
    pub confidence: f32,
}

/// A line of OCR words with average confidence
#[derive(Debug, Clone, Serialize)]
pub struct OcrLine {
    pub words: Vec<OcrWord>,
    pub confidence: f32,
}

impl OcrLine {
    fn from_words(words: Vec<OcrWord>) -> Self {
        let confidence = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.confidence).sum::<f32>() / words.len() as f32
        };
        Self { words, confidence }
    }

    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Raw recognized text handed to the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn from_plain(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Flattens Tesseract TSV output, keeping words whose confidence is at
    /// least `min_confidence`. Words on the same line are joined with spaces
    /// and lines with newlines.
    pub fn from_tsv(tsv: &str, min_confidence: f32) -> Self {
        let text = parse_tsv_lines(tsv)
            .into_iter()
            .map(|mut line| {
                line.words.retain(|w| w.confidence >= min_confidence);
                line
            })
            .filter(|line| !line.words.is_empty())
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Parses Tesseract TSV output into lines of words.
///
/// Rows that are not level-5 words, have fewer than 12 fields, carry empty
/// text, or report a negative confidence are skipped.
pub fn parse_tsv_lines(tsv: &str) -> Vec<OcrLine> {
    let mut lines: Vec<OcrLine> = Vec::new();
    let mut current_key: Option<(i32, i32, i32, i32)> = None;
    let mut current_words: Vec<OcrWord> = Vec::new();

    // Skip header
    for row in tsv.lines().skip(1) {
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let level: i32 = fields[0].trim().parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let conf: f32 = fields[10].trim().parse().unwrap_or(-1.0);
        if conf < 0.0 {
            continue;
        }

        // Line numbers restart per paragraph, so key on the full position
        let key: (i32, i32, i32, i32) = (
            fields[1].trim().parse().unwrap_or(-1),
            fields[2].trim().parse().unwrap_or(-1),
            fields[3].trim().parse().unwrap_or(-1),
            fields[4].trim().parse().unwrap_or(-1),
        );

        if current_key.is_some_and(|k| k != key) && !current_words.is_empty() {
            lines.push(OcrLine::from_words(std::mem::take(&mut current_words)));
        }
        current_key = Some(key);

        current_words.push(OcrWord {
            text: text.to_string(),
            confidence: conf,
        });
    }

    if !current_words.is_empty() {
        lines.push(OcrLine::from_words(current_words));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word_row(block: i32, line: i32, word: i32, conf: f32, text: &str) -> String {
        format!("5\t1\t{block}\t1\t{line}\t{word}\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn test_parse_tsv_groups_lines() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t".to_string(),
            word_row(1, 1, 1, 95.0, "CS111"),
            word_row(1, 1, 2, 91.0, "A+"),
            word_row(1, 2, 1, 88.0, "MA111"),
            word_row(1, 2, 2, 80.0, "B"),
        ]
        .join("\n");

        let lines = parse_tsv_lines(&tsv);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "CS111 A+");
        assert_eq!(lines[1].text(), "MA111 B");
        assert!((lines[0].confidence - 93.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_tsv_splits_on_new_block() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 90.0, "A"),
            word_row(2, 1, 1, 90.0, "B"),
        ]
        .join("\n");
        let lines = parse_tsv_lines(&tsv);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_parse_tsv_skips_malformed_rows() {
        let tsv = [
            HEADER.to_string(),
            "garbage".to_string(),
            "5\t1\t1".to_string(),
            word_row(1, 1, 1, -1.0, "ignored"),
            word_row(1, 1, 2, 90.0, "   "),
            word_row(1, 1, 3, 90.0, "C+"),
        ]
        .join("\n");
        let lines = parse_tsv_lines(&tsv);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "C+");
    }

    #[test]
    fn test_transcript_from_tsv_filters_confidence() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 95.0, "A+"),
            word_row(1, 1, 2, 30.0, "A"),
            word_row(1, 2, 1, 20.0, "B"),
            word_row(1, 3, 1, 70.0, "C"),
        ]
        .join("\n");
        let transcript = Transcript::from_tsv(&tsv, 60.0);
        assert_eq!(transcript.as_str(), "A+\nC");
    }

    #[test]
    fn test_blank_transcript() {
        assert!(Transcript::from_plain("  \n").is_blank());
        assert!(Transcript::from_tsv(HEADER, 0.0).is_blank());
        assert!(Transcript::default().is_blank());
    }
}
