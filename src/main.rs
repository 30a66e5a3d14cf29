//! USP GPA Calculator
//!
//! Command-line front end: reads an OCR transcript or manually entered grade
//! counts, prints the per-grade table, and computes the GPA over the active
//! grade range.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use usp_gpa::analysis::csv_reader;
use usp_gpa::analysis::export::export_to_json;
use usp_gpa::analysis::gpa::summarize;
use usp_gpa::config::{self, GpaConfig};
use usp_gpa::grades::{GradeCounts, GradeRange, GradeScale};
use usp_gpa::ocr::{self, Transcript};
use usp_gpa::{log, paths};

#[derive(Parser)]
#[command(name = "usp-gpa")]
#[command(about = "GPA calculator with grade extraction from OCR transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract grade counts from an OCR transcript and compute the GPA
    Extract {
        /// Transcript file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Input is Tesseract TSV output rather than plain text
        #[arg(long)]
        tsv: bool,
        /// Minimum word confidence for TSV input (defaults to config)
        #[arg(long)]
        min_confidence: Option<f32>,
        #[command(flatten)]
        range: RangeArgs,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Show loose grade-shaped matches next to the strict counts
    Scan {
        /// Transcript file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Compute the GPA from a grade,count CSV file
    Gpa {
        /// CSV file with a grade,count header
        #[arg(long)]
        counts: PathBuf,
        #[command(flatten)]
        range: RangeArgs,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the default config.json next to the executable
    InitConfig,
}

#[derive(clap::Args)]
struct RangeArgs {
    /// Highest grade in the active range (defaults to config)
    #[arg(long)]
    start: Option<String>,
    /// Lowest grade in the active range (defaults to config)
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    /// Resolves the active range, rejecting letters that are not on the scale.
    /// Start and end are never reordered.
    fn resolve(&self, config: &GpaConfig) -> Result<GradeRange> {
        let scale = &config.grade_scale;
        let start = self.start.clone().unwrap_or_else(|| config.default_start.clone());
        let end = self.end.clone().unwrap_or_else(|| config.default_end.clone());

        for letter in [&start, &end] {
            if !scale.contains(letter) {
                return Err(anyhow!(
                    "Unknown grade letter '{}'. Expected one of: {}",
                    letter,
                    scale.letters().collect::<Vec<_>>().join(", ")
                ));
            }
        }

        let range = GradeRange::new(start, end);
        if range.is_inverted(scale) {
            log(&format!(
                "Warning: range {} is inverted; no grades are in range",
                range
            ));
        }
        Ok(range)
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read transcript from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).context(format!("Failed to read transcript: {}", input))
}

fn print_counts(counts: &GradeCounts, range: &GradeRange, scale: &GradeScale) {
    println!("Grade  Points  Count");
    for grade in scale.grades() {
        let count = if range.contains(scale, &grade.letter) {
            counts.count(&grade.letter).to_string()
        } else {
            "—".to_string()
        };
        println!("{:<6} {:>6.1}  {:>5}", grade.letter, grade.points, count);
    }
    println!("Total: {}", counts.total());
}

fn report(
    counts: &GradeCounts,
    range: &GradeRange,
    scale: &GradeScale,
    json: Option<&Path>,
) -> Result<()> {
    print_counts(counts, range, scale);

    let summary = summarize(counts, range, scale);
    println!("Range: {}", summary.range);
    match (summary.gpa, summary.band) {
        (Some(gpa), Some(band)) => {
            println!("GPA: {:.2} out of {} ({})", gpa, summary.out_of, band.label())
        }
        _ => println!("GPA: no grades entered in range"),
    }

    if let Some(path) = json {
        export_to_json(&summary, path)?;
        log(&format!("GPA report saved: {}", path.display()));
    }

    Ok(())
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    let cli = Cli::parse();

    // Ensure output directories exist
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    config::init_config();
    let config = config::get_config();
    let scale = &config.grade_scale;

    match cli.command {
        Commands::Extract {
            input,
            tsv,
            min_confidence,
            range,
            json,
        } => {
            let range = range.resolve(config)?;
            let raw = read_input(&input)?;
            let transcript = if tsv {
                Transcript::from_tsv(
                    &raw,
                    min_confidence.unwrap_or(config.min_word_confidence),
                )
            } else {
                Transcript::from_plain(raw)
            };

            let counts = ocr::grade_counts_from_transcript(&transcript, scale);
            report(&counts, &range, scale, json.as_deref())?;
        }
        Commands::Scan { input } => {
            let raw = read_input(&input)?;
            let strict = ocr::extract_grade_counts_with_scale(&raw, scale);
            let candidates = ocr::scan_grade_candidates(&raw, scale)?;
            let loose = ocr::tally_candidates(&candidates, scale);

            println!("Grade  Strict  Loose");
            for letter in scale.letters() {
                println!(
                    "{:<6} {:>6}  {:>5}",
                    letter,
                    strict.count(letter),
                    loose.count(letter)
                );
            }
            for candidate in &candidates {
                println!("  {} at byte {}", candidate.letter, candidate.offset);
            }
        }
        Commands::Gpa {
            counts,
            range,
            json,
        } => {
            let range = range.resolve(config)?;
            let grade_counts = csv_reader::counts_from_csv(&counts, scale)?;
            log(&format!(
                "Loaded {} grade entries from {}",
                grade_counts.len(),
                counts.display()
            ));
            report(&grade_counts, &range, scale, json.as_deref())?;
        }
        Commands::InitConfig => {
            let path = paths::get_config_path();
            GpaConfig::save_default(&path)?;
            println!("Default config written to {}.", path.display());
        }
    }

    Ok(())
}
