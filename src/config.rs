//! Configuration loaded from config.json.
//!
//! Looks for config.json next to the executable. If the file doesn't exist
//! or can't be parsed, default values are used.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::grades::{GradeRange, GradeScale};

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<GpaConfig> = OnceLock::new();

/// Complete calculator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GpaConfig {
    /// Grade letters and point values, highest first
    #[serde(default)]
    pub grade_scale: GradeScale,
    /// Default highest grade of the active range
    #[serde(default = "default_start")]
    pub default_start: String,
    /// Default lowest grade of the active range
    #[serde(default = "default_end")]
    pub default_end: String,
    /// Words from Tesseract TSV output below this confidence are dropped
    #[serde(default = "default_min_word_confidence")]
    pub min_word_confidence: f32,
}

fn default_start() -> String {
    "A+".to_string()
}

fn default_end() -> String {
    "E".to_string()
}

fn default_min_word_confidence() -> f32 {
    60.0
}

impl Default for GpaConfig {
    fn default() -> Self {
        Self {
            grade_scale: GradeScale::default(),
            default_start: default_start(),
            default_end: default_end(),
            min_word_confidence: default_min_word_confidence(),
        }
    }
}

impl GpaConfig {
    /// Load config from file, or return defaults if the file is missing or
    /// unreadable. An invalid grade scale falls back to the USP catalogue.
    pub fn load(config_path: &Path) -> Self {
        crate::log(&format!("Looking for config at: {}", config_path.display()));

        if !config_path.exists() {
            crate::log("config.json not found. Using default config.");
            return Self::default();
        }

        let mut config: GpaConfig = match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    config
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                    return Self::default();
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
                return Self::default();
            }
        };

        if let Err(e) = config.grade_scale.validate() {
            crate::log(&format!(
                "Invalid grade_scale in config.json: {}. Using the USP scale.",
                e
            ));
            config.grade_scale = GradeScale::default();
        }

        config
    }

    /// Save default config to file (for reference).
    pub fn save_default(config_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(config_path, json)
            .context(format!("Failed to write config: {}", config_path.display()))
    }

    /// The configured default active range. Not validated: an inverted or
    /// unknown selection is kept as-is and behaves as an empty range.
    pub fn default_range(&self) -> GradeRange {
        GradeRange::new(self.default_start.clone(), self.default_end.clone())
    }
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(GpaConfig::load(&crate::paths::get_config_path()));
}

/// Returns the global configuration, loading it on first use.
pub fn get_config() -> &'static GpaConfig {
    CONFIG.get_or_init(|| GpaConfig::load(&crate::paths::get_config_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn create_test_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GpaConfig::load(Path::new("/nonexistent/config.json"));
        assert_eq!(config.grade_scale, GradeScale::default());
        assert_eq!(config.default_range(), GradeRange::new("A+", "E"));
        assert!((config.min_word_confidence - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let file = create_test_config(r#"{ "default_start": "B+", "default_end": "C" }"#);
        let config = GpaConfig::load(file.path());
        assert_eq!(config.default_range(), GradeRange::new("B+", "C"));
        assert_eq!(config.grade_scale.len(), 8);
    }

    #[test]
    fn test_custom_scale() {
        let file = create_test_config(
            r#"{ "grade_scale": [
                { "letter": "HD", "points": 7.0 },
                { "letter": "D", "points": 6.0 },
                { "letter": "P", "points": 4.0 }
            ], "default_start": "HD", "default_end": "P" }"#,
        );
        let config = GpaConfig::load(file.path());
        assert_eq!(config.grade_scale.len(), 3);
        assert_eq!(config.grade_scale.index_of("P"), Some(2));
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let file = create_test_config(
            r#"{ "grade_scale": [
                { "letter": "P", "points": 1.0 },
                { "letter": "HD", "points": 7.0 }
            ] }"#,
        );
        let config = GpaConfig::load(file.path());
        assert_eq!(config.grade_scale, GradeScale::default());
    }

    #[test]
    fn test_unparsable_config_uses_defaults() {
        let file = create_test_config("{ not json");
        let config = GpaConfig::load(file.path());
        assert_eq!(config.default_start, "A+");
    }

    #[test]
    fn test_inverted_default_range_is_kept() {
        let file = create_test_config(r#"{ "default_start": "D", "default_end": "A" }"#);
        let config = GpaConfig::load(file.path());
        let range = config.default_range();
        assert_eq!(range.start, "D");
        assert!(range.is_inverted(&config.grade_scale));
    }

    #[test]
    fn test_save_default_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        GpaConfig::save_default(&path).unwrap();

        let config = GpaConfig::load(&path);
        assert_eq!(config.grade_scale, GradeScale::default());
        assert_eq!(config.default_end, "E");
    }
}
