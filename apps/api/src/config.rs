use anyhow::{Context, Result};
use std::str::FromStr;

use crate::scoring::ScoringThresholds;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body cap for the upload endpoint.
    pub max_upload_bytes: usize,
    /// Turns the pdf-extract backend off even when it was compiled in.
    pub disable_primary_pdf: bool,
    pub analysis: AnalysisConfig,
}

/// Knobs consumed by the analysis core. Cloned into each blocking analysis task.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Pages decoded per PDF strategy; later pages are counted but not read.
    pub max_pages: usize,
    /// Primary PDF output shorter than this (in chars) triggers the fallback strategy.
    pub sparse_text_threshold: usize,
    pub scoring: ScoringThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_pages: 8,
            sparse_text_threshold: 200,
            scoring: ScoringThresholds::default(),
        }
    }
}

/// Uploads smaller than this are rejected before the core runs.
pub const MIN_UPLOAD_BYTES: usize = 200;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = AnalysisConfig::default();
        let scoring = ScoringThresholds {
            column_runs: env_or(
                "ATS_COLUMN_RUNS_THRESHOLD",
                defaults.scoring.column_runs,
            )?,
            symbol_noise: env_or(
                "ATS_SYMBOL_NOISE_THRESHOLD",
                defaults.scoring.symbol_noise,
            )?,
            ..defaults.scoring
        };

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            disable_primary_pdf: env_or("ATS_DISABLE_PRIMARY_PDF", false)?,
            analysis: AnalysisConfig {
                max_pages: env_or("ATS_MAX_PAGES", defaults.max_pages)?,
                sparse_text_threshold: env_or(
                    "ATS_SPARSE_TEXT_THRESHOLD",
                    defaults.sparse_text_threshold,
                )?,
                scoring,
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.max_pages, 8);
        assert_eq!(cfg.sparse_text_threshold, 200);
        assert_eq!(cfg.scoring.column_runs, 160);
        assert_eq!(cfg.scoring.symbol_noise, 80);
    }

    #[test]
    fn test_parse_value_accepts_padded_numbers() {
        let v: usize = parse_value("ATS_MAX_PAGES", " 12 ").unwrap();
        assert_eq!(v, 12);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_parse_value_bool() {
        assert!(parse_value::<bool>("ATS_DISABLE_PRIMARY_PDF", "true").unwrap());
        assert!(parse_value::<bool>("ATS_DISABLE_PRIMARY_PDF", "yes").is_err());
    }
}
