use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

/// How consecutive extremes of the same kind are treated before returns are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// Keep the first extreme of each run of same-kind extremes.
    #[default]
    FirstOccurrence,
    /// Keep every flagged extreme.
    ///
    /// Plateau points inherit the kind of the extreme before them, so a step
    /// down from a flat top is reported as a maximum-to-maximum `gain` with a
    /// negative return (and symmetrically a `loss` with a positive return).
    KeepAll,
}

/// Parameters handed to the detection and summary stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub half_window: usize,
    pub duplicate_policy: DuplicatePolicy,
}

impl AnalysisParams {
    pub fn new(half_window: usize) -> Self {
        Self {
            half_window,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

/// Command-line configuration for the local extreme momentum tool.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Input CSV file with a `Date` column and a price column.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input_path: String,

    /// Name of the price column to analyse.
    #[arg(long, default_value = "Price")]
    pub price_column: String,

    /// One-sided window length, in observations.
    #[arg(short = 'w', long, default_value_t = 20)]
    pub half_window: usize,

    /// Ignore observations before this date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Ignore observations after this date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// Handling of consecutive same-kind extremes.
    #[arg(long = "duplicates", value_enum, default_value = "first-occurrence")]
    pub duplicate_policy: DuplicatePolicy,

    /// Optional CSV file receiving the extreme summary.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Optional CSV file receiving per-observation window extrema and flags.
    #[arg(long = "flags-output", value_name = "FILE")]
    pub flags_output_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn analysis_params(&self) -> AnalysisParams {
        AnalysisParams::new(self.half_window).with_duplicate_policy(self.duplicate_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::parse_from(["extreme-momentum", "-i", "prices.csv"]);
        assert_eq!(config.price_column, "Price");
        assert_eq!(config.half_window, 20);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstOccurrence);
        assert!(config.start_date.is_none());
        assert!(config.output_path.is_none());
        assert!(config.flags_output_path.is_none());
    }

    #[test]
    fn test_parses_flags_output() {
        let config = AppConfig::parse_from([
            "extreme-momentum",
            "-i",
            "prices.csv",
            "--flags-output",
            "flags.csv",
        ]);
        assert_eq!(config.flags_output_path, Some(PathBuf::from("flags.csv")));
    }

    #[test]
    fn test_parses_dates_and_policy() {
        let config = AppConfig::parse_from([
            "extreme-momentum",
            "--input",
            "spx.csv",
            "-w",
            "5",
            "--start-date",
            "2020-01-01",
            "--duplicates",
            "keep-all",
        ]);
        let params = config.analysis_params();
        assert_eq!(params.half_window, 5);
        assert_eq!(params.duplicate_policy, DuplicatePolicy::KeepAll);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result =
            AppConfig::try_parse_from(["extreme-momentum", "-i", "a.csv", "--duplicates", "last"]);
        assert!(result.is_err());
    }
}
