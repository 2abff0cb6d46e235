use chrono::NaiveDate;
use thiserror::Error;

/// Precondition failures of the extreme detection and transition pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("half-window {half_window} is not usable on a series of {len} observations (need 0 < H < N)")]
    InvalidWindow { len: usize, half_window: usize },

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("cannot compute a return from the extreme on {date} with value {value}")]
    DegenerateReturn { date: NaiveDate, value: f64 },
}
