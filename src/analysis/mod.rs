pub mod detector;
pub mod transitions;
pub mod trend;
pub mod window;

pub use detector::detect_windowed;
pub use transitions::summarize_transitions;
pub use trend::summarize_trend;

use crate::analysis::window::WindowExtrema;
use crate::config::AnalysisParams;
use crate::data::{ExtremeFlag, ExtremeSummary, TimeSeries};
use crate::error::AnalysisError;

/// Output of a full detection and summary pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeAnalysis {
    pub windows: Vec<WindowExtrema>,
    pub flags: Vec<ExtremeFlag>,
    pub summary: Vec<ExtremeSummary>,
}

/// Run detection and transition summary with one parameter set.
pub fn analyze(
    series: &TimeSeries,
    params: &AnalysisParams,
) -> Result<ExtremeAnalysis, AnalysisError> {
    let (windows, flags) = detect_windowed(series, params.half_window)?;
    let summary = summarize_transitions(series, &flags, params.duplicate_policy)?;
    Ok(ExtremeAnalysis {
        windows,
        flags,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::config::DuplicatePolicy;

    #[test]
    fn test_plateau_policies_differ() {
        let start = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let values = [5.0, 2.0, 2.0, 2.0, 6.0, 7.0, 3.0, 8.0];
        let series = TimeSeries::from_values(
            (0..values.len() as u64).map(|i| start + Days::new(i)),
            values,
        )
        .unwrap();

        let first = analyze(&series, &AnalysisParams::new(1)).unwrap();
        let all = analyze(
            &series,
            &AnalysisParams::new(1).with_duplicate_policy(DuplicatePolicy::KeepAll),
        )
        .unwrap();

        assert_eq!(first.flags, all.flags);
        assert!(all.summary.len() > first.summary.len());
        for pair in first.summary.windows(2) {
            assert_ne!(pair[0].event.kind, pair[1].event.kind);
        }
    }

    #[test]
    fn test_window_error_propagates() {
        let start = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let series = TimeSeries::from_values([start], [1.0]).unwrap();
        assert_eq!(
            analyze(&series, &AnalysisParams::new(1)),
            Err(AnalysisError::InvalidWindow {
                len: 1,
                half_window: 1
            })
        );
    }
}
