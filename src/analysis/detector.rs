use tracing::debug;

use crate::analysis::window::{centered_extrema, WindowExtrema};
use crate::data::{ExtremeFlag, TimeSeries};
use crate::error::AnalysisError;

/// Flag plain local minima and maxima over a centred window of `half_window`
/// observations on each side.
///
/// A point is a local minimum (maximum) when its own value equals the minimum
/// (maximum) of its window. Comparison is exact, so flat stretches flag every
/// point they contain. Missing values are never flagged.
#[allow(dead_code)]
pub fn detect_extremes(
    series: &TimeSeries,
    half_window: usize,
) -> Result<Vec<ExtremeFlag>, AnalysisError> {
    detect_windowed(series, half_window).map(|(_, flags)| flags)
}

/// Same as [`detect_extremes`], also returning the window minimum and maximum
/// each flag was compared against, aligned with the series.
pub fn detect_windowed(
    series: &TimeSeries,
    half_window: usize,
) -> Result<(Vec<WindowExtrema>, Vec<ExtremeFlag>), AnalysisError> {
    if series.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    if half_window == 0 || half_window >= series.len() {
        return Err(AnalysisError::InvalidWindow {
            len: series.len(),
            half_window,
        });
    }

    let values = series.values();
    let windows = centered_extrema(&values, half_window);
    let flags: Vec<ExtremeFlag> = values
        .iter()
        .zip(&windows)
        .map(|(value, window)| match value {
            Some(value) => ExtremeFlag {
                is_local_minimum: window.min == Some(*value),
                is_local_maximum: window.max == Some(*value),
            },
            None => ExtremeFlag::default(),
        })
        .collect();

    debug!(
        observations = series.len(),
        half_window,
        minima = flags.iter().filter(|f| f.is_local_minimum).count(),
        maxima = flags.iter().filter(|f| f.is_local_maximum).count(),
        flat = flags.iter().filter(|f| f.is_flat()).count(),
        "flagged local extremes"
    );
    Ok((windows, flags))
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::data::PricePoint;

    fn series(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TimeSeries::from_values(
            (0..values.len() as u64).map(|i| start + Days::new(i)),
            values.iter().copied(),
        )
        .unwrap()
    }

    fn flag(min: bool, max: bool) -> ExtremeFlag {
        ExtremeFlag {
            is_local_minimum: min,
            is_local_maximum: max,
        }
    }

    #[test]
    fn test_worked_example() {
        let flags = detect_extremes(&series(&[10.0, 8.0, 12.0, 6.0, 14.0]), 1).unwrap();
        assert_eq!(
            flags,
            vec![
                flag(false, true),
                flag(true, false),
                flag(false, true),
                flag(true, false),
                flag(false, true),
            ]
        );
    }

    #[test]
    fn test_one_flag_per_observation() {
        let values = [5.0, 3.0, 3.5, 7.0, 6.0, 6.5, 2.0, 4.0, 9.0, 8.0, 8.5];
        for half_window in 1..values.len() {
            let flags = detect_extremes(&series(&values), half_window).unwrap();
            assert_eq!(flags.len(), values.len());
        }
    }

    #[test]
    fn test_flags_dominate_their_window() {
        let values = [5.0, 3.0, 3.5, 7.0, 6.0, 6.5, 2.0, 4.0, 9.0, 8.0, 8.5, 1.0];
        for half_window in 1..values.len() {
            let flags = detect_extremes(&series(&values), half_window).unwrap();
            for (i, flag) in flags.iter().enumerate() {
                let lo = i.saturating_sub(half_window);
                let hi = (i + half_window + 1).min(values.len());
                let window = &values[lo..hi];
                if flag.is_local_minimum {
                    assert!(window.iter().all(|&v| values[i] <= v));
                }
                if flag.is_local_maximum {
                    assert!(window.iter().all(|&v| values[i] >= v));
                }
            }
        }
    }

    #[test]
    fn test_monotone_series_flags_only_endpoints() {
        for half_window in 1..6 {
            let values: Vec<f64> = (0..2 * half_window + 1).map(|i| i as f64).collect();
            let flags = detect_extremes(&series(&values), half_window).unwrap();
            let last = flags.len() - 1;
            for (i, f) in flags.iter().enumerate() {
                assert_eq!(f.is_local_minimum, i == 0, "H={half_window} i={i}");
                assert_eq!(f.is_local_maximum, i == last, "H={half_window} i={i}");
            }
        }
    }

    #[test]
    fn test_flat_series_flags_everything() {
        let flags = detect_extremes(&series(&[4.2; 6]), 2).unwrap();
        assert!(flags.iter().all(|f| f.is_local_minimum && f.is_local_maximum));
    }

    #[test]
    fn test_invalid_window() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(
            detect_extremes(&s, 3),
            Err(AnalysisError::InvalidWindow {
                len: 3,
                half_window: 3
            })
        );
        assert!(detect_extremes(&s, 10).is_err());
        assert!(detect_extremes(&s, 0).is_err());
    }

    #[test]
    fn test_windows_align_with_flags() {
        let (windows, flags) = detect_windowed(&series(&[10.0, 8.0, 12.0, 6.0, 14.0]), 1).unwrap();
        assert_eq!(windows.len(), flags.len());
        assert_eq!(windows[0], WindowExtrema { min: Some(8.0), max: Some(10.0) });
        assert_eq!(windows[3], WindowExtrema { min: Some(6.0), max: Some(14.0) });
        assert_eq!(windows[4], WindowExtrema { min: Some(6.0), max: Some(14.0) });
        assert!(detect_windowed(&series(&[1.0, 2.0]), 2).is_err());
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(detect_extremes(&TimeSeries::default(), 5), Ok(Vec::new()));
    }

    #[test]
    fn test_missing_values_not_flagged() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let points = vec![
            PricePoint::new(start, Some(3.0)),
            PricePoint::new(start + Days::new(1), None),
            PricePoint::new(start + Days::new(2), Some(1.0)),
            PricePoint::new(start + Days::new(3), Some(2.0)),
        ];
        let flags = detect_extremes(&TimeSeries::new(points).unwrap(), 1).unwrap();
        assert_eq!(flags[1], ExtremeFlag::default());
        assert_eq!(flags[0], flag(true, true));
        assert_eq!(flags[2], flag(true, false));
        assert_eq!(flags[3], flag(false, true));
    }
}
