use itertools::Itertools;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::data::{ExtremeSummary, TransitionKind, TransitionRecord};

/// Aggregate of all transitions sharing one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindStats {
    pub kind: TransitionKind,
    pub count: usize,
    pub mean_return: f64,
    /// Sample standard deviation; needs at least two transitions.
    pub std_return: Option<f64>,
    pub mean_days: f64,
    pub max_abs_return: f64,
}

/// Least-squares line `return_pct = slope * days_elapsed + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSummary {
    pub transitions: usize,
    pub gain: Option<KindStats>,
    pub loss: Option<KindStats>,
    pub line: Option<TrendLine>,
}

pub fn summarize_trend(summary: &[ExtremeSummary]) -> TrendSummary {
    let transitions: Vec<&TransitionRecord> = summary
        .iter()
        .filter_map(|row| row.transition.as_ref())
        .collect();
    let mut by_kind = transitions.iter().copied().into_group_map_by(|t| t.kind);

    TrendSummary {
        transitions: transitions.len(),
        gain: by_kind
            .remove(&TransitionKind::Gain)
            .map(|group| kind_stats(TransitionKind::Gain, &group)),
        loss: by_kind
            .remove(&TransitionKind::Loss)
            .map(|group| kind_stats(TransitionKind::Loss, &group)),
        line: fit_line(&transitions),
    }
}

fn kind_stats(kind: TransitionKind, group: &[&TransitionRecord]) -> KindStats {
    let returns: Vec<f64> = group.iter().map(|t| t.return_pct).collect();
    let days: Vec<f64> = group.iter().map(|t| t.days_elapsed as f64).collect();
    let std_return = if returns.len() >= 2 {
        Some(returns.iter().std_dev())
    } else {
        None
    };
    KindStats {
        kind,
        count: group.len(),
        mean_return: returns.iter().mean(),
        std_return,
        mean_days: days.iter().mean(),
        max_abs_return: returns.iter().abs_max(),
    }
}

fn fit_line(transitions: &[&TransitionRecord]) -> Option<TrendLine> {
    if transitions.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = transitions.iter().map(|t| t.days_elapsed as f64).collect();
    let ys: Vec<f64> = transitions.iter().map(|t| t.return_pct).collect();
    let x_mean = xs.iter().mean();
    let y_mean = ys.iter().mean();

    let (sxy, sxx) = xs
        .iter()
        .zip(&ys)
        .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });
    if sxx <= f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    Some(TrendLine {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
