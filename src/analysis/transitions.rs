use tracing::debug;

use crate::config::DuplicatePolicy;
use crate::data::{
    ExtremeEvent, ExtremeFlag, ExtremeKind, ExtremeSummary, PricePoint, TimeSeries,
    TransitionKind, TransitionRecord,
};
use crate::error::AnalysisError;

/// Reduce flagged observations to a sequence of extremes and attach the return
/// and calendar-day gap from each extreme to the one before it.
pub fn summarize_transitions(
    series: &TimeSeries,
    flags: &[ExtremeFlag],
    policy: DuplicatePolicy,
) -> Result<Vec<ExtremeSummary>, AnalysisError> {
    if flags.len() != series.len() {
        return Err(AnalysisError::InvalidSeries(format!(
            "{} flags supplied for {} observations",
            flags.len(),
            series.len()
        )));
    }

    let flagged = collect_extremes(series, flags);
    let flagged_count = flagged.len();
    let events = match policy {
        DuplicatePolicy::FirstOccurrence => collapse_runs(flagged),
        DuplicatePolicy::KeepAll => flagged,
    };
    debug!(
        flagged = flagged_count,
        retained = events.len(),
        ?policy,
        "retained extremes"
    );

    let mut summary = Vec::with_capacity(events.len());
    let mut previous: Option<&ExtremeEvent> = None;
    for event in &events {
        let transition = match previous {
            Some(prev) => Some(transition_between(prev, event)?),
            None => None,
        };
        summary.push(ExtremeSummary {
            event: event.clone(),
            transition,
        });
        previous = Some(event);
    }
    Ok(summary)
}

/// Flagged observations in series order, tagged with their kind.
///
/// A flat window flags a point as both minimum and maximum. Such a point joins
/// the run of the extreme before it; a leading flat stretch takes the kind of
/// the first unambiguous extreme, and a series with no unambiguous extreme at
/// all is treated as maxima.
pub fn collect_extremes(series: &TimeSeries, flags: &[ExtremeFlag]) -> Vec<ExtremeEvent> {
    let flagged: Vec<(usize, &PricePoint, f64, Option<ExtremeKind>)> = series
        .points()
        .iter()
        .zip(flags)
        .enumerate()
        .filter(|(_, (_, flag))| flag.is_extreme())
        .filter_map(|(index, (point, flag))| Some((index, point, point.value?, flag.kind())))
        .collect();

    let mut carried = flagged
        .iter()
        .find_map(|&(_, _, _, kind)| kind)
        .unwrap_or(ExtremeKind::Maximum);
    flagged
        .into_iter()
        .map(|(index, point, value, kind)| {
            let kind = kind.unwrap_or(carried);
            carried = kind;
            ExtremeEvent {
                index,
                date: point.date,
                value,
                kind,
            }
        })
        .collect()
}

/// Keep the first extreme of every run of consecutive same-kind extremes.
pub fn collapse_runs(mut events: Vec<ExtremeEvent>) -> Vec<ExtremeEvent> {
    events.dedup_by_key(|event| event.kind);
    events
}

fn transition_between(
    previous: &ExtremeEvent,
    current: &ExtremeEvent,
) -> Result<TransitionRecord, AnalysisError> {
    if previous.value == 0.0 || !previous.value.is_finite() {
        return Err(AnalysisError::DegenerateReturn {
            date: previous.date,
            value: previous.value,
        });
    }
    Ok(TransitionRecord {
        date: current.date,
        kind: TransitionKind::from(current.kind),
        return_pct: current.value / previous.value - 1.0,
        days_elapsed: (current.date - previous.date).num_days(),
    })
}
