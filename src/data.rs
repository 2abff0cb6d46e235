use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AnalysisError;

/// Single dated observation. `value` is `None` when the source row had no price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Date-indexed price series, strictly ascending with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
}

impl TimeSeries {
    /// Build a series from points that are already sorted ascending by date.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AnalysisError> {
        for pair in points.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "duplicate date {}",
                    pair[1].date
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                )));
            }
        }
        if let Some(point) = points
            .iter()
            .find(|point| point.value.map_or(false, |value| !value.is_finite()))
        {
            return Err(AnalysisError::InvalidSeries(format!(
                "non-finite value on {}",
                point.date
            )));
        }
        Ok(Self { points })
    }

    #[cfg(test)]
    pub fn from_values(
        dates: impl IntoIterator<Item = NaiveDate>,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Self, AnalysisError> {
        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| PricePoint::new(date, Some(value)))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Sub-series restricted to `[start, end]`; either bound may be open.
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> TimeSeries {
        let points = self
            .points
            .iter()
            .filter(|point| start.map_or(true, |start| point.date >= start))
            .filter(|point| end.map_or(true, |end| point.date <= end))
            .copied()
            .collect();
        TimeSeries { points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExtremeKind {
    Minimum,
    Maximum,
}

impl ExtremeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtremeKind::Minimum => "minimum",
            ExtremeKind::Maximum => "maximum",
        }
    }
}

/// Per-observation result of the windowed comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtremeFlag {
    pub is_local_minimum: bool,
    pub is_local_maximum: bool,
}

impl ExtremeFlag {
    pub fn is_extreme(&self) -> bool {
        self.is_local_minimum || self.is_local_maximum
    }

    /// Both flags set: every value in the window is equal.
    pub fn is_flat(&self) -> bool {
        self.is_local_minimum && self.is_local_maximum
    }

    /// Kind of an unambiguous extreme; `None` for flat windows and unflagged points.
    pub fn kind(&self) -> Option<ExtremeKind> {
        match (self.is_local_minimum, self.is_local_maximum) {
            (true, false) => Some(ExtremeKind::Minimum),
            (false, true) => Some(ExtremeKind::Maximum),
            _ => None,
        }
    }
}

/// Retained extreme after filtering and duplicate handling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
    pub kind: ExtremeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransitionKind {
    Gain,
    Loss,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Gain => "gain",
            TransitionKind::Loss => "loss",
        }
    }
}

impl From<ExtremeKind> for TransitionKind {
    fn from(arrival: ExtremeKind) -> Self {
        match arrival {
            ExtremeKind::Maximum => TransitionKind::Gain,
            ExtremeKind::Minimum => TransitionKind::Loss,
        }
    }
}

/// Move from the previous retained extreme into the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRecord {
    pub date: NaiveDate,
    pub kind: TransitionKind,
    pub return_pct: f64,
    pub days_elapsed: i64,
}

/// One retained extreme with its incoming transition (absent for the first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeSummary {
    pub event: ExtremeEvent,
    pub transition: Option<TransitionRecord>,
}
