use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::analysis::trend::{KindStats, TrendSummary};
use crate::analysis::window::WindowExtrema;
use crate::config::AnalysisParams;
use crate::data::{ExtremeFlag, ExtremeSummary, TimeSeries};

#[derive(Tabled)]
struct ExtremeRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Extreme")]
    kind: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Move")]
    transition: &'static str,
    #[tabled(rename = "Return")]
    return_pct: String,
    #[tabled(rename = "Days")]
    days: String,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Move")]
    kind: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Mean Return")]
    mean_return: String,
    #[tabled(rename = "Std Dev")]
    std_return: String,
    #[tabled(rename = "Mean Days")]
    mean_days: String,
    #[tabled(rename = "Max |Return|")]
    max_abs_return: String,
}

/// Flat CSV record for one retained extreme.
#[derive(Debug, Serialize)]
struct SummaryRecord {
    date: NaiveDate,
    value: f64,
    kind: &'static str,
    transition: Option<&'static str>,
    return_pct: Option<f64>,
    days_elapsed: Option<i64>,
}

/// Per-observation record for marking extremes on a price chart.
#[derive(Debug, Serialize)]
struct FlagRecord {
    date: NaiveDate,
    value: Option<f64>,
    window_min: Option<f64>,
    window_max: Option<f64>,
    is_local_minimum: bool,
    is_local_maximum: bool,
}

impl From<&ExtremeSummary> for SummaryRecord {
    fn from(row: &ExtremeSummary) -> Self {
        Self {
            date: row.event.date,
            value: row.event.value,
            kind: row.event.kind.as_str(),
            transition: row.transition.as_ref().map(|t| t.kind.as_str()),
            return_pct: row.transition.as_ref().map(|t| t.return_pct),
            days_elapsed: row.transition.as_ref().map(|t| t.days_elapsed),
        }
    }
}

pub fn print_report(
    series: &TimeSeries,
    params: &AnalysisParams,
    summary: &[ExtremeSummary],
    trend: &TrendSummary,
) {
    println!("\n=== Local Extreme Momentum ===\n");
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!(
            "Observations: {} ({} to {})",
            series.len(),
            first.date,
            last.date
        );
    }
    println!(
        "Half-window: {} | Duplicates: {:?}",
        params.half_window, params.duplicate_policy
    );

    if summary.is_empty() {
        println!("No local extremes identified.");
        return;
    }

    let rows: Vec<ExtremeRow> = summary.iter().map(extreme_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");

    if trend.transitions == 0 {
        println!("Only one extreme retained; no transitions to summarise.");
        return;
    }

    let stats: Vec<StatsRow> = [&trend.gain, &trend.loss]
        .into_iter()
        .flatten()
        .map(stats_row)
        .collect();
    let mut table = Table::new(stats);
    table.with(Style::rounded());
    println!("{table}\n");

    match trend.line {
        Some(line) => println!(
            "Trend: return = {:.6} * days {} {:.6}",
            line.slope,
            if line.intercept < 0.0 { "-" } else { "+" },
            line.intercept.abs()
        ),
        None => println!("Trend: not enough spread in elapsed days to fit a line"),
    }
}

fn extreme_row(row: &ExtremeSummary) -> ExtremeRow {
    let (transition, return_pct, days) = match &row.transition {
        Some(t) => (
            t.kind.as_str(),
            format!("{:+.2}%", t.return_pct * 100.0),
            t.days_elapsed.to_string(),
        ),
        None => ("-", "-".to_string(), "-".to_string()),
    };
    ExtremeRow {
        date: row.event.date.format("%Y-%m-%d").to_string(),
        kind: row.event.kind.as_str(),
        price: format!("{:.2}", row.event.value),
        transition,
        return_pct,
        days,
    }
}

fn stats_row(stats: &KindStats) -> StatsRow {
    StatsRow {
        kind: stats.kind.as_str(),
        count: stats.count,
        mean_return: format!("{:+.2}%", stats.mean_return * 100.0),
        std_return: stats
            .std_return
            .map(|std| format!("{:.2}%", std * 100.0))
            .unwrap_or_else(|| "-".to_string()),
        mean_days: format!("{:.1}", stats.mean_days),
        max_abs_return: format!("{:.2}%", stats.max_abs_return * 100.0),
    }
}

/// Write the extreme summary as CSV; transition columns are empty on the first row.
pub fn write_summary_csv<P: AsRef<Path>>(path: P, summary: &[ExtremeSummary]) -> Result<()> {
    let path_ref = path.as_ref();
    let mut writer = csv::Writer::from_path(path_ref)
        .with_context(|| format!("failed to create {:?}", path_ref))?;
    for row in summary {
        writer.serialize(SummaryRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one row per observation with its window extrema and flags.
pub fn write_flags_csv<P: AsRef<Path>>(
    path: P,
    series: &TimeSeries,
    windows: &[WindowExtrema],
    flags: &[ExtremeFlag],
) -> Result<()> {
    if windows.len() != series.len() || flags.len() != series.len() {
        bail!(
            "flag output expects {} rows, got {} windows and {} flags",
            series.len(),
            windows.len(),
            flags.len()
        );
    }
    let path_ref = path.as_ref();
    let mut writer = csv::Writer::from_path(path_ref)
        .with_context(|| format!("failed to create {:?}", path_ref))?;
    for ((point, window), flag) in series.points().iter().zip(windows).zip(flags) {
        writer.serialize(FlagRecord {
            date: point.date,
            value: point.value,
            window_min: window.min,
            window_max: window.max,
            is_local_minimum: flag.is_local_minimum,
            is_local_maximum: flag.is_local_maximum,
        })?;
    }
    writer.flush()?;
    Ok(())
}
