use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{PricePoint, TimeSeries};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("input file contains no valid rows")]
    Empty,

    #[error("column '{0}' not found in header {1:?}")]
    MissingColumn(String, StringRecord),

    #[error("unable to parse date '{0}'")]
    Date(String),

    #[error("failed to parse price '{value}' on {date}")]
    ParseNumber { date: NaiveDate, value: String },
}

/// Load a dated price column from a CSV file with a header row.
pub fn load_series_from_csv<P: AsRef<Path>>(path: P, price_column: &str) -> Result<TimeSeries> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    let series = read_series(file, price_column)?;
    info!(
        path = %path_ref.display(),
        rows = series.len(),
        column = price_column,
        "loaded price series"
    );
    Ok(series)
}

/// Parse CSV content from any reader. Rows are sorted ascending by date;
/// duplicate dates are rejected.
///
/// Commas inside prices are read as thousands separators and dropped, so
/// decimal-comma layouts (`3,5` meaning 3.5) are not supported.
pub fn read_series<R: Read>(reader: R, price_column: &str) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, "date")?;
    let price_idx = column_index(&headers, price_column)?;

    let mut points = Vec::new();
    let mut missing = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let date = parse_date(record.get(date_idx).unwrap_or_default())?;
        let value = parse_price(record.get(price_idx), date)?;
        if value.is_none() {
            missing += 1;
        }
        points.push(PricePoint::new(date, value));
    }

    if points.is_empty() {
        return Err(LoaderError::Empty.into());
    }
    if missing > 0 {
        warn!(missing, "price column has missing values");
    }

    points.sort_by_key(|point| point.date);
    let series = TimeSeries::new(points).context("input rows do not form a valid series")?;
    debug!(rows = series.len(), "parsed price rows");
    Ok(series)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| {
            header
                .trim_start_matches('\u{feff}')
                .trim_matches('"')
                .eq_ignore_ascii_case(name)
        })
        .ok_or_else(|| LoaderError::MissingColumn(name.to_string(), headers.clone()).into())
}

fn parse_price(value: Option<&str>, date: NaiveDate) -> Result<Option<f64>> {
    let raw = value.unwrap_or_default().trim();
    if is_missing(raw) {
        return Ok(None);
    }
    raw.replace(',', "")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| LoaderError::ParseNumber {
            date,
            value: raw.to_string(),
        })
        .map_err(anyhow::Error::from)
}

fn is_missing(value: &str) -> bool {
    value.is_empty()
        || value == "-"
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("n/a")
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let patterns = [
        "%b %d, %Y",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
    ];
    for pattern in &patterns {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Ok(date);
        }
    }

    let datetime_patterns = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for pattern in &datetime_patterns {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(datetime.date_naive());
    }

    Err(LoaderError::Date(trimmed.to_string()).into())
}
