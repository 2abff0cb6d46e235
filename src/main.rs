mod analysis;
mod config;
mod data;
mod error;
mod loader;
mod output;

use std::path::Path;

use analysis::{analyze, summarize_trend, ExtremeAnalysis};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use loader::load_series_from_csv;
use output::{print_report, write_flags_csv, write_summary_csv};

fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::parse();
    run(&config)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(config: &AppConfig) -> Result<()> {
    let input_path = &config.input_path;
    if !Path::new(input_path).exists() {
        bail!("input file {:?} does not exist", input_path);
    }

    let full_series = load_series_from_csv(input_path, &config.price_column)
        .with_context(|| format!("failed to load input data from {:?}", input_path))?;

    let series = full_series.between(config.start_date, config.end_date);
    if series.is_empty() {
        bail!("no observations remain after applying the date range");
    }
    if series.len() != full_series.len() {
        info!(
            kept = series.len(),
            dropped = full_series.len() - series.len(),
            "applied date range"
        );
    }

    let params = config.analysis_params();
    let ExtremeAnalysis {
        windows,
        flags,
        summary,
    } = analyze(&series, &params).context("local extreme analysis failed")?;
    info!(
        minima = flags.iter().filter(|f| f.is_local_minimum).count(),
        maxima = flags.iter().filter(|f| f.is_local_maximum).count(),
        retained = summary.len(),
        "detected local extremes"
    );

    let trend = summarize_trend(&summary);
    print_report(&series, &params, &summary, &trend);

    if let Some(output_path) = &config.output_path {
        write_summary_csv(output_path, &summary)
            .with_context(|| format!("failed to write summary to {:?}", output_path))?;
        info!(path = %output_path.display(), rows = summary.len(), "wrote extreme summary");
    }

    if let Some(flags_path) = &config.flags_output_path {
        write_flags_csv(flags_path, &series, &windows, &flags)
            .with_context(|| format!("failed to write flags to {:?}", flags_path))?;
        info!(path = %flags_path.display(), rows = flags.len(), "wrote extreme flags");
    }

    Ok(())
}
