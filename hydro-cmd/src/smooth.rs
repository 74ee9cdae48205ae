//! The `smooth` command: daily file in, hourly file out.

use crate::sink::FileSink;
use crate::OutputFormat;
use anyhow::Context;
use hydro_data::config::SplineConfig;
use hydro_data::pipeline::{disaggregate, RunReport};
use hydro_data::spline::SplineMethod;
use hydro_db::Database;
use hydro_series::daily::DailySeries;
use hydro_series::output::{format_dss_text, write_csv, TimeSeriesRecord};
use hydro_series::peak::PeakSeries;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything `smooth` needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    pub daily: PathBuf,
    pub peaks: Option<PathBuf>,
    pub output: PathBuf,
    pub location: Option<String>,
    pub format: OutputFormat,
    pub method: Option<SplineMethod>,
    pub max_iterations: Option<usize>,
    pub config: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub db_path: Option<String>,
    pub day_offset: i64,
}

/// Config file (if any) with command-line overrides applied.
pub fn load_config(
    path: Option<&Path>,
    method: Option<SplineMethod>,
    max_iterations: Option<usize>,
) -> anyhow::Result<SplineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SplineConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SplineConfig::default(),
    };
    if let Some(method) = method {
        config.method = method;
    }
    if let Some(max_iterations) = max_iterations {
        config.max_iterations = max_iterations;
    }
    Ok(config)
}

/// Location name used in diagnostics and log file names: the flag, or the
/// daily file's stem.
fn location_name(options: &SmoothOptions) -> String {
    options.location.clone().unwrap_or_else(|| {
        options
            .daily
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "series".to_string())
    })
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn run_smooth(options: &SmoothOptions) -> anyhow::Result<RunReport> {
    let started = Instant::now();
    let config = load_config(
        options.config.as_deref(),
        options.method,
        options.max_iterations,
    )?;
    let location = location_name(options);
    let log_dir = match &options.log_dir {
        Some(dir) => dir.clone(),
        None => options
            .output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let mut sink = FileSink::create(&log_dir, &location)?;

    info!(
        "Smoothing {} ({}) with {} spline",
        location,
        options.daily.display(),
        config.method
    );
    let daily = DailySeries::parse(&read(&options.daily)?, &location, &mut sink)
        .with_context(|| format!("parsing daily file {}", options.daily.display()))?;

    let peaks = match &options.peaks {
        Some(path) => {
            let source_name = path.display().to_string();
            let series = PeakSeries::parse(&read(path)?, &source_name, &mut sink)
                .with_context(|| format!("parsing peaks file {}", path.display()))?;
            Some(series.peaks)
        }
        None => None,
    };

    let result = disaggregate(&daily.values, peaks.as_deref(), &config, &mut sink)
        .with_context(|| format!("disaggregating {location}"))?;

    let dss_text = format_dss_text(&daily.header, &result.hydrograph);
    match options.format {
        OutputFormat::Dss => std::fs::write(&options.output, &dss_text)
            .with_context(|| format!("writing {}", options.output.display()))?,
        OutputFormat::Csv => {
            let file = File::create(&options.output)
                .with_context(|| format!("creating {}", options.output.display()))?;
            write_csv(BufWriter::new(file), &result.hydrograph)?;
        }
    }
    info!(
        "Wrote {} hourly values to {}",
        result.hydrograph.output_flows().len(),
        options.output.display()
    );

    if let Some(db_file) = &options.db {
        let mut record = TimeSeriesRecord::from_dss_text(&dss_text)?.offset_days(options.day_offset);
        if let Some(pathname) = &options.db_path {
            record.pathname = pathname.clone();
        }
        Database::open(db_file)?.put_series(&record)?;
    }

    sink.finish()?;

    let report = RunReport::new(&location, &config, &result, started.elapsed());
    if let Some(path) = &options.report {
        let file =
            File::create(path).with_context(|| format!("creating report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
    }
    info!(
        "{}: {} days, {} correction passes, {} peaks applied",
        report.location, report.days, report.iterations, report.peaks_applied
    );
    Ok(report)
}
