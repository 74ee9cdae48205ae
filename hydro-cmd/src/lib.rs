//! Command implementations for the hydrograph smoothing CLI.
//!
//! Provides subcommands for turning daily flow files into hourly
//! hydrographs and for keeping finished hydrographs in a SQLite store.

use clap::{Subcommand, ValueEnum};
use hydro_data::spline::SplineMethod;
use std::path::PathBuf;

pub mod sink;
pub mod smooth;
pub mod store;

/// Layout of the hourly output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// DSS text, ready for DSS import
    #[default]
    Dss,
    /// `timestamp,flow_cfs` rows
    Csv,
}

#[derive(Subcommand)]
pub enum Command {
    /// Disaggregate a daily flow file into an hourly hydrograph
    Smooth {
        /// Daily flow file (DSS text export)
        #[arg(short = 'd', long)]
        daily: PathBuf,

        /// Known peaks file for the same location
        #[arg(short = 'p', long)]
        peaks: Option<PathBuf>,

        /// Output path for the hourly series
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Location name for diagnostics and log files (default: daily file stem)
        #[arg(short = 'l', long)]
        location: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Dss)]
        format: OutputFormat,

        /// Spline method: cubic or pchip (overrides the config file)
        #[arg(short = 'm', long)]
        method: Option<SplineMethod>,

        /// Correction iteration cap (overrides the config file)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// JSON spline configuration
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Directory for <location>_missing.log and <location>_peaks.log
        /// (default: the output file's directory)
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also store the result in this SQLite file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Pathname to store the result under (default: the output pathname)
        #[arg(long, requires = "db")]
        db_path: Option<String>,

        /// Shift the stored series by whole days
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, requires = "db")]
        day_offset: i64,
    },

    /// Store an hourly output file (DSS text or CSV) in a SQLite file
    Import {
        #[arg(short = 'i', long)]
        input: PathBuf,

        #[arg(long)]
        db: PathBuf,

        /// Pathname override; required for CSV input
        #[arg(long)]
        path: Option<String>,

        /// Shift the series by whole days
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        day_offset: i64,
    },

    /// List the series held in a SQLite file
    Catalog {
        #[arg(long)]
        db: PathBuf,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Smooth {
            daily,
            peaks,
            output,
            location,
            format,
            method,
            max_iterations,
            config,
            log_dir,
            report,
            db,
            db_path,
            day_offset,
        } => {
            let options = smooth::SmoothOptions {
                daily,
                peaks,
                output,
                location,
                format,
                method,
                max_iterations,
                config,
                log_dir,
                report,
                db,
                db_path,
                day_offset,
            };
            let report = smooth::run_smooth(&options)?;
            if !report.converged {
                log::warn!(
                    "{}: negative flows remained after {} iterations and were clamped",
                    report.location,
                    report.iterations
                );
            }
            Ok(())
        }
        Command::Import {
            input,
            db,
            path,
            day_offset,
        } => store::run_import(&input, &db, path.as_deref(), day_offset).map(|_| ()),
        Command::Catalog { db } => store::run_catalog(&db).map(|_| ()),
    }
}
