//! Per-location diagnostic log files.

use anyhow::Context;
use hydro_series::diagnostics::{Channel, Diagnostic, DiagnosticSink, LogSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes input diagnostics to `<location>_missing.log` and peak
/// diagnostics to `<location>_peaks.log`. Everything, correction progress
/// included, is also forwarded to the `log` facade.
pub struct FileSink {
    missing: BufWriter<File>,
    peaks: BufWriter<File>,
    missing_path: PathBuf,
    peaks_path: PathBuf,
    write_failed: bool,
}

impl FileSink {
    pub fn create(dir: &Path, location: &str) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let missing_path = dir.join(format!("{location}_missing.log"));
        let peaks_path = dir.join(format!("{location}_peaks.log"));
        let open = |path: &Path| {
            File::create(path)
                .map(BufWriter::new)
                .with_context(|| format!("creating {}", path.display()))
        };
        Ok(Self {
            missing: open(&missing_path)?,
            peaks: open(&peaks_path)?,
            missing_path,
            peaks_path,
            write_failed: false,
        })
    }

    pub fn missing_path(&self) -> &Path {
        &self.missing_path
    }

    pub fn peaks_path(&self) -> &Path {
        &self.peaks_path
    }

    /// Flush both files. Fails if any earlier write failed.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.missing.flush()?;
        self.peaks.flush()?;
        if self.write_failed {
            anyhow::bail!(
                "could not write all diagnostics to {} / {}",
                self.missing_path.display(),
                self.peaks_path.display()
            );
        }
        Ok(())
    }
}

impl DiagnosticSink for FileSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let file = match diagnostic.channel {
            Channel::Input => Some(&mut self.missing),
            Channel::Peaks => Some(&mut self.peaks),
            Channel::Correction => None,
        };
        if let Some(file) = file {
            if writeln!(file, "{}", diagnostic.message).is_err() {
                self.write_failed = true;
            }
        }
        LogSink.emit(diagnostic);
    }
}
