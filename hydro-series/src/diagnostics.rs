//! Diagnostic sinks.
//!
//! Readers and the disaggregation core never open log files themselves.
//! They emit [`Diagnostic`]s into whatever sink the caller hands them.

use log::Level;
use serde::Serialize;
use std::fmt;

/// Which per-location log a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Missing or malformed daily data.
    Input,
    /// Peak insertion, skipping and verification.
    Peaks,
    /// Negative-flow correction progress.
    Correction,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Input => "input",
            Channel::Peaks => "peaks",
            Channel::Correction => "correction",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub channel: Channel,
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn info(channel: Channel, message: impl Into<String>) -> Self {
        Self {
            channel,
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warn(channel: Channel, message: impl Into<String>) -> Self {
        Self {
            channel,
            level: Level::Warn,
            message: message.into(),
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in memory.
impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log::log!(
            diagnostic.level,
            "[{}] {}",
            diagnostic.channel,
            diagnostic.message
        );
    }
}

/// Count the diagnostics on `channel` at `level`.
pub fn count(diagnostics: &[Diagnostic], channel: Channel, level: Level) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.channel == channel && d.level == level)
        .count()
}
