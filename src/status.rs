//! # Status Channel
//!
//! Human-readable progress and failure reports from the print service.
//!
//! Every event is emitted unfiltered. Deciding which severities matter
//! (log them, toast them, ignore them) is up to whoever listens.

use std::fmt;

/// How serious a status event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Informational,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Informational => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// One status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub message: String,
    pub severity: Severity,
}

impl StatusEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Informational,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receives status events.
pub trait StatusSink {
    fn status(&mut self, event: &StatusEvent);
}

impl<F> StatusSink for F
where
    F: FnMut(&StatusEvent),
{
    fn status(&mut self, event: &StatusEvent) {
        self(event)
    }
}

/// Forwards status events to the `log` facade at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn status(&mut self, event: &StatusEvent) {
        match event.severity {
            Severity::Informational => log::info!("{}", event.message),
            Severity::Warning => log::warn!("{}", event.message),
            Severity::Error => log::error!("{}", event.message),
        }
    }
}
