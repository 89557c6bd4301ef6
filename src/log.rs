//! Internal logging for the Ember engine.
//!
//! - Customizable logger via the [`Logger`] trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe, routed through the global [`crate::engine::Engine`]
//! - File and line information on ERROR logs

use colored::*;
use std::fmt;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Implement this trait to redirect engine log output (file logging, network
/// logging, in-editor console, etc).
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// A single logged event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Source module (e.g., `"ember::scene::SceneGraph"`).
    pub source: String,
    pub message: String,
    /// Only set for [`LogSeverity::Error`], via [`engine_error!`].
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Log severity levels, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width three-letter tag used in the default console format.
    fn tag(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRC",
            LogSeverity::Debug => "DBG",
            LogSeverity::Info => "INF",
            LogSeverity::Warn => "WRN",
            LogSeverity::Error => "ERR",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Default logger: colored, single-line console output.
///
/// `HH:MM:SS.mmm TAG source :: message`, with a trailing
/// `  (file:line)` suffix on [`LogSeverity::Error`] entries.
pub struct DefaultLogger;

impl DefaultLogger {
    fn colorize_tag(severity: LogSeverity) -> ColoredString {
        let tag = severity.tag();
        match severity {
            LogSeverity::Trace => tag.bright_black(),
            LogSeverity::Debug => tag.cyan(),
            LogSeverity::Info => tag.green(),
            LogSeverity::Warn => tag.yellow().bold(),
            LogSeverity::Error => tag.on_red().white().bold(),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let local: DateTime<Local> = entry.timestamp.into();
        let clock = local.format("%H:%M:%S%.3f");
        let tag = Self::colorize_tag(entry.severity);
        let source = entry.source.bright_blue();

        let mut line = format!("{clock} {tag} {source} :: {}", entry.message);
        if let (Some(file), Some(no)) = (entry.file, entry.line) {
            line.push_str(&format!("  ({file}:{no})").dimmed().to_string());
        }
        println!("{line}");
    }
}

// ===== LOGGING MACROS =====
//
// `engine_trace!`/`engine_debug!`/`engine_info!`/`engine_warn!` all bottom
// out in this one non-exported dispatcher so the severity-to-call mapping
// lives in exactly one place; `engine_error!` stays separate since it's the
// only severity that also threads `file!()`/`line!()` through.
macro_rules! engine_log_at {
    ($severity:path, $source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log($severity, $source, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::engine_log_at!($crate::log::LogSeverity::Trace, $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::engine_log_at!($crate::log::LogSeverity::Debug, $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::engine_log_at!($crate::log::LogSeverity::Info, $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::engine_log_at!($crate::log::LogSeverity::Warn, $source, $($arg)*)
    };
}

/// Log an ERROR message with file:line information.
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log a fatal ERROR message and abort the process.
///
/// Used for every condition this engine treats as a programming-logic
/// failure (ref-count underflow, version overflow, unknown texture format
/// triple, ...): continuing risks corrupting GPU state, so halting after a
/// formatted diagnostic replaces unwinding.
#[macro_export]
macro_rules! engine_panic {
    ($source:expr, $($arg:tt)*) => {{
        $crate::engine_error!($source, $($arg)*);
        panic!($($arg)*)
    }};
}

/// Log a fatal ERROR message and abort, for contract/invariant violations
/// detected mid-function. Equivalent to [`engine_panic!`]; the separate name
/// mirrors the distinct call sites (early-return guard clauses vs. truly
/// unreachable states).
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_panic!($source, $($arg)*)
    };
}

/// Build (and log) a recoverable [`crate::error::EngineError`] without
/// aborting. Used only for the handful of conditions callers can reasonably
/// recover from (backend plugin lookup, lazy cache misses).
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::error::EngineError::InvalidResource(message)
    }};
}

pub(crate) use engine_log_at;

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
