//! Log severity and the level-by-outcome heuristic.
//!
//! # Responsibilities
//! - Name the severities a record can carry
//! - Parse configured level strings
//! - Pick a level from a response status and error presence
//!
//! # Design Decisions
//! - Error presence outranks the status code
//! - Redirects and successes share `info`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity attached to every emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a level string names no known severity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Level for a finished request.
///
/// Evaluated in fixed precedence: an error or a 5xx status is `error`,
/// 4xx is `warn`, everything else is `info`.
pub fn level_for_outcome(status_code: u16, error_present: bool) -> LogLevel {
    if error_present || status_code >= 500 {
        return LogLevel::Error;
    }
    match status_code {
        400..=499 => LogLevel::Warn,
        300..=399 => LogLevel::Info,
        _ => LogLevel::Info,
    }
}
