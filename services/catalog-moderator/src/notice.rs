//! Operator notices for every request outcome

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which request produced a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Apps,
    Stats,
    Action,
    Validation,
}

/// A message for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub feed: Feed,
    pub severity: Severity,
    pub message: String,
    pub timestamp_epoch_ms: u64,
    #[serde(skip)]
    pub seen: bool,
}

impl Notice {
    pub fn new(feed: Feed, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            feed,
            severity,
            message: message.into(),
            timestamp_epoch_ms: current_epoch_ms(),
            seen: false,
        }
    }

    pub fn info(feed: Feed, message: impl Into<String>) -> Self {
        Self::new(feed, Severity::Info, message)
    }

    pub fn warning(feed: Feed, message: impl Into<String>) -> Self {
        Self::new(feed, Severity::Warning, message)
    }

    pub fn error(feed: Feed, message: impl Into<String>) -> Self {
        Self::new(feed, Severity::Error, message)
    }

    /// Emit the notice through tracing at its severity
    pub fn log(&self) {
        match self.severity {
            Severity::Info => tracing::info!("[{:?}] {}", self.feed, self.message),
            Severity::Warning => tracing::warn!("[{:?}] {}", self.feed, self.message),
            Severity::Error => tracing::error!("[{:?}] {}", self.feed, self.message),
        }
    }
}

/// Decides which feeds reach the operator; the rest are only logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticePolicy {
    pub show_stats_failures: bool,
}

impl NoticePolicy {
    pub fn is_visible(&self, notice: &Notice) -> bool {
        match notice.feed {
            Feed::Stats => self.show_stats_failures,
            Feed::Apps | Feed::Action | Feed::Validation => true,
        }
    }
}

fn current_epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
