//! Kiosk status messages
//!
//! Inline status text shown next to the mobile field. Severity maps to the
//! display color used by the frontend.

use serde::{Deserialize, Serialize};

/// Status message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Validation or transport failure (red)
    Error,
    /// Returning visitor found (green)
    Success,
    /// Informational, e.g. new visitor (blue)
    Info,
}

impl Severity {
    /// Display color for the frontend
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Error => "red",
            Severity::Success => "green",
            Severity::Info => "blue",
        }
    }
}

/// An inline status message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    /// Color hint, derived from severity
    pub color: &'static str,
}

impl StatusMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Success)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            color: severity.color(),
        }
    }
}
