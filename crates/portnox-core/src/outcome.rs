// ── Operation outcomes ──
//
// Non-fatal results handed back to the host alongside new state.

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Warning,
}

/// A message for the host to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Warning emitted when a tracked resource has disappeared remotely.
    pub fn resource_missing() -> Self {
        Self::warning(
            "Resource not found",
            "The resource is missing from the API and will be recreated on the next apply.",
        )
    }
}

/// Result of a read: fresh state, or the resource is gone and its
/// identity must be cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<S> {
    Found(S),
    Gone(Diagnostic),
}

impl<S> ReadOutcome<S> {
    pub fn found(self) -> Option<S> {
        match self {
            Self::Found(state) => Some(state),
            Self::Gone(_) => None,
        }
    }
}
