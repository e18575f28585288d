//! Structured diagnostic events.
//!
//! The validation core never writes log lines itself. It returns
//! [`Diagnostic`] values and the caller decides where they go; [`Diagnostic::emit`]
//! forwards one to `tracing`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Section;

/// Severity of a diagnostic, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    /// Routine but worth reporting (duplicates, unparseable offsets)
    Notice,
    Warning,
    Critical,
}

/// One decision-point event about a document or annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub doc_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    pub cause: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, doc_id: u64, cause: impl Into<String>) -> Self {
        Self {
            severity,
            doc_id,
            section: None,
            start: None,
            end: None,
            cause: cause.into(),
        }
    }

    /// Attach the span the event is about.
    pub fn at(mut self, section: Section, start: Option<usize>, end: Option<usize>) -> Self {
        self.section = Some(section);
        self.start = start;
        self.end = end;
        self
    }

    /// Forward to the active `tracing` subscriber.
    pub fn emit(&self) {
        let section = self.section.map(|s| s.to_string());
        let section = section.as_deref().unwrap_or("-");
        let (doc_id, start, end) = (self.doc_id, self.start, self.end);
        match self.severity {
            Severity::Debug => {
                tracing::debug!(doc_id, section, ?start, ?end, "{}", self.cause)
            }
            Severity::Info | Severity::Notice => {
                tracing::info!(doc_id, section, ?start, ?end, "{}", self.cause)
            }
            Severity::Warning => {
                tracing::warn!(doc_id, section, ?start, ?end, "{}", self.cause)
            }
            Severity::Critical => {
                tracing::error!(doc_id, section, ?start, ?end, "{}", self.cause)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on {}", self.severity, self.doc_id)?;
        if let Some(section) = self.section {
            write!(f, " {}", section)?;
            if let (Some(start), Some(end)) = (self.start, self.end) {
                write!(f, " {}:{}", start, end)?;
            }
        }
        write!(f, ": {}", self.cause)
    }
}
