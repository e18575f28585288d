//! Field-level parsing shared by the record builders.

use thiserror::Error;

use crate::spans::trim_space;

/// A row whose shape or key fields cannot be interpreted.
///
/// These are precondition violations on the input, not per-annotation
/// rejections: the run stops when one is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("could not parse id '{value}'")]
    InvalidDocumentId { value: String },

    #[error("could not parse annotation id '{value}'")]
    InvalidAnnotationId { value: String },

    #[error("illegal section '{value}' for {doc_id}")]
    InvalidSection { doc_id: u64, value: String },

    #[error("unknown field value '{value}'")]
    UnexpectedField { value: String },

    #[error("missing {field} field")]
    MissingField { field: &'static str },
}

/// Parse a whitespace-padded decimal id that must be greater than zero.
pub fn parse_positive_id(field: &[u8]) -> Option<u64> {
    let text = std::str::from_utf8(trim_space(field)).ok()?;
    match text.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

/// Parse a whitespace-padded character offset. `None` marks an invalid field.
pub fn parse_offset(field: &[u8]) -> Option<usize> {
    std::str::from_utf8(trim_space(field)).ok()?.parse::<usize>().ok()
}
