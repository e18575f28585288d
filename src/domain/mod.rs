//! Domain types for span checking.
//!
//! This module contains the core data structures:
//! - Document: a title/abstract pair with its offset tables
//! - SpanCandidate / Span: an annotation before and after validation
//! - Diagnostic: structured events raised at each decision point
//! - Record builders that turn split rows into the types above

pub mod diagnostic;
pub mod document;
pub mod record;
pub mod span;

// Re-export commonly used types
pub use diagnostic::{Diagnostic, Severity};
pub use document::{Document, DocumentBuilder, Section};
pub use record::RecordError;
pub use span::{Span, SpanCandidate, SpanCandidateBuilder};
