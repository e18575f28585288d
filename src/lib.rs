//! spancheck - validates character-span annotations against their documents
//!
//! Input is a document stream (`id`, `title`, `abstract`) and an annotation
//! stream (`id`, `section`, `start`, `end`, `quote`, `class`), both
//! tab-delimited and sorted by id. Only annotations whose quote appears
//! verbatim at the recorded character offsets, and which do not overlap an
//! earlier accepted annotation, are written out.
//!
//! # Modules
//!
//! - `spans`: Offset indexing, overlap tracking and span validation
//! - `domain`: Data structures (Document, SpanCandidate, Span, Diagnostic)
//! - `core`: Input streams and the stream joiner
//! - `config`: Optional YAML configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! spancheck -v documents.tsv annotations.tsv > checked.tsv
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod spans;

// Re-export main types at crate root for convenience
pub use crate::core::{check_streams, InputError, Joiner, RunStats};
pub use domain::{Diagnostic, Document, Section, Severity, Span, SpanCandidate};
pub use spans::{validate, OffsetTable, OverlapTracker, Rejection, Verdict};
