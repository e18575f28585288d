//! Core pipeline logic.
//!
//! This module contains:
//! - Reader: tab-delimited document and annotation streams
//! - Joiner: pairs annotation groups with their document and validates them
//! - Stats: per-run counters

pub mod joiner;
pub mod reader;
pub mod stats;

// Re-export commonly used types
pub use joiner::{check_streams, Joiner};
pub use reader::{AnnotationCursor, DocumentStream, InputError, PendingRow, Stream};
pub use stats::RunStats;
