//! Span checking: offset indexing, overlap tracking and validation.
//!
//! # Design Decisions
//!
//! - **Exact match only**: a quote matches at its recorded offsets after
//!   trimming, or the annotation is rejected. No searching, no normalization.
//! - **Character offsets in, byte comparison out**: annotations count
//!   characters; [`OffsetTable`] maps them to bytes for the content check.
//! - **Rejections are data**: the validator returns a [`Verdict`] with its
//!   diagnostics; nothing here logs or fails the run.

pub mod offsets;
pub mod overlap;
pub mod validator;

pub use offsets::{char_count, is_space, trim_space, OffsetTable};
pub use overlap::{Collision, Overlap, OverlapTracker};
pub use validator::{validate, Outcome, Rejection, Verdict};
