//! Span validation: does an annotation really quote its document?
//!
//! A candidate is accepted only when, after trimming whitespace at its
//! boundaries, the quote has the same character length as the span, its bytes
//! match the text at the span's start, and the span does not collide with an
//! earlier accepted span in the same section.
//!
//! # Character vs. byte comparison
//!
//! The length check counts characters, while the content check walks
//! `quote.len()` *bytes* of text from the span's first byte. A quote with the
//! same number of characters as the span but a different byte length is
//! therefore compared against a byte window that does not line up with the
//! span's own byte range. This is the established behavior and is kept as is.

use super::offsets::{char_count, is_space};
use super::overlap::{Collision, Overlap, OverlapTracker};
use crate::domain::{Diagnostic, Document, Severity, Span, SpanCandidate};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `start` or `end` was not a non-negative integer
    InvalidOffsets,
    /// `start > end` or `end` beyond the section's character count
    OutOfBounds { char_count: usize },
    LengthMismatch { quote_len: usize, span_len: usize },
    /// First differing byte, relative to the span's first byte
    ByteMismatch {
        index: usize,
        expected: u8,
        found: Option<u8>,
    },
    Collision(Collision),
}

impl Rejection {
    /// Stable snake_case key, used for run statistics.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::InvalidOffsets => "invalid_offsets",
            Rejection::OutOfBounds { .. } => "out_of_bounds",
            Rejection::LengthMismatch { .. } => "length_mismatch",
            Rejection::ByteMismatch { .. } => "byte_mismatch",
            Rejection::Collision(c) => match c.kind {
                Overlap::Duplicate => "duplicate",
                Overlap::Head => "head_overlap",
                Overlap::Tail => "tail_overlap",
                Overlap::Body => "body_overlap",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(Span),
    Rejected(Rejection),
}

/// Result of validating one candidate.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Span bounds after trimming (unchanged if trimming never ran)
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted(_))
    }

    pub fn accepted(&self) -> Option<&Span> {
        match &self.outcome {
            Outcome::Accepted(span) => Some(span),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self.outcome {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Collects diagnostics for one candidate while its bounds move.
struct Trace<'a> {
    candidate: &'a SpanCandidate,
    start: Option<usize>,
    end: Option<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Trace<'a> {
    fn new(candidate: &'a SpanCandidate) -> Self {
        Self {
            candidate,
            start: candidate.start,
            end: candidate.end,
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, cause: String) {
        let c = self.candidate;
        self.diagnostics.push(
            Diagnostic::new(severity, c.doc_id, cause).at(c.section, self.start, self.end),
        );
    }

    fn reject(mut self, severity: Severity, rejection: Rejection, cause: String) -> Verdict {
        self.push(severity, cause);
        Verdict {
            outcome: Outcome::Rejected(rejection),
            start: self.start,
            end: self.end,
            diagnostics: self.diagnostics,
        }
    }
}

/// Validate `candidate` against `doc`, recording it in `tracker` if accepted.
pub fn validate(doc: &Document, candidate: &SpanCandidate, tracker: &mut OverlapTracker) -> Verdict {
    let mut trace = Trace::new(candidate);
    let quote = candidate.quote_lossy();
    let (text, offsets) = doc.section(candidate.section);

    trace.push(Severity::Debug, format!("checking '{}'", quote));

    let (Some(mut start), Some(mut end)) = (candidate.start, candidate.end) else {
        let cause = format!("'{}' has an invalid offset, length check failed", quote);
        return trace.reject(Severity::Warning, Rejection::InvalidOffsets, cause);
    };
    let chars = offsets.char_count();
    if offsets.byte_range(start, end).is_none() {
        let cause = format!("'{}' lies outside the {} characters of the text", quote, chars);
        return trace.reject(
            Severity::Warning,
            Rejection::OutOfBounds { char_count: chars },
            cause,
        );
    }

    // both loops index characters below `end <= chars`, so every offset is in range
    let table = offsets.as_slice();
    while start < end && is_space(text[table[start]]) {
        trace.push(
            Severity::Debug,
            format!("trimming leading whitespace at {} (byte {})", start, table[start]),
        );
        start += 1;
        trace.start = Some(start);
    }
    while end > start && is_space(text[table[end - 1]]) {
        trace.push(
            Severity::Debug,
            format!("trimming trailing whitespace at {} (byte {})", end - 1, table[end - 1]),
        );
        end -= 1;
        trace.end = Some(end);
    }

    let quote_len = char_count(&candidate.quote);
    let span_len = end - start;
    if quote_len != span_len {
        let cause = format!(
            "'{}' length {} != {} ('{}')",
            quote,
            quote_len,
            span_len,
            String::from_utf8_lossy(text)
        );
        return trace.reject(
            Severity::Warning,
            Rejection::LengthMismatch { quote_len, span_len },
            cause,
        );
    }

    let base = table[start];
    for (index, &expected) in candidate.quote.iter().enumerate() {
        let found = text.get(base + index).copied();
        if found != Some(expected) {
            let cause = format!(
                "'{}' mismatch at {} ({:#x} != {:#x})",
                quote,
                index,
                expected,
                found.unwrap_or(0)
            );
            return trace.reject(
                Severity::Warning,
                Rejection::ByteMismatch {
                    index,
                    expected,
                    found,
                },
                cause,
            );
        }
    }

    if let Some(collision) = tracker.find_collision(candidate.section, start, end) {
        let (severity, cause) = match collision.kind {
            Overlap::Duplicate => (Severity::Notice, format!("skipping duplicate of '{}'", quote)),
            kind => {
                let part = match kind {
                    Overlap::Head => "head",
                    Overlap::Tail => "tail",
                    _ => "body",
                };
                let cause = format!(
                    "{} of '{}' overlaps with {}:{}",
                    part, quote, collision.start, collision.end
                );
                (Severity::Warning, cause)
            }
        };
        return trace.reject(severity, Rejection::Collision(collision), cause);
    }

    tracker.record(candidate.section, start, end);
    Verdict {
        outcome: Outcome::Accepted(Span {
            doc_id: candidate.doc_id,
            section: candidate.section,
            start,
            end,
            quote: candidate.quote.clone(),
            class: candidate.class.clone(),
        }),
        start: Some(start),
        end: Some(end),
        diagnostics: trace.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;
    use proptest::prelude::*;

    fn doc() -> Document {
        Document::new(7, "The cat sat.", "A  short\tabstract. Ünïcode here.")
    }

    fn title(start: usize, end: usize, quote: &str) -> SpanCandidate {
        SpanCandidate::new(7, Section::Title, start, end, quote, "ANIMAL")
    }

    fn abstract_span(start: usize, end: usize, quote: &str) -> SpanCandidate {
        SpanCandidate::new(7, Section::Abstract, start, end, quote, "X")
    }

    #[test]
    fn test_exact_match_is_accepted() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &title(4, 7, "cat"), &mut tracker);
        let span = verdict.accepted().unwrap();
        assert_eq!((span.start, span.end), (4, 7));
        assert_eq!(span.quote, b"cat");
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut tracker = OverlapTracker::new();
        // "  short\t" spans characters 1..9 of the abstract
        let verdict = validate(&doc(), &abstract_span(1, 9, "short"), &mut tracker);
        let span = verdict.accepted().unwrap();
        assert_eq!((span.start, span.end), (3, 8));
        let trims = verdict
            .diagnostics
            .iter()
            .filter(|d| d.cause.starts_with("trimming"))
            .count();
        assert_eq!(trims, 3);
        assert!(verdict
            .diagnostics
            .iter()
            .all(|d| d.severity == Severity::Debug));
    }

    #[test]
    fn test_trim_is_idempotent() {
        let mut tracker = OverlapTracker::new();
        let first = validate(&doc(), &abstract_span(1, 9, "short"), &mut tracker);
        let (start, end) = (first.start.unwrap(), first.end.unwrap());

        let mut tracker = OverlapTracker::new();
        let second = validate(&doc(), &abstract_span(start, end, "short"), &mut tracker);
        assert_eq!((second.start, second.end), (Some(start), Some(end)));
        assert!(!second.diagnostics.iter().any(|d| d.cause.starts_with("trimming")));
    }

    #[test]
    fn test_all_whitespace_span_collapses() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &abstract_span(1, 3, ""), &mut tracker);
        assert_eq!((verdict.start, verdict.end), (Some(3), Some(3)));
        assert!(verdict.is_accepted());
    }

    #[test]
    fn test_length_mismatch() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &title(4, 9, "cat"), &mut tracker);
        assert_eq!(
            verdict.rejection(),
            Some(Rejection::LengthMismatch {
                quote_len: 3,
                span_len: 5
            })
        );
        assert_eq!(verdict.diagnostics.last().unwrap().severity, Severity::Warning);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_byte_mismatch() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &title(4, 7, "cot"), &mut tracker);
        assert_eq!(
            verdict.rejection(),
            Some(Rejection::ByteMismatch {
                index: 1,
                expected: b'o',
                found: Some(b'a')
            })
        );
    }

    #[test]
    fn test_multibyte_match() {
        let mut tracker = OverlapTracker::new();
        // "Ünïcode" starts at character 19 of the abstract
        let verdict = validate(&doc(), &abstract_span(19, 26, "Ünïcode"), &mut tracker);
        assert!(verdict.is_accepted(), "{:?}", verdict.diagnostics);
    }

    #[test]
    fn test_byte_window_follows_quote_length() {
        // same character count, different byte length: the quote's bytes are
        // compared from the span start and run past the span's own bytes
        let doc = Document::new(1, "ab cd", "");
        let mut tracker = OverlapTracker::new();
        let candidate = SpanCandidate::new(1, Section::Title, 0, 2, "aé", "X");
        let verdict = validate(&doc, &candidate, &mut tracker);
        assert_eq!(
            verdict.rejection(),
            Some(Rejection::ByteMismatch {
                index: 1,
                expected: 0xC3,
                found: Some(b'b')
            })
        );

        // the read may run off the end of the text; that is a mismatch too
        let doc = Document::new(1, b"xa\xC3".to_vec(), Vec::new());
        let candidate = SpanCandidate::new(1, Section::Title, 1, 3, "aé", "X");
        let verdict = validate(&doc, &candidate, &mut tracker);
        assert_eq!(
            verdict.rejection(),
            Some(Rejection::ByteMismatch {
                index: 2,
                expected: 0xA9,
                found: None
            })
        );
    }

    #[test]
    fn test_invalid_offsets_fail_length_check() {
        let mut tracker = OverlapTracker::new();
        let mut candidate = title(4, 7, "cat");
        candidate.start = None;
        let verdict = validate(&doc(), &candidate, &mut tracker);
        assert_eq!(verdict.rejection(), Some(Rejection::InvalidOffsets));
        assert_eq!(verdict.diagnostics.last().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &title(10, 400, "cat"), &mut tracker);
        assert_eq!(
            verdict.rejection(),
            Some(Rejection::OutOfBounds { char_count: 12 })
        );
        let verdict = validate(&doc(), &title(7, 4, "cat"), &mut tracker);
        assert!(matches!(verdict.rejection(), Some(Rejection::OutOfBounds { .. })));
    }

    #[test]
    fn test_duplicate_is_a_notice() {
        let mut tracker = OverlapTracker::new();
        assert!(validate(&doc(), &title(4, 7, "cat"), &mut tracker).is_accepted());
        let verdict = validate(&doc(), &title(4, 7, "cat"), &mut tracker);
        assert_eq!(verdict.rejection().map(|r| r.reason()), Some("duplicate"));
        assert_eq!(verdict.diagnostics.last().unwrap().severity, Severity::Notice);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_overlaps_either_way() {
        let mut tracker = OverlapTracker::new();
        assert!(validate(&doc(), &title(4, 7, "cat"), &mut tracker).is_accepted());

        // larger span covering the accepted one
        let verdict = validate(&doc(), &title(0, 11, "The cat sat"), &mut tracker);
        assert_eq!(verdict.rejection().map(|r| r.reason()), Some("head_overlap"));

        // smaller span inside the accepted one
        let verdict = validate(&doc(), &title(5, 6, "a"), &mut tracker);
        assert_eq!(verdict.rejection().map(|r| r.reason()), Some("body_overlap"));

        // clear of the accepted span
        assert!(validate(&doc(), &title(8, 11, "sat"), &mut tracker).is_accepted());
    }

    #[test]
    fn test_rejected_span_does_not_block() {
        let mut tracker = OverlapTracker::new();
        let verdict = validate(&doc(), &title(4, 7, "dog"), &mut tracker);
        assert!(!verdict.is_accepted());
        assert!(validate(&doc(), &title(4, 7, "cat"), &mut tracker).is_accepted());
    }

    #[test]
    fn test_sections_do_not_collide() {
        let doc = Document::new(3, "same text", "same text");
        let mut tracker = OverlapTracker::new();
        let t = SpanCandidate::new(3, Section::Title, 0, 4, "same", "X");
        let a = SpanCandidate::new(3, Section::Abstract, 0, 4, "same", "X");
        assert!(validate(&doc, &t, &mut tracker).is_accepted());
        assert!(validate(&doc, &a, &mut tracker).is_accepted());
    }

    proptest! {
        #[test]
        fn prop_quoting_the_text_is_accepted(text in "[a-zé€ ]{1,40}", a in 0usize..40, b in 0usize..40) {
            let chars: Vec<char> = text.chars().collect();
            let (a, b) = (a % (chars.len() + 1), b % (chars.len() + 1));
            let (start, end) = (a.min(b), a.max(b));
            let quote: String = chars[start..end].iter().collect();
            let trimmed = quote.trim_matches(' ');

            let doc = Document::new(1, text.as_str(), "");
            let mut tracker = OverlapTracker::new();
            let candidate = SpanCandidate::new(1, Section::Title, start, end, trimmed, "X");
            let verdict = validate(&doc, &candidate, &mut tracker);
            prop_assert!(verdict.is_accepted(), "{:?}", verdict.diagnostics);
        }
    }
}
