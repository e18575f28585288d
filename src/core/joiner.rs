//! Stream joiner: pairs grouped annotation rows with their document.
//!
//! Both streams must be sorted ascending by id, with all annotation rows for
//! a document contiguous. The joiner walks the document stream once; for each
//! document it consumes annotation rows while their id matches, keeps the
//! first non-matching row for a later document, and drops rows whose id is
//! already behind. Out-of-order input gives undefined pairings, not an error.

use std::io::{Read, Write};

use tracing::debug;

use super::reader::{AnnotationCursor, DocumentStream, InputError};
use super::stats::RunStats;
use crate::domain::{Diagnostic, Document, Severity};
use crate::spans::{validate, OverlapTracker};

/// Drives both streams to exhaustion, writing accepted spans to an output.
pub struct Joiner<T, A> {
    documents: DocumentStream<T>,
    annotations: AnnotationCursor<A>,
    tracker: OverlapTracker,
    stats: RunStats,
}

impl<T: Read, A: Read> Joiner<T, A> {
    pub fn new(text: T, annotations: A) -> Self {
        Self {
            documents: DocumentStream::new(text),
            annotations: AnnotationCursor::new(annotations),
            tracker: OverlapTracker::new(),
            stats: RunStats::default(),
        }
    }

    /// Run to the end of the document stream.
    ///
    /// Annotation rows left over after the last document are never read.
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<RunStats, InputError> {
        while let Some(doc) = self.documents.next_document()? {
            self.check_document(&doc, out)?;
        }
        Ok(self.stats)
    }

    fn check_document<W: Write>(&mut self, doc: &Document, out: &mut W) -> Result<(), InputError> {
        self.tracker.clear();
        self.stats.documents += 1;
        let (mut checked, mut accepted) = (0usize, 0usize);

        loop {
            let Some(next_id) = self.annotations.peek()?.map(|row| row.doc_id) else {
                break;
            };
            if next_id > doc.id() {
                debug!(doc_id = doc.id(), "retaining annotation row for {}", next_id);
                break;
            }
            let Some(row) = self.annotations.advance() else {
                break;
            };
            if next_id < doc.id() {
                debug!(doc_id = doc.id(), line = row.line, "dropping annotation row for {}", next_id);
                self.stats.dropped += 1;
                continue;
            }

            let (candidate, notes) = row.candidate().map_err(|e| {
                fatal_row(doc.id(), &e).emit();
                e
            })?;
            for note in &notes {
                note.emit();
            }
            let verdict = validate(doc, &candidate, &mut self.tracker);
            for diagnostic in &verdict.diagnostics {
                diagnostic.emit();
            }
            self.stats.record(&verdict);
            checked += 1;

            if let Some(span) = verdict.accepted() {
                span.write_record(out)?;
                accepted += 1;
            }
        }

        if let Some(summary) = document_summary(doc.id(), checked, accepted) {
            summary.emit();
        }
        Ok(())
    }
}

/// Info-level tally for a document that had annotations. Unmatched documents stay silent.
fn document_summary(doc_id: u64, checked: usize, accepted: usize) -> Option<Diagnostic> {
    (checked > 0).then(|| {
        Diagnostic::new(
            Severity::Info,
            doc_id,
            format!("checked {} annotations, accepted {}", checked, accepted),
        )
    })
}

/// Critical diagnostic for an annotation row that stops the run.
fn fatal_row(doc_id: u64, error: &InputError) -> Diagnostic {
    Diagnostic::new(Severity::Critical, doc_id, error.to_string())
}

/// Convenience wrapper: join `text` and `annotations`, writing to `out`.
pub fn check_streams<T: Read, A: Read, W: Write>(
    text: T,
    annotations: A,
    out: &mut W,
) -> Result<RunStats, InputError> {
    Joiner::new(text, annotations).run(out)
}
