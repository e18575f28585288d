//! Tab-delimited input streams.
//!
//! Both inputs are read as raw byte records, so text does not have to be
//! valid UTF-8. Row shape is checked by the record builders, not here.

use std::fmt;
use std::io::Read;

use csv::{ByteRecord, ReaderBuilder};
use thiserror::Error;

use crate::domain::record::parse_positive_id;
use crate::domain::{
    Diagnostic, Document, DocumentBuilder, RecordError, SpanCandidate, SpanCandidateBuilder,
};

/// Which input a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Text,
    Annotations,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Text => write!(f, "text"),
            Stream::Annotations => write!(f, "annotation"),
        }
    }
}

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("parsing {stream} rows: {source}")]
    Tokenizer {
        stream: Stream,
        #[source]
        source: csv::Error,
    },

    #[error("{stream} row at line {line}: {source}")]
    Record {
        stream: Stream,
        line: u64,
        #[source]
        source: RecordError,
    },

    #[error("writing output: {0}")]
    Output(#[from] std::io::Error),
}

impl InputError {
    fn tokenizer(stream: Stream) -> impl FnOnce(csv::Error) -> Self {
        move |source| InputError::Tokenizer { stream, source }
    }
}

fn tab_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

fn line_of(record: &ByteRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// The document stream: one [`Document`] per row.
pub struct DocumentStream<R> {
    reader: csv::Reader<R>,
    record: ByteRecord,
}

impl<R: Read> DocumentStream<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: tab_reader(input),
            record: ByteRecord::new(),
        }
    }

    /// Read the next document, or `None` at end of stream.
    pub fn next_document(&mut self) -> Result<Option<Document>, InputError> {
        let more = self
            .reader
            .read_byte_record(&mut self.record)
            .map_err(InputError::tokenizer(Stream::Text))?;
        if !more {
            return Ok(None);
        }
        DocumentBuilder::from_fields(self.record.iter())
            .map(Some)
            .map_err(|source| InputError::Record {
                stream: Stream::Text,
                line: line_of(&self.record),
                source,
            })
    }
}

/// An annotation row whose leading id has been read but not yet consumed.
#[derive(Debug, Clone)]
pub struct PendingRow {
    pub doc_id: u64,
    pub line: u64,
    record: ByteRecord,
}

impl PendingRow {
    /// Parse the whole row into a candidate.
    pub fn candidate(&self) -> Result<(SpanCandidate, Vec<Diagnostic>), InputError> {
        SpanCandidateBuilder::from_fields(self.record.iter()).map_err(|source| InputError::Record {
            stream: Stream::Annotations,
            line: self.line,
            source,
        })
    }
}

/// One-row lookahead over the annotation stream.
///
/// [`peek`](Self::peek) reads at most one row and keeps it until
/// [`advance`](Self::advance) takes it, so a row that belongs to a later
/// document stays put across document boundaries.
pub struct AnnotationCursor<R> {
    reader: csv::Reader<R>,
    pending: Option<PendingRow>,
    exhausted: bool,
}

impl<R: Read> AnnotationCursor<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: tab_reader(input),
            pending: None,
            exhausted: false,
        }
    }

    pub fn peek(&mut self) -> Result<Option<&PendingRow>, InputError> {
        if self.pending.is_none() && !self.exhausted {
            let mut record = ByteRecord::new();
            let more = self
                .reader
                .read_byte_record(&mut record)
                .map_err(InputError::tokenizer(Stream::Annotations))?;
            if more {
                let line = line_of(&record);
                let leading = record.get(0).unwrap_or_default();
                let doc_id = parse_positive_id(leading).ok_or_else(|| InputError::Record {
                    stream: Stream::Annotations,
                    line,
                    source: RecordError::InvalidAnnotationId {
                        value: String::from_utf8_lossy(leading).into_owned(),
                    },
                })?;
                self.pending = Some(PendingRow {
                    doc_id,
                    line,
                    record,
                });
            } else {
                self.exhausted = true;
            }
        }
        Ok(self.pending.as_ref())
    }

    /// Take the peeked row, if any.
    pub fn advance(&mut self) -> Option<PendingRow> {
        self.pending.take()
    }
}
