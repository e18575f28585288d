//! Annotation spans: parsed candidates and accepted output records.

use std::io::{self, Write};

use super::record::{parse_offset, parse_positive_id, RecordError};
use super::{Diagnostic, Section, Severity};
use crate::spans::trim_space;

/// One parsed annotation row, not yet validated.
///
/// `start`/`end` are `None` when the source field was not a non-negative
/// integer. Validation always rejects such a candidate at the length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanCandidate {
    pub doc_id: u64,
    pub section: Section,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub quote: Vec<u8>,
    pub class: Vec<u8>,
}

impl SpanCandidate {
    pub fn new(
        doc_id: u64,
        section: Section,
        start: usize,
        end: usize,
        quote: impl Into<Vec<u8>>,
        class: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            doc_id,
            section,
            start: Some(start),
            end: Some(end),
            quote: quote.into(),
            class: class.into(),
        }
    }

    /// Quote for log messages.
    pub fn quote_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.quote)
    }
}

/// A validated annotation, with its span already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub doc_id: u64,
    pub section: Section,
    pub start: usize,
    pub end: usize,
    pub quote: Vec<u8>,
    pub class: Vec<u8>,
}

impl Span {
    /// Write the tab-delimited output record, newline included.
    pub fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "{}\t{}\t{}\t{}\t",
            self.doc_id, self.section, self.start, self.end
        )?;
        out.write_all(&self.quote)?;
        out.write_all(b"\t")?;
        out.write_all(&self.class)?;
        out.write_all(b"\n")
    }
}

/// Incremental builder fed one field at a time:
/// `id`, `section`, `start`, `end`, `quote`, `class`.
#[derive(Debug, Default)]
pub struct SpanCandidateBuilder {
    doc_id: Option<u64>,
    section: Option<Section>,
    start: Option<Option<usize>>,
    end: Option<Option<usize>>,
    quote: Option<Vec<u8>>,
    class: Option<Vec<u8>>,
    diagnostics: Vec<Diagnostic>,
}

impl SpanCandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, field: &[u8]) -> Result<(), RecordError> {
        let Some(doc_id) = self.doc_id else {
            let id = parse_positive_id(field).ok_or_else(|| RecordError::InvalidAnnotationId {
                value: String::from_utf8_lossy(field).into_owned(),
            })?;
            self.doc_id = Some(id);
            return Ok(());
        };

        if self.section.is_none() {
            let section = Section::from_tag(field).ok_or_else(|| {
                RecordError::InvalidSection {
                    doc_id,
                    value: String::from_utf8_lossy(field).into_owned(),
                }
            })?;
            self.section = Some(section);
        } else if self.start.is_none() {
            self.start = Some(self.offset(doc_id, "start", field));
        } else if self.end.is_none() {
            self.end = Some(self.offset(doc_id, "end", field));
        } else if self.quote.is_none() {
            self.quote = Some(trim_space(field).to_vec());
        } else if self.class.is_none() {
            self.class = Some(trim_space(field).to_vec());
        } else {
            return Err(RecordError::UnexpectedField {
                value: String::from_utf8_lossy(field).into_owned(),
            });
        }
        Ok(())
    }

    fn offset(&mut self, doc_id: u64, name: &str, field: &[u8]) -> Option<usize> {
        let offset = parse_offset(field);
        if offset.is_none() {
            self.diagnostics.push(Diagnostic::new(
                Severity::Notice,
                doc_id,
                format!("{} '{}' invalid", name, String::from_utf8_lossy(field)),
            ));
        }
        offset
    }

    /// Finalize into a candidate plus any diagnostics raised while parsing.
    pub fn finish(self) -> Result<(SpanCandidate, Vec<Diagnostic>), RecordError> {
        let candidate = SpanCandidate {
            doc_id: self.doc_id.ok_or(RecordError::MissingField { field: "id" })?,
            section: self.section.ok_or(RecordError::MissingField { field: "section" })?,
            start: self.start.ok_or(RecordError::MissingField { field: "start" })?,
            end: self.end.ok_or(RecordError::MissingField { field: "end" })?,
            quote: self.quote.ok_or(RecordError::MissingField { field: "quote" })?,
            class: self.class.ok_or(RecordError::MissingField { field: "class" })?,
        };
        let diagnostics = self
            .diagnostics
            .into_iter()
            .map(|d| d.at(candidate.section, candidate.start, candidate.end))
            .collect();
        Ok((candidate, diagnostics))
    }

    /// Build a candidate from an already-split row.
    pub fn from_fields<'a, I>(fields: I) -> Result<(SpanCandidate, Vec<Diagnostic>), RecordError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut builder = Self::new();
        for field in fields {
            builder.push_field(field)?;
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(row: &str) -> Result<(SpanCandidate, Vec<Diagnostic>), RecordError> {
        SpanCandidateBuilder::from_fields(row.split('\t').map(str::as_bytes))
    }

    #[test]
    fn test_parse_annotation_row() {
        let (candidate, notes) = parse("7\tT\t4\t7\t cat \tANIMAL\n").unwrap();
        assert_eq!(candidate, SpanCandidate::new(7, Section::Title, 4, 7, "cat", "ANIMAL"));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_invalid_offsets_become_sentinels() {
        let (candidate, notes) = parse("7\tA\tabc\t00x\tcat\tX").unwrap();
        assert_eq!(candidate.start, None);
        assert_eq!(candidate.end, None);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].severity, Severity::Notice);
        assert_eq!(notes[0].cause, "start 'abc' invalid");
        assert_eq!(notes[1].section, Some(Section::Abstract));
    }

    #[test]
    fn test_zero_offset_is_valid() {
        let (candidate, notes) = parse("7\tT\t0\t3\tThe\tX").unwrap();
        assert_eq!(candidate.start, Some(0));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_illegal_section_is_fatal() {
        assert!(matches!(
            parse("7\tX\t0\t3\tThe\tX"),
            Err(RecordError::InvalidSection { doc_id: 7, .. })
        ));
        assert!(matches!(
            parse("7\tTitle\t0\t3\tThe\tX"),
            Err(RecordError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_padded_section_is_fatal() {
        match parse("7\t T \t0\t3\tThe\tX") {
            Err(RecordError::InvalidSection { doc_id, value }) => {
                assert_eq!(doc_id, 7);
                assert_eq!(value, " T ");
            }
            other => panic!("expected InvalidSection, got {:?}", other),
        }
    }

    #[test]
    fn test_row_shape_is_enforced() {
        assert!(matches!(
            parse("7\tT\t0\t3\tThe\tX\textra"),
            Err(RecordError::UnexpectedField { .. })
        ));
        assert!(matches!(
            parse("7\tT\t0\t3\tThe"),
            Err(RecordError::MissingField { field: "class" })
        ));
    }

    #[test]
    fn test_write_record() {
        let span = Span {
            doc_id: 7,
            section: Section::Title,
            start: 4,
            end: 7,
            quote: b"cat".to_vec(),
            class: b"ANIMAL".to_vec(),
        };
        let mut out = Vec::new();
        span.write_record(&mut out).unwrap();
        assert_eq!(out, b"7\tT\t4\t7\tcat\tANIMAL\n");
    }
}
