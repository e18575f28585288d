//! Documents: one title/abstract pair keyed by a positive id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{parse_positive_id, RecordError};
use crate::spans::OffsetTable;

/// Which half of a document an annotation points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Title,
    Abstract,
}

impl Section {
    /// Parse the one-byte section tag (`T` or `A`).
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"T" => Some(Section::Title),
            b"A" => Some(Section::Abstract),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Section::Title => 'T',
            Section::Abstract => 'A',
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A document with its offset tables.
///
/// Tables are built on construction and dropped with the document, so they
/// are never shared between two documents.
#[derive(Debug, Clone)]
pub struct Document {
    id: u64,
    title: Vec<u8>,
    abstract_text: Vec<u8>,
    title_offsets: OffsetTable,
    abstract_offsets: OffsetTable,
}

impl Document {
    pub fn new(id: u64, title: impl Into<Vec<u8>>, abstract_text: impl Into<Vec<u8>>) -> Self {
        let title = title.into();
        let abstract_text = abstract_text.into();
        let title_offsets = OffsetTable::index(&title);
        let abstract_offsets = OffsetTable::index(&abstract_text);
        Self {
            id,
            title,
            abstract_text,
            title_offsets,
            abstract_offsets,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &[u8] {
        &self.title
    }

    pub fn abstract_text(&self) -> &[u8] {
        &self.abstract_text
    }

    /// Text and offset table for one section.
    pub fn section(&self, section: Section) -> (&[u8], &OffsetTable) {
        match section {
            Section::Title => (&self.title, &self.title_offsets),
            Section::Abstract => (&self.abstract_text, &self.abstract_offsets),
        }
    }
}

/// Incremental builder fed one field at a time: `id`, `title`, `abstract`.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    id: Option<u64>,
    title: Option<Vec<u8>>,
    abstract_text: Option<Vec<u8>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, field: &[u8]) -> Result<(), RecordError> {
        if self.id.is_none() {
            let id = parse_positive_id(field).ok_or_else(|| RecordError::InvalidDocumentId {
                value: String::from_utf8_lossy(field).into_owned(),
            })?;
            self.id = Some(id);
        } else if self.title.is_none() {
            self.title = Some(field.to_vec());
        } else if self.abstract_text.is_none() {
            self.abstract_text = Some(field.to_vec());
        } else {
            return Err(RecordError::UnexpectedField {
                value: String::from_utf8_lossy(field).into_owned(),
            });
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Document, RecordError> {
        let id = self.id.ok_or(RecordError::MissingField { field: "id" })?;
        let title = self.title.ok_or(RecordError::MissingField { field: "title" })?;
        let abstract_text = self
            .abstract_text
            .ok_or(RecordError::MissingField { field: "abstract" })?;
        Ok(Document::new(id, title, abstract_text))
    }

    /// Build a document from an already-split row.
    pub fn from_fields<'a, I>(fields: I) -> Result<Document, RecordError>
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
