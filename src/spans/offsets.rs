//! Character-to-byte offset indexing for UTF-8 text.
//!
//! Annotations address text by character index, but comparisons happen on raw
//! bytes. An [`OffsetTable`] bridges the two: entry `i` is the byte where
//! character `i` begins, and one trailing entry holds the total byte length.
//!
//! Character boundaries are found with the continuation-byte rule only (a byte
//! starts a character unless its top two bits are `10`), so malformed UTF-8
//! still produces a usable table instead of an error.

/// Returns true if `byte` is a UTF-8 continuation byte (`10xxxxxx`).
#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Whitespace as classified by C `isspace` in the "C" locale.
///
/// Unlike [`u8::is_ascii_whitespace`], this includes vertical tab (0x0B).
#[inline]
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Strip leading and trailing [`is_space`] bytes.
pub fn trim_space(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Number of characters in `text` (count of non-continuation bytes).
pub fn char_count(text: &[u8]) -> usize {
    text.iter().filter(|&&b| !is_continuation(b)).count()
}

/// Ordered character index → byte index mapping for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: Vec<usize>,
}

impl OffsetTable {
    /// Index `text` in a single pass.
    pub fn index(text: &[u8]) -> Self {
        let mut offsets = Vec::with_capacity(text.len() + 1);
        offsets.extend(
            text.iter()
                .enumerate()
                .filter(|&(_, &b)| !is_continuation(b))
                .map(|(i, _)| i),
        );
        offsets.push(text.len());
        Self { offsets }
    }

    /// Number of characters covered by the table.
    pub fn char_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total byte length of the indexed text.
    pub fn byte_len(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    /// Byte where character `index` begins.
    ///
    /// `index == char_count()` yields the byte length. Returns `None` past that.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    /// Byte range occupied by the characters `[start, end)`.
    ///
    /// `None` when `start > end` or `end` is past the last character.
    pub fn byte_range(&self, start: usize, end: usize) -> Option<std::ops::Range<usize>> {
        if start > end {
            return None;
        }
        Some(self.byte_offset(start)?..self.byte_offset(end)?)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }
}
