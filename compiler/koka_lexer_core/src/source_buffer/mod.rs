//! Owned source text with a zero sentinel after it.
//!
//! The parser engine hands the scanner an offset into the same text on every
//! call, so the buffer is built once per parse unit and then only borrowed.

use crate::Cursor;

/// Allocation granularity; also leaves room for `peek2` past the end.
const CACHE_LINE: usize = 64;

/// UTF-8 encoding of U+FEFF.
pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Source bytes followed by `0x00` up to a 64-byte boundary.
///
/// ```text
/// [ source ... | 0x00 | 0x00 padding ... ]
///   0            len    rounded up to 64
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    buf: Vec<u8>,
    len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a fresh padded buffer.
    ///
    /// Offsets are `u32`; a source longer than that is truncated to
    /// `u32::MAX` bytes of visible content.
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let padded = (bytes.len() + 1).next_multiple_of(CACHE_LINE);
        let mut buf = vec![0u8; padded];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            buf,
            len: u32::try_from(bytes.len()).unwrap_or(u32::MAX),
        }
    }

    /// The source text, without sentinel or padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.len)
    }

    /// Cursor at `offset`. Offsets past the end land on end of input.
    pub fn cursor_at(&self, offset: u32) -> Cursor<'_> {
        let mut cursor = self.cursor();
        cursor.advance_n(offset.min(self.len));
        cursor
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 3 when the source starts with a byte order mark, else 0.
    ///
    /// The first scanner call is made past it.
    pub fn bom_len(&self) -> u32 {
        if self.as_bytes().starts_with(&UTF8_BOM) {
            3
        } else {
            0
        }
    }
}
