//! Byte cursor over a [`SourceBuffer`](crate::SourceBuffer).
//!
//! Reads past the source end hit the zero sentinel and padding, so the hot
//! path (`current`, `advance`, `eat_while`) needs no bounds checks. A NUL
//! inside the source reads as `0x00` too; [`Cursor::is_eof`] compares the
//! offset against the source length to tell the two apart.
//!
//! Besides navigation the cursor answers the layout questions the scanner
//! asks at every line start: which line, where it begins, and the visual
//! column of the current byte.

use crate::source_buffer::UTF8_BOM;
use crate::Position;

/// `Copy` position in a sentinel-terminated buffer.
///
/// Lookahead is done by copying the cursor, probing, and dropping the copy.
///
/// `buf[source_len]` and every byte after it are `0x00`;
/// [`SourceBuffer`](crate::SourceBuffer) upholds this.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

// Navigation.
impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            buf.get(source_len as usize) == Some(&0),
            "buffer must end in a zero sentinel"
        );
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte under the cursor; `0x00` at end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_at(1)
    }

    #[inline]
    pub fn peek2(&self) -> u8 {
        self.peek_at(2)
    }

    /// Byte `n` ahead, `0x00` once past the source.
    #[inline]
    pub fn peek_at(&self, n: u32) -> u8 {
        let at = self.pos.saturating_add(n);
        if at < self.source_len {
            self.buf[at as usize]
        } else {
            0
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Byte offset from the start of the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Source text in `start..end`, or `""` when the range splits a
    /// UTF-8 character.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(start <= end && end <= self.source_len, "bad slice {start}..{end}");
        std::str::from_utf8(&self.buf[start as usize..end as usize]).unwrap_or_default()
    }

    /// Source text from `start` up to the cursor.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    #[inline]
    pub fn starts_with(&self, bytes: &[u8]) -> bool {
        self.rest().starts_with(bytes)
    }

    /// Advance while `pred` holds. `pred(0)` must be `false` so the sentinel
    /// stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.source_len) as usize..self.source_len as usize]
    }
}

// Searching. Offsets found in `rest()` fit in u32 because the source does.
#[allow(
    clippy::cast_possible_truncation,
    reason = "offsets are bounded by source_len, a u32"
)]
impl Cursor<'_> {
    /// Length of the run of `byte` at the cursor. Does not move.
    pub fn count_run(&self, byte: u8) -> u32 {
        self.rest().iter().take_while(|&&b| b == byte).count() as u32
    }

    /// Move onto the next `byte`. Returns `false`, with the cursor at end of
    /// input, when there is none.
    pub fn skip_to(&mut self, byte: u8) -> bool {
        match memchr::memchr(byte, self.rest()) {
            Some(offset) => {
                self.pos += offset as u32;
                true
            }
            None => {
                self.pos = self.source_len;
                false
            }
        }
    }

    /// Move onto the next `\n`, or to end of input. Skips `//` comments.
    pub fn eat_until_newline_or_eof(&mut self) {
        let _ = self.skip_to(b'\n');
    }

    /// Skip a `/* */` comment, nested ones included. The cursor must be on
    /// the opening `/*`.
    ///
    /// Returns `false` if the input ends first; the cursor is then at end of
    /// input.
    pub fn eat_block_comment(&mut self) -> bool {
        debug_assert!(self.starts_with(b"/*"), "not on a block comment");
        self.advance_n(2);
        match block_comment_body_len(self.rest()) {
            Some(len) => {
                self.advance_n(len as u32);
                true
            }
            None => {
                self.pos = self.source_len;
                false
            }
        }
    }

    /// Offset of the first byte on the cursor's line.
    pub fn line_start(&self) -> u32 {
        memchr::memrchr(b'\n', self.before()).map_or(0, |nl| nl as u32 + 1)
    }

    /// Zero-based line of the cursor.
    pub fn line(&self) -> u32 {
        memchr::memchr_iter(b'\n', self.before()).count() as u32
    }
}

// Columns.
impl Cursor<'_> {
    /// Visual column of the cursor on its line.
    ///
    /// A tab adds `tab_width`, a carriage return goes back to column 0, and
    /// UTF-8 continuation bytes add nothing. The byte order mark at the start
    /// of the source is not counted.
    pub fn column(&self, tab_width: u32) -> u32 {
        let before = self.before();
        let mut line = &before[self.line_start() as usize..];
        if line.len() == before.len() {
            line = line.strip_prefix(&UTF8_BOM).unwrap_or(line);
        }
        line.iter().fold(0, |column, &b| match b {
            b'\t' => column + tab_width,
            b'\r' => 0,
            0x80..=0xBF => column,
            _ => column + 1,
        })
    }

    /// Line and column of the cursor, for diagnostics.
    pub fn position(&self, tab_width: u32) -> Position {
        Position {
            offset: self.pos,
            line: self.line(),
            column: self.column(tab_width),
        }
    }

    fn before(&self) -> &[u8] {
        &self.buf[..self.pos.min(self.source_len) as usize]
    }
}

/// Length of a block comment body, from just after its opening `/*` through
/// the matching `*/`. Nested comments must close too. `None` when the input
/// ends first.
pub fn block_comment_body_len(body: &[u8]) -> Option<usize> {
    let mut depth = 1u32;
    let mut i = 0;
    while i < body.len() {
        match &body[i..] {
            [b'*', b'/', ..] => {
                i += 2;
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            [b'/', b'*', ..] => {
                i += 2;
                depth += 1;
            }
            _ => i += 1,
        }
    }
    None
}
