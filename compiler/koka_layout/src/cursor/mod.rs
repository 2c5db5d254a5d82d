//! Character cursor handed to one scanner invocation.
//!
//! Wraps the byte [`Cursor`] with what the layout rule needs on top of raw
//! bytes: the set of token kinds the engine accepts here, trivia skipping
//! that notices line breaks, visual columns, and the start-of-line
//! continuation lookahead.

use koka_lexer_core::{Cursor, Position, SourceBuffer};

use crate::token::{TokenKind, TokenSet};

/// Keywords that continue the previous line when they start a new one.
const CONTINUATION_KEYWORDS: [&[u8]; 3] = [b"then", b"else", b"elif"];

/// Result of skipping whitespace and comments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trivia {
    /// Offset where the skipped run began.
    pub start: u32,
    /// A line break was crossed.
    pub newline: bool,
}

/// Cursor for a single scan: byte lookahead plus the engine's accepted kinds.
///
/// Cheap to copy. Advancing is its only mutation; nothing it does is visible
/// outside the scan that owns it.
#[derive(Clone, Copy, Debug)]
pub struct ScanCursor<'a> {
    cursor: Cursor<'a>,
    valid: TokenSet,
    tab_width: u32,
}

impl<'a> ScanCursor<'a> {
    /// Position a cursor at `offset` in `source`.
    pub fn new(source: &'a SourceBuffer, offset: u32, valid: TokenSet, tab_width: u32) -> Self {
        Self {
            cursor: source.cursor_at(offset),
            valid,
            tab_width,
        }
    }

    /// Check whether the engine accepts `kind` here.
    #[inline]
    pub fn accepts(&self, kind: TokenKind) -> bool {
        self.valid.accepts(kind)
    }

    /// Current byte, `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.cursor.current()
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Visual column of the current byte.
    pub fn column(&self) -> u32 {
        self.cursor.column(self.tab_width)
    }

    /// Line and column of the current byte, for error reporting.
    pub fn position(&self) -> Position {
        self.cursor.position(self.tab_width)
    }

    /// Byte cursor, for recognizers that consume source text.
    pub fn bytes(&mut self) -> &mut Cursor<'a> {
        &mut self.cursor
    }

    /// Skip spaces, tabs, line breaks, `//` line comments and nested
    /// `/* */` block comments.
    ///
    /// Leaves the cursor on the first significant byte (or EOF) and reports
    /// whether a line break was crossed on the way, including one inside a
    /// block comment.
    pub fn skip_trivia(&mut self) -> Trivia {
        let start = self.cursor.pos();
        let mut newline = false;
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' => self.cursor.advance(),
                b'\n' => {
                    newline = true;
                    self.cursor.advance();
                }
                b'/' if self.cursor.peek() == b'/' => self.cursor.eat_until_newline_or_eof(),
                b'/' if self.cursor.peek() == b'*' => {
                    let comment_start = self.cursor.pos();
                    let _ = self.cursor.eat_block_comment();
                    newline |= self.cursor.slice_from(comment_start).contains('\n');
                }
                _ => break,
            }
        }
        Trivia { start, newline }
    }

    /// Does the significant byte here start a token that continues the
    /// previous line?
    ///
    /// Operator characters, closing brackets, braces, `then`, `else` and
    /// `elif` all do. `>>`, `>|<` and `<<` do not.
    pub fn starts_continuation(&self) -> bool {
        let c = &self.cursor;
        match c.current() {
            b'$' | b'%' | b'&' | b'*' | b'+' | b'@' | b'\\' | b'^' | b'?' | b'.' | b'=' | b')'
            | b']' | b'{' | b'}' | b':' | b'-' | b'|' => true,
            b'>' => match c.peek() {
                b'>' => false,
                b'|' => c.peek2() != b'<',
                _ => true,
            },
            b'<' => c.peek() != b'<',
            b't' | b'e' => CONTINUATION_KEYWORDS.iter().any(|kw| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "keywords are four bytes long"
                )]
                let after = c.peek_at(kw.len() as u32);
                c.starts_with(kw) && !is_ident_continue(after)
            }),
            _ => false,
        }
    }
}

/// Bytes that may continue a Koka identifier.
#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\''
}
