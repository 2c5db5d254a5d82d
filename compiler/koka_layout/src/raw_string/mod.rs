//! Raw string literals: `r"..."`, `r#"..."#`, `r##"..."##`, ...
//!
//! The number of `#` after the `r` is the fence length `n`. The literal ends
//! at the first `"` followed by at least `n` `#`; exactly `n` of them belong
//! to the closing delimiter. The body is taken verbatim, with no escapes, so
//! it may contain quotes and shorter `#` runs freely.

use koka_lexer_core::{Cursor, Span};

use crate::error::LexicalError;

/// A recognized raw string literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawString {
    /// The whole literal, `r` through the closing fence.
    pub span: Span,
    /// The body between the opening and closing quotes.
    pub content: Span,
    /// Number of `#` in each delimiter.
    pub fence: u32,
}

/// Recognize a raw string at the cursor.
///
/// Returns `Ok(None)` without moving the cursor when the text here is not a
/// raw string opener (an identifier starting with `r`, say). On success the
/// cursor is left just past the closing fence.
///
/// # Errors
///
/// [`LexicalError::UnterminatedRawString`] when no closing fence appears
/// before end of input. The error carries the literal's start position; the
/// cursor is left at EOF.
pub fn scan_raw_string(
    cursor: &mut Cursor<'_>,
    tab_width: u32,
) -> Result<Option<RawString>, LexicalError> {
    if cursor.current() != b'r' {
        return Ok(None);
    }
    let mut probe = *cursor;
    probe.advance();
    let fence = probe.count_run(b'#');
    probe.advance_n(fence);
    if probe.current() != b'"' || probe.is_eof() {
        return Ok(None);
    }

    let start = cursor.pos();
    let start_position = cursor.position(tab_width);
    probe.advance();
    let content_start = probe.pos();

    loop {
        if !probe.skip_to(b'"') {
            *cursor = probe;
            return Err(LexicalError::UnterminatedRawString {
                start: start_position,
                fence,
            });
        }
        let content_end = probe.pos();
        probe.advance();
        if probe.count_run(b'#') >= fence {
            probe.advance_n(fence);
            *cursor = probe;
            return Ok(Some(RawString {
                span: Span::new(start, probe.pos()),
                content: Span::new(content_start, content_end),
                fence,
            }));
        }
    }
}

#[cfg(test)]
mod tests;
