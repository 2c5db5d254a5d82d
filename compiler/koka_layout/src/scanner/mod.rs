//! The layout scanner: one external token per call.
//!
//! # Call protocol
//!
//! The engine calls [`LayoutScanner::scan`] before lexing each token, with
//! the offset where that token may begin, the state returned by the previous
//! call, and the set of external kinds its parse table accepts. The answer
//! is either a token (the engine resumes at the token's end) or no token,
//! after which the engine lexes one grammar token itself and calls again.
//!
//! Inserted layout tokens are zero-width and sit on the first significant
//! byte after the skipped whitespace, so a run of them (`}` `;` `}` ...) is
//! handed out over consecutive calls at the same offset.
//!
//! # Per-call flow
//!
//! 1. Skip trivia, noting whether a line break was crossed.
//! 2. Hand out the next queued layout token, if any.
//! 3. Seat the root frame at column 0 on the first significant token.
//! 4. At end of input, queue closes for the open implicit frames (once).
//! 5. After a line break: the end-continuation signal unless the line
//!    dedents, otherwise the offside comparison against the open frames.
//! 6. Literal `{`, `}`, `;` and raw strings.
//! 7. Otherwise no token; note grouping brackets the engine is about to lex.

use koka_lexer_core::{SourceBuffer, Span};
use tracing::{debug, trace};

use crate::config::ScannerConfig;
use crate::cursor::ScanCursor;
use crate::error::{LexicalError, ScanError};
use crate::layout_stack::{Frame, Landing, LineDecision};
use crate::raw_string::scan_raw_string;
use crate::state::{Pending, ScannerState, StateFlags};
use crate::token::{ScannedToken, TokenKind, TokenSet};

/// Result of one scanner call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scan {
    /// The recognized token, or `None` to let the engine lex a grammar token.
    pub token: Option<ScannedToken>,
    /// State to pass to the next call.
    pub state: ScannerState,
}

/// Outcome of the internal decision procedure.
enum Step {
    Emit(ScannedToken),
    /// No token; the working state (grouping depth, flags) is kept.
    Fallthrough,
    /// No token; the input state is returned with only the grouping depth
    /// updated.
    Reject,
}

/// Layout-sensitive external scanner.
///
/// Holds only configuration; all per-parse data lives in the
/// [`ScannerState`] values threaded through [`scan`](Self::scan), so one
/// scanner can serve any number of parses, on any number of threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutScanner {
    config: ScannerConfig,
}

impl LayoutScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Try to recognize one external token at `offset`.
    ///
    /// Pure in `state`: the input is never modified and a fresh state is
    /// returned, so the caller may replay or discard the call freely. A
    /// structural no-match keeps the input layout but still counts a
    /// grouping bracket at the offset.
    ///
    /// # Errors
    ///
    /// [`LexicalError::UnterminatedRawString`] and
    /// [`LexicalError::LayoutStackOverflow`]. Structural problems such as an
    /// unmatched `}` are not errors; they yield `token: None`.
    #[tracing::instrument(level = "trace", skip_all, fields(offset))]
    pub fn scan(
        &self,
        source: &SourceBuffer,
        offset: u32,
        state: &ScannerState,
        valid: TokenSet,
    ) -> Result<Scan, LexicalError> {
        let mut cursor = ScanCursor::new(source, offset, valid, self.config.tab_width);
        let mut next = state.clone();
        match self.step(&mut cursor, &mut next)? {
            Step::Emit(token) => {
                trace!(kind = token.kind.grammar_name(), span = ?token.span, "emit");
                Ok(Scan {
                    token: Some(token),
                    state: next,
                })
            }
            Step::Fallthrough => {
                trace!(at = cursor.pos(), "no external token");
                Ok(Scan {
                    token: None,
                    state: next,
                })
            }
            Step::Reject => {
                trace!(at = cursor.pos(), "no match, layout unchanged");
                let mut kept = state.clone();
                note_grouping(cursor.current(), &mut kept);
                Ok(Scan {
                    token: None,
                    state: kept,
                })
            }
        }
    }

    /// [`scan`](Self::scan) over an encoded state, for engines that store
    /// scanner state as an opaque blob.
    ///
    /// # Errors
    ///
    /// Lexical errors from the scan, or a state that fails to decode or
    /// encode.
    pub fn scan_serialized(
        &self,
        source: &SourceBuffer,
        offset: u32,
        blob: &[u8],
        valid: TokenSet,
    ) -> Result<(Option<ScannedToken>, Vec<u8>), ScanError> {
        let state = ScannerState::deserialize(blob)?;
        let Scan { token, state } = self.scan(source, offset, &state, valid)?;
        Ok((token, state.serialize()?))
    }

    fn step(
        &self,
        cursor: &mut ScanCursor<'_>,
        state: &mut ScannerState,
    ) -> Result<Step, LexicalError> {
        let trivia = cursor.skip_trivia();
        let here = cursor.pos();

        if !state.pending.is_empty() {
            if let Some(step) = Self::drain_pending(cursor, state) {
                return Ok(step);
            }
        }

        if state.stack.is_empty() {
            if cursor.is_eof() {
                return Ok(Step::Reject);
            }
            trace!(at = here, "seating root frame");
            Self::push(cursor, state, Frame::implicit(0))?;
            state.flags.insert(StateFlags::AT_STATEMENT_START);
        }

        if state.flags.contains(StateFlags::SEAT_EXPLICIT) && !cursor.is_eof() {
            state.flags.remove(StateFlags::SEAT_EXPLICIT);
            if cursor.current() != b'}' {
                let column = cursor.column();
                if let Some(frame) = state.stack.top_mut() {
                    frame.reference_column = column;
                }
            }
        }

        if cursor.is_eof() {
            return Ok(Self::drain_eof(cursor, state));
        }

        if trivia.newline {
            // A line that closes blocks is never swallowed by the signal.
            let dedents = state.paren_depth == 0
                && cursor.current() != b'}'
                && matches!(
                    state.stack.decide(cursor.column(), self.config.layout_in_braces),
                    LineDecision::Dedent { .. }
                );
            if !dedents && cursor.accepts(TokenKind::EndContinuationSignal) {
                return Ok(Step::Emit(ScannedToken::literal(
                    TokenKind::EndContinuationSignal,
                    Span::new(trivia.start, here),
                )));
            }
            if state.paren_depth == 0 {
                if let Some(step) = self.offside(cursor, state)? {
                    return Ok(step);
                }
            }
        }

        self.literal(cursor, state)
    }

    /// Compare a new line against the open frames.
    ///
    /// `None` means the line neither opens, separates nor closes anything.
    fn offside(
        &self,
        cursor: &ScanCursor<'_>,
        state: &mut ScannerState,
    ) -> Result<Option<Step>, LexicalError> {
        let here = cursor.pos();
        let column = cursor.column();
        let continues = cursor.starts_continuation();

        match state.stack.decide(column, self.config.layout_in_braces) {
            LineDecision::Suspended => Ok(None),
            LineDecision::Indented => {
                if continues || !cursor.accepts(TokenKind::OpenBrace) {
                    return Ok(None);
                }
                Self::push(cursor, state, Frame::implicit(column))?;
                state.flags.insert(StateFlags::AT_STATEMENT_START);
                Ok(Some(Step::Emit(ScannedToken::synthetic(
                    TokenKind::OpenBrace,
                    here,
                ))))
            }
            LineDecision::Aligned => {
                if continues
                    || !cursor.accepts(TokenKind::Semicolon)
                    || state.flags.contains(StateFlags::AT_STATEMENT_START)
                {
                    return Ok(None);
                }
                state.flags.insert(StateFlags::AT_STATEMENT_START);
                Ok(Some(Step::Emit(ScannedToken::synthetic(
                    TokenKind::Semicolon,
                    here,
                ))))
            }
            LineDecision::Dedent { closes, landing } => {
                // A literal `}` closes its own implicit frames.
                if cursor.current() == b'}' {
                    return Ok(None);
                }
                if !cursor.accepts(TokenKind::Semicolon) && !cursor.accepts(TokenKind::CloseBrace)
                {
                    return Ok(None);
                }
                if landing == Landing::Between && !continues {
                    debug!(column, closes, "dedent lands between blocks");
                    return Ok(Some(Step::Reject));
                }
                for _ in 0..closes {
                    Self::pop(state);
                }
                state.pending = Pending {
                    semi_next: !state.flags.contains(StateFlags::AT_STATEMENT_START),
                    closes: u16::try_from(closes).unwrap_or(u16::MAX),
                    final_semi: landing == Landing::Aligned && !continues,
                    literal_close: false,
                };
                trace!(column, closes, ?landing, "dedent");
                Ok(Self::drain_pending(cursor, state))
            }
            LineDecision::Misaligned => {
                if continues {
                    return Ok(None);
                }
                debug!(column, "line starts left of the root block");
                Ok(Some(Step::Reject))
            }
        }
    }

    /// Literal braces, semicolons and raw strings; otherwise no token.
    fn literal(
        &self,
        cursor: &mut ScanCursor<'_>,
        state: &mut ScannerState,
    ) -> Result<Step, LexicalError> {
        let here = cursor.pos();
        match cursor.current() {
            b'{' if cursor.accepts(TokenKind::OpenBrace) => {
                let frame = Frame::explicit(cursor.column(), state.paren_depth);
                Self::push(cursor, state, frame)?;
                state.paren_depth = 0;
                state.flags.insert(StateFlags::AT_STATEMENT_START);
                if self.config.layout_in_braces {
                    state.flags.insert(StateFlags::SEAT_EXPLICIT);
                }
                return Ok(Step::Emit(ScannedToken::literal(
                    TokenKind::OpenBrace,
                    Span::new(here, here + 1),
                )));
            }
            b'}' if cursor.accepts(TokenKind::CloseBrace)
                || cursor.accepts(TokenKind::Semicolon) =>
            {
                let Some(implicit) = state.stack.implicit_above_explicit() else {
                    debug!(at = here, "`}}` with no open `{{`");
                    return Ok(Step::Reject);
                };
                for _ in 0..=implicit {
                    Self::pop(state);
                }
                state.flags.remove(StateFlags::SEAT_EXPLICIT);
                state.pending = Pending {
                    semi_next: !state.flags.contains(StateFlags::AT_STATEMENT_START),
                    closes: u16::try_from(implicit + 1).unwrap_or(u16::MAX),
                    final_semi: false,
                    literal_close: true,
                };
                if let Some(step) = Self::drain_pending(cursor, state) {
                    return Ok(step);
                }
            }
            b';' if cursor.accepts(TokenKind::Semicolon) => {
                state.flags.insert(StateFlags::AT_STATEMENT_START);
                return Ok(Step::Emit(ScannedToken::literal(
                    TokenKind::Semicolon,
                    Span::new(here, here + 1),
                )));
            }
            b'r' if cursor.accepts(TokenKind::RawString) => {
                let tab_width = self.config.tab_width;
                if let Some(raw) = scan_raw_string(cursor.bytes(), tab_width)? {
                    state.flags.remove(StateFlags::AT_STATEMENT_START);
                    return Ok(Step::Emit(ScannedToken {
                        kind: TokenKind::RawString,
                        span: raw.span,
                        content: Some(raw.content),
                    }));
                }
            }
            _ => {}
        }

        note_grouping(cursor.current(), state);
        state.flags.remove(StateFlags::AT_STATEMENT_START);
        Ok(Step::Fallthrough)
    }

    /// Queue the closes owed at end of input. Runs once per parse unit.
    fn drain_eof(cursor: &ScanCursor<'_>, state: &mut ScannerState) -> Step {
        if state.flags.contains(StateFlags::EOF_DRAINED) {
            return Step::Reject;
        }
        state.flags.insert(StateFlags::EOF_DRAINED);
        let closes = state.stack.drainable();
        for _ in 0..closes {
            Self::pop(state);
        }
        trace!(closes, "end of input");
        state.pending = Pending {
            semi_next: !state.flags.contains(StateFlags::AT_STATEMENT_START),
            closes: u16::try_from(closes).unwrap_or(u16::MAX),
            final_semi: true,
            literal_close: false,
        };
        Self::drain_pending(cursor, state).unwrap_or(Step::Fallthrough)
    }

    /// Hand out the next queued token.
    ///
    /// A queued `Semicolon` the engine does not accept is dropped; a queued
    /// `CloseBrace` it does not accept rejects the call. `None` once the
    /// queue is exhausted without emitting.
    fn drain_pending(cursor: &ScanCursor<'_>, state: &mut ScannerState) -> Option<Step> {
        let here = cursor.pos();
        let pending = &mut state.pending;
        if pending.semi_next {
            pending.semi_next = false;
            if cursor.accepts(TokenKind::Semicolon) {
                state.flags.insert(StateFlags::AT_STATEMENT_START);
                return Some(Step::Emit(ScannedToken::synthetic(
                    TokenKind::Semicolon,
                    here,
                )));
            }
            trace!(at = here, "queued semicolon not accepted, dropped");
        }
        if pending.closes == 0 {
            return None;
        }
        if !cursor.accepts(TokenKind::CloseBrace) {
            return Some(Step::Reject);
        }
        pending.closes -= 1;
        let last = pending.closes == 0;
        pending.semi_next = !last || pending.final_semi;
        let token = if last && pending.literal_close {
            pending.literal_close = false;
            ScannedToken::literal(TokenKind::CloseBrace, Span::new(here, here + 1))
        } else {
            ScannedToken::synthetic(TokenKind::CloseBrace, here)
        };
        state.flags.remove(StateFlags::AT_STATEMENT_START);
        Some(Step::Emit(token))
    }

    fn push(
        cursor: &ScanCursor<'_>,
        state: &mut ScannerState,
        frame: Frame,
    ) -> Result<(), LexicalError> {
        state.stack.push(frame).map_err(|_| {
            let position = cursor.position();
            debug!(%position, depth = state.stack.depth(), "layout stack overflow");
            LexicalError::LayoutStackOverflow { position }
        })
    }

    fn pop(state: &mut ScannerState) {
        if let Some(frame) = state.stack.pop() {
            if frame.explicit {
                state.paren_depth = frame.outer_paren_depth;
            }
        }
    }
}

/// Track the grouping bracket the engine is about to lex.
fn note_grouping(byte: u8, state: &mut ScannerState) {
    match byte {
        b'(' | b'[' => state.paren_depth = state.paren_depth.saturating_add(1),
        b')' | b']' => state.paren_depth = state.paren_depth.saturating_sub(1),
        _ => {}
    }
}
