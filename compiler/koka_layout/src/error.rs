//! Scanner error types.
//!
//! Only two conditions are fatal while scanning: an unterminated raw string
//! and a layout stack deeper than [`MAX_LAYOUT_DEPTH`]. Everything else that
//! looks wrong (an unmatched `}`, a dedent that lands between two blocks) is
//! reported as "no token" so the parser engine's own recovery can take over.

use koka_lexer_core::Position;

use crate::layout_stack::MAX_LAYOUT_DEPTH;

/// Fatal lexical error raised by [`LayoutScanner::scan`](crate::LayoutScanner::scan).
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexicalError {
    /// A raw string opener with no matching closing fence before EOF.
    #[error("unterminated raw string starting at {start} (fence of {fence} `#`)")]
    UnterminatedRawString { start: Position, fence: u32 },
    /// Opening one more block would exceed the stack limit.
    #[error("layout blocks nested deeper than {} frames at {position}", MAX_LAYOUT_DEPTH)]
    LayoutStackOverflow { position: Position },
}

/// Pushing onto a full [`LayoutStack`](crate::LayoutStack).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("layout stack is full ({} frames)", MAX_LAYOUT_DEPTH)]
pub struct StackOverflow;

/// Failure to encode or decode a serialized [`ScannerState`](crate::ScannerState).
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to encode scanner state")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode scanner state")]
    Decode(#[source] bincode::Error),
    #[error("scanner state holds {depth} layout frames, limit is {}", MAX_LAYOUT_DEPTH)]
    TooDeep { depth: usize },
    #[error("scanner state needs {needed} bytes, buffer holds {capacity}")]
    Oversized { needed: u64, capacity: usize },
}

/// Any failure of the blob-level entry point
/// [`LayoutScanner::scan_serialized`](crate::LayoutScanner::scan_serialized).
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    State(#[from] StateError),
}
