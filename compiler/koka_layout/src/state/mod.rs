//! Scanner state threaded between scanner calls.
//!
//! A [`ScannerState`] is a plain value. Every scan takes the previous state
//! by reference and returns a fresh one, so a driver can keep any number of
//! snapshots and resume from whichever it likes. The byte encoding is what a
//! parser engine stores next to its own parse-table state.

use bincode::Options;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::layout_stack::{LayoutStack, MAX_LAYOUT_DEPTH};

/// Upper bound on an encoded state, in bytes.
///
/// A full stack of [`MAX_LAYOUT_DEPTH`] frames encodes well below this.
pub const MAX_STATE_BYTES: usize = 4096;

bitflags! {
    /// Per-parse-unit flags carried across calls.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StateFlags: u8 {
        /// The last token emitted ended a statement or opened a block, so a
        /// `Semicolon` here would be redundant.
        const AT_STATEMENT_START = 1 << 0;
        /// A literal `{` was just read with layout enabled inside braces; its
        /// frame takes the column of the next significant token.
        const SEAT_EXPLICIT = 1 << 1;
        /// End of input has been reached and its closes queued.
        const EOF_DRAINED = 1 << 2;
    }
}

/// Layout tokens decided on but not yet handed to the engine.
///
/// Drained one token per call: a `Semicolon` first when `semi_next` is set,
/// then `closes` `CloseBrace` tokens, each followed by a `Semicolon` except
/// that the one after the last close depends on `final_semi`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pending {
    pub semi_next: bool,
    pub closes: u16,
    pub final_semi: bool,
    /// The last close covers a literal `}` in the source.
    pub literal_close: bool,
}

impl Pending {
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.semi_next && self.closes == 0
    }
}

/// Everything the scanner remembers between two calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannerState {
    pub(crate) stack: LayoutStack,
    /// Open `(` and `[` groups since the innermost explicit frame.
    pub(crate) paren_depth: u16,
    pub(crate) pending: Pending,
    pub(crate) flags: StateFlags,
}

impl ScannerState {
    /// State at the start of a parse unit: no frames, nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> &LayoutStack {
        &self.stack
    }

    pub fn paren_depth(&self) -> u16 {
        self.paren_depth
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    /// Encode the state into a blob of at most [`MAX_STATE_BYTES`] bytes.
    ///
    /// # Errors
    ///
    /// [`StateError::Encode`] if the encoder fails or the size limit is hit.
    pub fn serialize(&self) -> Result<Vec<u8>, StateError> {
        codec().serialize(self).map_err(StateError::Encode)
    }

    /// Encode the state into a caller-provided buffer, returning the number
    /// of bytes written.
    ///
    /// # Errors
    ///
    /// [`StateError::Oversized`] when the encoding does not fit in `buffer`.
    pub fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, StateError> {
        let needed = codec().serialized_size(self).map_err(StateError::Encode)?;
        let capacity = buffer.len();
        let Ok(len) = usize::try_from(needed) else {
            return Err(StateError::Oversized { needed, capacity });
        };
        if len > capacity {
            return Err(StateError::Oversized { needed, capacity });
        }
        codec()
            .serialize_into(&mut buffer[..len], self)
            .map_err(StateError::Encode)?;
        Ok(len)
    }

    /// Decode a blob produced by [`serialize`](Self::serialize).
    ///
    /// An empty blob is the engine's way of saying "start of input" and
    /// decodes to [`ScannerState::new`].
    ///
    /// # Errors
    ///
    /// [`StateError::Decode`] for malformed bytes, [`StateError::TooDeep`]
    /// for a stack beyond [`MAX_LAYOUT_DEPTH`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        let state: Self = codec().deserialize(bytes).map_err(|err| {
            tracing::debug!(len = bytes.len(), %err, "scanner state rejected");
            StateError::Decode(err)
        })?;
        if state.stack.depth() > MAX_LAYOUT_DEPTH {
            tracing::debug!(depth = state.stack.depth(), "scanner state too deep");
            return Err(StateError::TooDeep {
                depth: state.stack.depth(),
            });
        }
        Ok(state)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_STATE_BYTES as u64)
}
