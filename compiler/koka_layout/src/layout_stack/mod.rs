//! Stack of open layout blocks and the offside-rule comparison.
//!
//! The bottom frame is the root block of the parse unit. The scanner seats
//! it at column 0; a stack decoded from elsewhere may carry any column. It
//! is never closed by indentation. Above it,
//! implicit frames are opened by indentation and explicit frames by a
//! literal `{`.
//!
//! Implicit frames above any explicit frame have strictly increasing
//! reference columns from bottom to top. An explicit frame's column is
//! opaque while it is open.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::StackOverflow;

/// Maximum number of frames, root included.
pub const MAX_LAYOUT_DEPTH: usize = 256;

/// One open block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Column that defines membership in this block.
    pub reference_column: u32,
    /// Opened by a literal `{`; closed only by a literal `}`.
    pub explicit: bool,
    /// Grouping depth of the enclosing context, restored when the frame
    /// closes. Always 0 for implicit frames.
    pub outer_paren_depth: u16,
}

impl Frame {
    /// A block opened by indentation.
    pub const fn implicit(reference_column: u32) -> Self {
        Frame {
            reference_column,
            explicit: false,
            outer_paren_depth: 0,
        }
    }

    /// A block opened by a literal `{` inside `outer_paren_depth` open groups.
    pub const fn explicit(reference_column: u32, outer_paren_depth: u16) -> Self {
        Frame {
            reference_column,
            explicit: true,
            outer_paren_depth,
        }
    }
}

/// How a new line relates to the open blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineDecision {
    /// The top frame is explicit and layout is suspended inside it.
    Suspended,
    /// Right of the top frame: continuation, or the body of a new block.
    Indented,
    /// On the top frame's column: a new statement.
    Aligned,
    /// Left of the top frame: `closes` frames end.
    Dedent { closes: usize, landing: Landing },
    /// Left of the root frame.
    Misaligned,
}

/// Where a dedent lands once the closed frames are gone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Landing {
    /// Exactly on the new top frame's column.
    Aligned,
    /// Strictly between the new top frame and the last closed one.
    Between,
    /// On an explicit frame, whose column does not take part.
    Opaque,
}

/// Ordered stack of open layout frames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutStack {
    frames: SmallVec<[Frame; 8]>,
}

impl LayoutStack {
    /// An empty stack (root not seated yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open frames, root included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// `true` until the root frame is seated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames from bottom (root) to top.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The innermost frame.
    #[inline]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Open a frame.
    pub fn push(&mut self, frame: Frame) -> Result<(), StackOverflow> {
        if self.frames.len() >= MAX_LAYOUT_DEPTH {
            return Err(StackOverflow);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Close the innermost frame.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Compare the column of a new line's first token against the open
    /// frames.
    ///
    /// With `layout_in_braces` unset, an explicit top frame suspends the
    /// comparison entirely. Either way explicit frames are never closed by
    /// a dedent.
    pub fn decide(&self, column: u32, layout_in_braces: bool) -> LineDecision {
        let Some(top) = self.top() else {
            return LineDecision::Indented;
        };
        if top.explicit && !layout_in_braces {
            return LineDecision::Suspended;
        }
        if column > top.reference_column {
            return LineDecision::Indented;
        }
        if column == top.reference_column {
            return LineDecision::Aligned;
        }
        if top.explicit {
            return LineDecision::Suspended;
        }

        let closes = self.closable_above(|frame| frame.reference_column > column);
        if closes == 0 {
            // The top frame is the root.
            return LineDecision::Misaligned;
        }
        let landing_frame = self.frames[self.frames.len() - closes - 1];

        let landing = if landing_frame.explicit && !layout_in_braces {
            Landing::Opaque
        } else if landing_frame.reference_column == column {
            Landing::Aligned
        } else if landing_frame.reference_column < column {
            Landing::Between
        } else if landing_frame.explicit {
            Landing::Opaque
        } else {
            // Only the root can sit right of the column here.
            return LineDecision::Misaligned;
        };
        LineDecision::Dedent { closes, landing }
    }

    /// Number of implicit frames above the innermost explicit frame, or
    /// `None` when no explicit frame is open.
    pub fn implicit_above_explicit(&self) -> Option<usize> {
        self.frames.iter().rev().position(|frame| frame.explicit)
    }

    /// Implicit frames the end of input closes: those above the root and
    /// above the innermost explicit frame.
    pub fn drainable(&self) -> usize {
        self.closable_above(|_| true)
    }

    /// Count frames from the top that are implicit, not the root, and
    /// satisfy `pred`.
    fn closable_above(&self, pred: impl Fn(&Frame) -> bool) -> usize {
        self.frames
            .iter()
            .skip(1)
            .rev()
            .take_while(|frame| !frame.explicit && pred(frame))
            .count()
    }
}
