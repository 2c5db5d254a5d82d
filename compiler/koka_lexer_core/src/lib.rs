//! Low-level source access for the Koka layout scanner.
//!
//! This crate owns the byte-level view of a source file:
//! - [`SourceBuffer`]: sentinel-terminated copy of the source text
//! - [`Cursor`]: `Copy` cursor with lookahead and column/line queries
//! - [`Span`] and [`Position`]: byte ranges and human-facing locations
//!
//! It knows nothing about layout, token kinds, or scanner state. Those live in
//! `koka_layout`, which builds its scan cursor on top of [`Cursor`].

mod cursor;
mod source_buffer;
mod span;

pub use cursor::{block_comment_body_len, Cursor};
pub use source_buffer::SourceBuffer;
pub use span::{Position, Span};

/// Default visual width of a tab character when computing columns.
pub const DEFAULT_TAB_WIDTH: u32 = 8;
