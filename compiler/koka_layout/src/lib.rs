//! Layout-sensitive external scanner for Koka.
//!
//! Koka blocks and statements can be delimited by indentation instead of
//! braces and semicolons. A context-free grammar cannot see indentation, so
//! the grammar declares five tokens as external and this crate recognizes
//! them:
//!
//! - `OpenBrace`, `CloseBrace`, `Semicolon`: literal `{` `}` `;`, or inserted
//!   by the offside rule from line breaks and columns
//! - `RawString`: `r#"..."#` literals whose closing fence depends on the
//!   opening one
//! - `EndContinuationSignal`: a line break the grammar may swallow after an
//!   operator, `(`, `[` or `,`
//!
//! # Architecture
//!
//! - [`ScanCursor`]: byte lookahead, columns, and the accepted-kind set
//! - [`LayoutStack`]: open blocks and the offside comparison
//! - [`raw_string`]: the raw string recognizer
//! - [`ScannerState`]: value threaded between calls, with a byte encoding
//! - [`LayoutScanner`]: one token per call, pure in its state
//! - [`stream`]: reference driver that tokenizes whole sources

mod config;
mod cursor;
mod error;
mod layout_stack;
pub mod raw_string;
mod scanner;
mod state;
pub mod stream;
mod token;

use std::sync::Once;

pub use config::ScannerConfig;
pub use cursor::{ScanCursor, Trivia};
pub use error::{LexicalError, ScanError, StackOverflow, StateError};
pub use layout_stack::{Frame, Landing, LayoutStack, LineDecision, MAX_LAYOUT_DEPTH};
pub use scanner::{LayoutScanner, Scan};
pub use state::{Pending, ScannerState, StateFlags, MAX_STATE_BYTES};
pub use token::{ScannedToken, TokenKind, TokenSet};

pub use koka_lexer_core::{Position, SourceBuffer, Span};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for debug output.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=koka_layout=trace`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
