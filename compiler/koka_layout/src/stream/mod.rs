//! Reference driver: tokenize a whole source with the layout scanner.
//!
//! Plays the part of the parser engine. Before each token it asks a
//! [`Grammar`] which external kinds are acceptable, calls
//! [`LayoutScanner::scan`], and when the scanner has nothing it lexes one
//! grammar-defined token itself. Scanner state is threaded through by value,
//! so the stream can be checkpointed and rewound like a backtracking parser.

mod grammar;
mod lexeme;

use koka_lexer_core::SourceBuffer;
use rayon::prelude::*;
use tracing::debug;

use crate::config::ScannerConfig;
use crate::cursor::ScanCursor;
use crate::error::LexicalError;
use crate::scanner::LayoutScanner;
use crate::state::ScannerState;
use crate::token::TokenSet;

pub use grammar::{Grammar, KokaGrammar};
pub use lexeme::{Lexeme, LexemeKind};

use lexeme::lex_grammar_token;

/// Iterator of lexemes over one source.
///
/// Yields `Err` at most once, for a fatal scanner error, and then ends.
pub struct TokenStream<'src, G> {
    source: &'src str,
    buffer: SourceBuffer,
    scanner: LayoutScanner,
    grammar: G,
    state: ScannerState,
    offset: u32,
    done: bool,
}

/// Position of a [`TokenStream`] that it can be rewound to.
#[derive(Clone, Debug)]
pub struct Checkpoint<G> {
    offset: u32,
    state: ScannerState,
    grammar: G,
    done: bool,
}

impl<G> Checkpoint<G> {
    /// Byte offset the stream will resume at.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Scanner state the stream will resume with.
    pub fn state(&self) -> &ScannerState {
        &self.state
    }
}

impl<'src, G: Grammar> TokenStream<'src, G> {
    pub fn new(source: &'src str, config: ScannerConfig, grammar: G) -> Self {
        let buffer = SourceBuffer::new(source);
        let offset = buffer.bom_len();
        TokenStream {
            source,
            buffer,
            scanner: LayoutScanner::new(config),
            grammar,
            state: ScannerState::new(),
            offset,
            done: false,
        }
    }

    /// Scanner state after the last lexeme.
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Offset where the next lexeme search starts.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Snapshot the stream position.
    pub fn checkpoint(&self) -> Checkpoint<G>
    where
        G: Clone,
    {
        Checkpoint {
            offset: self.offset,
            state: self.state.clone(),
            grammar: self.grammar.clone(),
            done: self.done,
        }
    }

    /// Resume from an earlier [`checkpoint`](Self::checkpoint).
    pub fn rewind(&mut self, checkpoint: Checkpoint<G>) {
        self.offset = checkpoint.offset;
        self.state = checkpoint.state;
        self.grammar = checkpoint.grammar;
        self.done = checkpoint.done;
    }

    fn next_lexeme(&mut self) -> Result<Option<Lexeme>, LexicalError> {
        let tab_width = self.scanner.config().tab_width;
        let valid = self
            .grammar
            .accepts(upcoming(&self.buffer, self.offset, tab_width));
        let scan = self
            .scanner
            .scan(&self.buffer, self.offset, &self.state, valid)?;
        self.state = scan.state;
        let lexeme = match scan.token {
            Some(token) => Lexeme::external(token),
            None => match lex_grammar_token(self.source, self.offset) {
                Some(lexeme) => lexeme,
                None => {
                    if self.state.stack().depth() > 1 {
                        debug!(
                            open = self.state.stack().depth() - 1,
                            "blocks left open at end of input"
                        );
                    }
                    return Ok(None);
                }
            },
        };
        self.offset = lexeme.span.end;
        self.grammar.observe(self.source, &lexeme);
        Ok(Some(lexeme))
    }
}

impl<G: Grammar> Iterator for TokenStream<'_, G> {
    type Item = Result<Lexeme, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_lexeme() {
            Ok(Some(lexeme)) => Some(Ok(lexeme)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Tokenize `source` using [`KokaGrammar`].
///
/// # Errors
///
/// The first fatal [`LexicalError`] the scanner reports.
pub fn tokenize(source: &str, config: ScannerConfig) -> Result<Vec<Lexeme>, LexicalError> {
    tokenize_with(source, config, KokaGrammar::default())
}

/// Tokenize `source`, asking `grammar` which external kinds are acceptable.
///
/// # Errors
///
/// The first fatal [`LexicalError`] the scanner reports.
pub fn tokenize_with<G: Grammar>(
    source: &str,
    config: ScannerConfig,
    grammar: G,
) -> Result<Vec<Lexeme>, LexicalError> {
    TokenStream::new(source, config, grammar).collect()
}

/// Tokenize independent sources in parallel, one result per source in
/// input order.
pub fn tokenize_all<S>(
    sources: &[S],
    config: ScannerConfig,
) -> Vec<Result<Vec<Lexeme>, LexicalError>>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| tokenize(source.as_ref(), config))
        .collect()
}

/// First significant byte at or after `offset`.
fn upcoming(buffer: &SourceBuffer, offset: u32, tab_width: u32) -> u8 {
    let mut cursor = ScanCursor::new(buffer, offset, TokenSet::empty(), tab_width);
    cursor.skip_trivia();
    cursor.current()
}

#[cfg(test)]
mod tests;
