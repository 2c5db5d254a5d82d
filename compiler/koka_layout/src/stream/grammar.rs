//! Which external tokens a parser would accept next.
//!
//! A real parse table knows this exactly. [`KokaGrammar`] approximates the
//! Koka grammar from the lexemes seen so far, which is enough to drive the
//! layout scanner over ordinary Koka code.

use crate::stream::lexeme::{Lexeme, LexemeKind};
use crate::token::{TokenKind, TokenSet};

/// Source of the acceptable-kind set handed to the layout scanner.
pub trait Grammar {
    /// Record a lexeme the driver has just produced.
    fn observe(&mut self, source: &str, lexeme: &Lexeme);

    /// External kinds acceptable before the next token, whose first
    /// significant byte is `upcoming` (`0` at end of input).
    fn accepts(&self, upcoming: u8) -> TokenSet;
}

/// Operators that belong to the grammar itself and never end a line
/// half-way through an expression.
const RESERVED_OPERATORS: [&str; 6] = ["=", "->", ":=", ".", ":", "|"];

/// Keywords after which a block body may follow.
const BLOCK_KEYWORDS: [&str; 5] = ["then", "else", "elif", "with", "handler"];

/// Approximate Koka parse state.
///
/// Terminators and raw strings are always acceptable. A block may open after
/// `=`, `->`, the keywords in [`BLOCK_KEYWORDS`], and anywhere in the
/// signature of a `fun`/`fn` after its parameters or in a `match` head. A
/// literal `{` always opens a block. The end-continuation signal is
/// acceptable after `(`, `[`, `,` and user operators.
#[derive(Clone, Debug, Default)]
pub struct KokaGrammar {
    /// A block body may open before the next token.
    block_next: bool,
    /// Inside a header that ends with a block: after `fun`/`fn` or `match`.
    header: Option<Header>,
    /// Grouping depth within the current header.
    depth: u32,
    /// The last lexeme permits continuing on the next line.
    continuation: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Header {
    /// Before the closing `)` of the parameters.
    Params,
    /// Result type and effects; any token at depth 0 may be followed by
    /// the body.
    Signature,
    /// The scrutinee of a `match`.
    Match,
}

impl Grammar for KokaGrammar {
    fn observe(&mut self, source: &str, lexeme: &Lexeme) {
        let text = lexeme.text(source);
        self.continuation = false;
        self.block_next = false;

        match lexeme.kind {
            LexemeKind::External(TokenKind::OpenBrace | TokenKind::Semicolon) => {
                self.header = None;
                self.depth = 0;
                return;
            }
            LexemeKind::External(_) => return,
            LexemeKind::Punct => match text {
                "(" | "[" => {
                    self.depth += 1;
                    self.continuation = true;
                }
                ")" | "]" => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 && self.header == Some(Header::Params) {
                        self.header = Some(Header::Signature);
                    }
                }
                "," => self.continuation = true,
                _ => {}
            },
            LexemeKind::Operator => {
                if text == "=" || text == "->" {
                    self.block_next = true;
                } else if !RESERVED_OPERATORS.contains(&text) {
                    self.continuation = true;
                }
            }
            LexemeKind::Ident => match text {
                "fun" | "fn" => {
                    self.header = Some(Header::Params);
                    self.depth = 0;
                }
                "match" => {
                    self.header = Some(Header::Match);
                    self.depth = 0;
                    return;
                }
                _ if BLOCK_KEYWORDS.contains(&text) => self.block_next = true,
                _ => {}
            },
            _ => {}
        }

        if self.depth == 0 && matches!(self.header, Some(Header::Signature | Header::Match)) {
            self.block_next = true;
        }
    }

    fn accepts(&self, upcoming: u8) -> TokenSet {
        let mut set = TokenSet::SEMICOLON | TokenSet::CLOSE_BRACE | TokenSet::RAW_STRING;
        if self.block_next || upcoming == b'{' {
            set |= TokenSet::OPEN_BRACE;
        }
        if self.continuation {
            set |= TokenSet::END_CONTINUATION_SIGNAL;
        }
        set
    }
}
