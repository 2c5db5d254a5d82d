//! Lexemes produced by the reference driver, and the fallback lexer for
//! grammar-defined tokens.

use koka_lexer_core::{block_comment_body_len, Span};
use logos::Logos;

use crate::token::{ScannedToken, TokenKind};

/// Class of a lexeme in the driver's output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    /// A token from the layout scanner, literal or inserted.
    External(TokenKind),
    Ident,
    Number,
    String,
    Char,
    /// A run of operator symbols: `=`, `->`, `+`, `:=`, `|>` ...
    Operator,
    /// `(` `)` `[` `]` `{` `}` `,` `;` and backtick.
    Punct,
    /// A byte the grammar has no token for.
    Unknown,
}

/// One token of a tokenized source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub span: Span,
}

impl Lexeme {
    pub(crate) fn external(token: ScannedToken) -> Self {
        Lexeme {
            kind: LexemeKind::External(token.kind),
            span: token.span,
        }
    }

    /// Source text the lexeme covers. Empty for inserted layout tokens.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.to_range()).unwrap_or("")
    }

    /// Inserted by the layout rule rather than read from source.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.kind, LexemeKind::External(_)) && self.span.is_empty()
    }
}

/// Grammar-defined tokens, lexed when the layout scanner has nothing.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum GrammarToken {
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(-[a-zA-Z][a-zA-Z0-9_]*)*'*")]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)'")]
    Char,

    #[regex(r"[$%&*+@!/\\^~=.:\-?|<>]+")]
    Operator,

    #[regex(r"[()\[\]{},;`]")]
    Punct,
}

/// Skip a nested `/* */` comment; an unterminated one runs to the end.
fn block_comment(lex: &mut logos::Lexer<'_, GrammarToken>) -> logos::Skip {
    let rest = lex.remainder().as_bytes();
    lex.bump(block_comment_body_len(rest).unwrap_or(rest.len()));
    logos::Skip
}

impl GrammarToken {
    fn kind(self) -> LexemeKind {
        match self {
            GrammarToken::Ident => LexemeKind::Ident,
            GrammarToken::Number => LexemeKind::Number,
            GrammarToken::String => LexemeKind::String,
            GrammarToken::Char => LexemeKind::Char,
            GrammarToken::Operator => LexemeKind::Operator,
            GrammarToken::Punct => LexemeKind::Punct,
            GrammarToken::BlockComment => LexemeKind::Unknown,
        }
    }
}

/// Lex the grammar token at or after `offset`, skipping trivia. `None` at
/// end of input.
#[allow(
    clippy::cast_possible_truncation,
    reason = "offsets are bounded by the source length, which fits in u32"
)]
pub(crate) fn lex_grammar_token(source: &str, offset: u32) -> Option<Lexeme> {
    let rest = source.get(offset as usize..)?;
    let mut lexer = GrammarToken::lexer(rest);
    let token = lexer.next()?;
    let range = lexer.span();
    let kind = token.map_or(LexemeKind::Unknown, GrammarToken::kind);
    Some(Lexeme {
        kind,
        span: Span::new(offset + range.start as u32, offset + range.end as u32),
    })
}
