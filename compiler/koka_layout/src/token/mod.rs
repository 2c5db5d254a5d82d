//! External token kinds and the acceptable-kind set.
//!
//! The parser engine decides which external tokens are valid at the current
//! parse-table state and hands the scanner a [`TokenSet`]. The scanner only
//! ever tries the kinds in that set.

use bitflags::bitflags;
use koka_lexer_core::Span;

/// Token kinds recognized by the layout scanner.
///
/// The discriminants match the order of the grammar's `externals` list, so a
/// `valid_symbols` array from the engine can be indexed by
/// [`TokenKind::index`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// `{`, literal or inserted by indentation.
    OpenBrace = 0,
    /// `}`, literal or inserted by dedent/EOF.
    CloseBrace = 1,
    /// `;`, literal or inserted at a new line in the same block.
    Semicolon = 2,
    /// `r#"..."#` raw string literal.
    RawString = 3,
    /// Optional line-continuation marker after `(`, `[`, `,` or an operator.
    EndContinuationSignal = 4,
}

impl TokenKind {
    /// All kinds, in `externals` order.
    pub const ALL: [TokenKind; 5] = [
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
        TokenKind::Semicolon,
        TokenKind::RawString,
        TokenKind::EndContinuationSignal,
    ];

    /// Position of this kind in the grammar's `externals` list.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name of the external symbol in the grammar.
    pub const fn grammar_name(self) -> &'static str {
        match self {
            TokenKind::OpenBrace => "_open_brace",
            TokenKind::CloseBrace => "_close_brace",
            TokenKind::Semicolon => "_semi",
            TokenKind::RawString => "_raw_string",
            TokenKind::EndContinuationSignal => "_end_continuation_signal",
        }
    }
}

bitflags! {
    /// Set of external token kinds the engine accepts at a position.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenSet: u8 {
        const OPEN_BRACE = 1 << 0;
        const CLOSE_BRACE = 1 << 1;
        const SEMICOLON = 1 << 2;
        const RAW_STRING = 1 << 3;
        const END_CONTINUATION_SIGNAL = 1 << 4;
    }
}

impl TokenSet {
    /// The three block-structure kinds.
    pub const LAYOUT: Self = Self::OPEN_BRACE
        .union(Self::CLOSE_BRACE)
        .union(Self::SEMICOLON);

    /// Singleton set for `kind`.
    #[inline]
    pub const fn of(kind: TokenKind) -> Self {
        Self::from_bits_truncate(1 << kind as u8)
    }

    /// Check whether `kind` is acceptable.
    #[inline]
    pub const fn accepts(self, kind: TokenKind) -> bool {
        self.contains(Self::of(kind))
    }

    /// Build a set from an engine-style `valid_symbols` array indexed by
    /// [`TokenKind::index`]. Extra trailing entries are ignored.
    pub fn from_valid_symbols(valid: &[bool]) -> Self {
        TokenKind::ALL
            .iter()
            .filter(|kind| valid.get(kind.index()).copied().unwrap_or(false))
            .fold(Self::empty(), |set, &kind| set | Self::of(kind))
    }

    /// Iterate the kinds in the set, in `externals` order.
    pub fn kinds(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |&kind| self.accepts(kind))
    }
}

impl From<TokenKind> for TokenSet {
    fn from(kind: TokenKind) -> Self {
        Self::of(kind)
    }
}

/// A token produced by the scanner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScannedToken {
    pub kind: TokenKind,
    /// Source range the token covers. Empty for inserted layout tokens.
    pub span: Span,
    /// Verbatim body of a raw string, between the delimiters.
    pub content: Option<Span>,
}

impl ScannedToken {
    /// A zero-width token inserted by the layout rule at `offset`.
    pub const fn synthetic(kind: TokenKind, offset: u32) -> Self {
        ScannedToken {
            kind,
            span: Span::point(offset),
            content: None,
        }
    }

    /// A token that covers source text.
    pub const fn literal(kind: TokenKind, span: Span) -> Self {
        ScannedToken {
            kind,
            span,
            content: None,
        }
    }

    /// `true` for tokens the layout rule inserted rather than read from source.
    #[inline]
    pub const fn is_synthetic(&self) -> bool {
        self.span.is_empty()
    }
}
