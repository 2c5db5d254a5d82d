use koka_lexer_core::Span;
use pretty_assertions::assert_eq;

use super::*;
use crate::token::TokenKind;

fn render(source: &str, lexemes: &[Lexeme]) -> Vec<String> {
    lexemes
        .iter()
        .map(|lexeme| match (lexeme.kind, lexeme.is_synthetic()) {
            (LexemeKind::External(TokenKind::OpenBrace), true) => "<{>".to_owned(),
            (LexemeKind::External(TokenKind::CloseBrace), true) => "<}>".to_owned(),
            (LexemeKind::External(TokenKind::Semicolon), true) => "<;>".to_owned(),
            (LexemeKind::External(TokenKind::EndContinuationSignal), _) => "<ecs>".to_owned(),
            _ => lexeme.text(source).to_owned(),
        })
        .collect()
}

fn koka(source: &str) -> Vec<String> {
    let lexemes = tokenize(source, ScannerConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    render(source, &lexemes)
}

fn words(expected: &str) -> Vec<String> {
    expected.split_whitespace().map(str::to_owned).collect()
}

// === Statements ===

#[test]
fn module_statements_at_one_column() {
    assert_eq!(
        koka("module m\nval x = 1\nval y = 2"),
        words("module m <;> val x = 1 <;> val y = 2 <;>")
    );
}

#[test]
fn module_statement_continued_by_indentation() {
    assert_eq!(
        koka("module m\nval x = 1\n  val y = 2"),
        words("module m <;> val x = 1 val y = 2 <;>")
    );
}

// === Blocks ===

#[test]
fn function_body_by_indentation() {
    let source = "fun main()\n  val x = 1\n  println(x)\n";
    assert_eq!(
        koka(source),
        words("fun main ( ) <{> val x = 1 <;> println ( x ) <;> <}> <;>")
    );
}

#[test]
fn function_with_result_type() {
    let source = "fun answer() : int\n  42\n";
    assert_eq!(
        koka(source),
        words("fun answer ( ) : int <{> 42 <;> <}> <;>")
    );
}

#[test]
fn match_branches() {
    let source = "fun f(x)\n  match x\n    Just(y) -> y\n    Nothing -> 0\n";
    assert_eq!(
        koka(source),
        words(
            "fun f ( x ) <{> match x <{> Just ( y ) -> y <;> Nothing -> 0 \
             <;> <}> <;> <}> <;>"
        )
    );
}

#[test]
fn if_then_else_blocks() {
    let source = "val r = if c then\n    a\n  else\n    b\n";
    assert_eq!(
        koka(source),
        words("val r = if c then <{> a <;> <}> else <{> b <;> <}> <;>")
    );
}

#[test]
fn explicit_braces_on_one_line() {
    assert_eq!(
        koka("fun f() { if x then y }"),
        words("fun f ( ) { if x then y <;> } <;>")
    );
}

#[test]
fn layout_inside_braces_when_enabled() {
    let source = "fun f() {\n  a\n  b\n}";
    let config = ScannerConfig::default().with_layout_in_braces(true);
    let lexemes = tokenize(source, config).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        render(source, &lexemes),
        words("fun f ( ) { a <;> b <;> } <;>")
    );
    assert_eq!(koka(source), words("fun f ( ) { a b <;> } <;>"));
}

// === Continuation ===

#[test]
fn trailing_operator_signals_continuation() {
    assert_eq!(
        koka("val x = a +\n  b\nval y = 2"),
        words("val x = a + <ecs> b <;> val y = 2 <;>")
    );
}

#[test]
fn argument_list_over_lines() {
    assert_eq!(
        koka("foo(a,\n    b)\nbar"),
        words("foo ( a , <ecs> b ) <;> bar <;>")
    );
}

#[test]
fn leading_operator_continues() {
    assert_eq!(
        koka("val x = a\n  |> f\n  |> g"),
        words("val x = a |> f |> g <;>")
    );
}

// === Literals and trivia ===

#[test]
fn raw_string_is_one_lexeme() {
    let source = r##"val s = r#"x "y" z"#
val t = 1"##;
    let lexemes = tokenize(source, ScannerConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    let raw = r##"r#"x "y" z"#"##;
    assert_eq!(
        render(source, &lexemes),
        vec!["val", "s", "=", raw, "<;>", "val", "t", "=", "1", "<;>"]
    );
    assert_eq!(
        lexemes[3].kind,
        LexemeKind::External(TokenKind::RawString)
    );
}

#[test]
fn grammar_tokens_are_classified() {
    let source = "f(\"s\", 'c', 1.5, x-y')";
    let lexemes = tokenize(source, ScannerConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    let kinds: Vec<LexemeKind> = lexemes.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LexemeKind::Ident,
            LexemeKind::Punct,
            LexemeKind::String,
            LexemeKind::Punct,
            LexemeKind::Char,
            LexemeKind::Punct,
            LexemeKind::Number,
            LexemeKind::Punct,
            LexemeKind::Ident,
            LexemeKind::Punct,
            LexemeKind::External(TokenKind::Semicolon),
        ]
    );
    assert_eq!(lexemes[8].text(source), "x-y'");
}

#[test]
fn comments_are_trivia() {
    assert_eq!(
        koka("a // note\n/* block /* nested */ */\nb"),
        words("a <;> b <;>")
    );
}

#[test]
fn byte_order_mark_is_skipped() {
    let source = "\u{feff}a\nb";
    let lexemes = tokenize(source, ScannerConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(render(source, &lexemes), words("a <;> b <;>"));
    assert_eq!(lexemes[0].span, Span::new(3, 4));
}

#[test]
fn unterminated_raw_string_stops_tokenizing() {
    let result = tokenize("val s = r#\"open", ScannerConfig::default());
    assert!(matches!(
        result,
        Err(LexicalError::UnterminatedRawString { fence: 1, .. })
    ));
}

// === Batch ===

#[test]
fn parallel_batch_matches_sequential() {
    let sources: Vec<String> = (0..16)
        .map(|i| format!("fun f{i}()\n  val x = {i}\n  x + 1\n"))
        .collect();
    let config = ScannerConfig::default();
    let batch = tokenize_all(&sources, config);
    assert_eq!(batch.len(), sources.len());
    for (source, result) in sources.iter().zip(batch) {
        assert_eq!(result, tokenize(source, config));
    }
}

// === Custom grammars ===

/// Accepts only terminators, so no block ever opens by indentation.
struct Flat;

impl Grammar for Flat {
    fn observe(&mut self, _source: &str, _lexeme: &Lexeme) {}

    fn accepts(&self, _upcoming: u8) -> TokenSet {
        TokenSet::SEMICOLON | TokenSet::CLOSE_BRACE
    }
}

#[test]
fn custom_grammar_controls_acceptance() {
    let source = "a =\n  b\nc";
    let lexemes = tokenize_with(source, ScannerConfig::default(), Flat)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(render(source, &lexemes), words("a = b <;> c <;>"));
}

// === Checkpoints ===

#[test]
fn rewinding_replays_the_same_lexemes() {
    let source = "fun f()\n  val x = 1\n  x\nval y = 2\n";
    let mut stream = TokenStream::new(source, ScannerConfig::default(), KokaGrammar::default());
    let head: Vec<Lexeme> = stream.by_ref().take(6).map(|l| l.unwrap_or_else(|e| panic!("{e}"))).collect();
    assert_eq!(head.len(), 6);
    let checkpoint = stream.checkpoint();
    let first: Vec<Lexeme> = stream.by_ref().map(|l| l.unwrap_or_else(|e| panic!("{e}"))).collect();
    stream.rewind(checkpoint);
    let second: Vec<Lexeme> = stream.map(|l| l.unwrap_or_else(|e| panic!("{e}"))).collect();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn stream_ends_after_an_error() {
    let mut stream = TokenStream::new("r\"open", ScannerConfig::default(), KokaGrammar::default());
    assert!(matches!(stream.next(), Some(Err(_))));
    assert!(stream.next().is_none());
}
