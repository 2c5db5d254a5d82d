use koka_lexer_core::{Position, SourceBuffer, Span};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn scan(source: &str) -> (Result<Option<RawString>, LexicalError>, u32) {
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let result = scan_raw_string(&mut cursor, 8);
    (result, cursor.pos())
}

fn body<'a>(source: &'a str, raw: &RawString) -> &'a str {
    &source[raw.content.to_range()]
}

#[test]
fn unfenced_raw_string() {
    let source = r#"r"a\nb" rest"#;
    let (result, pos) = scan(source);
    let raw = result.ok().flatten().unwrap_or_else(|| panic!("no literal"));
    assert_eq!(raw.fence, 0);
    assert_eq!(raw.span, Span::new(0, 7));
    assert_eq!(body(source, &raw), r"a\nb");
    assert_eq!(pos, 7);
}

#[test]
fn fenced_body_keeps_quotes() {
    let source = r##"r#"say "hi""#"##;
    let (result, _) = scan(source);
    let raw = result.ok().flatten().unwrap_or_else(|| panic!("no literal"));
    assert_eq!(raw.fence, 1);
    assert_eq!(body(source, &raw), r#"say "hi""#);
    assert_eq!(raw.span.end as usize, source.len());
}

#[test]
fn ends_at_first_qualifying_fence() {
    // `"##` closes a two-hash literal; the rest is left for the next token.
    let source = r###"r##"a"#b"##c"##"###;
    let (result, pos) = scan(source);
    let raw = result.ok().flatten().unwrap_or_else(|| panic!("no literal"));
    assert_eq!(body(source, &raw), r##"a"#b"##);
    assert_eq!(&source[pos as usize..], r###"c"##"###);
}

#[test]
fn longer_closing_run_consumes_only_the_fence() {
    let source = r####"r#"x"###"####;
    let (result, pos) = scan(source);
    let raw = result.ok().flatten().unwrap_or_else(|| panic!("no literal"));
    assert_eq!(body(source, &raw), "x");
    assert_eq!(&source[pos as usize..], "##");
}

#[test]
fn spans_lines() {
    let source = "r\"line one\nline two\"";
    let (result, _) = scan(source);
    let raw = result.ok().flatten().unwrap_or_else(|| panic!("no literal"));
    assert_eq!(body(source, &raw), "line one\nline two");
}

#[test]
fn identifiers_are_not_openers() {
    for source in ["r", "rest", "r#x", "r# \"x\"", "x\"\""] {
        let (result, pos) = scan(source);
        assert_eq!(result, Ok(None), "{source:?}");
        assert_eq!(pos, 0);
    }
}

#[test]
fn unterminated_reports_start() {
    let source = "r##\"never closed\"#";
    let (result, pos) = scan(source);
    assert_eq!(
        result,
        Err(LexicalError::UnterminatedRawString {
            start: Position {
                offset: 0,
                line: 0,
                column: 0
            },
            fence: 2,
        })
    );
    assert_eq!(pos as usize, source.len());
}

#[test]
fn unterminated_position_is_line_and_column() {
    let buf = SourceBuffer::new("val s =\n    r\"open");
    let mut cursor = buf.cursor_at(12);
    let err = scan_raw_string(&mut cursor, 8);
    assert_eq!(
        err,
        Err(LexicalError::UnterminatedRawString {
            start: Position {
                offset: 12,
                line: 1,
                column: 4
            },
            fence: 0,
        })
    );
}

proptest! {
    #[test]
    fn embedded_shorter_run_stays_in_body(fence in 1u32..12, prefix in "[a-z ]{0,8}", suffix in "[a-z ]{0,8}") {
        let hashes = "#".repeat(fence as usize);
        let short = "#".repeat(fence as usize - 1);
        let content = format!("{prefix}\"{short}{suffix}");
        let source = format!("r{hashes}\"{content}\"{hashes} tail");
        let (result, pos) = scan(&source);
        let raw = result.ok().flatten();
        prop_assert!(raw.is_some());
        let raw = raw.unwrap_or_else(|| unreachable!());
        prop_assert_eq!(raw.fence, fence);
        prop_assert_eq!(body(&source, &raw), content.as_str());
        prop_assert_eq!(&source[pos as usize..], " tail");
    }

    #[test]
    fn full_run_ends_the_literal(fence in 1u32..12, extra in 0usize..3) {
        let hashes = "#".repeat(fence as usize);
        let closing = "#".repeat(fence as usize + extra);
        let source = format!("r{hashes}\"ab\"{closing}cd\"{hashes}");
        let (result, pos) = scan(&source);
        let raw = result.ok().flatten();
        prop_assert!(raw.is_some());
        let raw = raw.unwrap_or_else(|| unreachable!());
        prop_assert_eq!(body(&source, &raw), "ab");
        let rest = format!("{}cd\"{hashes}", "#".repeat(extra));
        prop_assert_eq!(&source[pos as usize..], rest.as_str());
    }
}
