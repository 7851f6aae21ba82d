//! TokenStream tests

use super::tokenize::{TokenKind, TokenStream, Unclosed};

#[test]
fn test_placeholder_token_position() {
    let tokens: Vec<_> = TokenStream::new("Hello {{name}}!").collect();
    assert_eq!(tokens.len(), 1);
    let token = &tokens[0];
    assert_eq!(
        token.kind,
        TokenKind::Placeholder {
            expr: "name".to_string()
        }
    );
    assert_eq!(token.start, 6);
    assert_eq!(token.length, 8);
    assert_eq!(token.end(), 14);
    assert_eq!((token.line, token.column), (1, 7));
}

#[test]
fn test_classifies_directives() {
    let kinds: Vec<_> = TokenStream::new("{{r.k}}{{#t}}{{#for r of t}}{{/for}}")
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Placeholder {
                expr: "r.k".to_string()
            },
            TokenKind::Count {
                name: "t".to_string()
            },
            TokenKind::BlockStart {
                keyword: "for".to_string(),
                args: "r of t".to_string()
            },
            TokenKind::BlockEnd {
                keyword: "for".to_string()
            },
        ]
    );
}

#[test]
fn test_count_of_table_named_like_keyword() {
    // `#format` is a row count, not a loop
    let tokens: Vec<_> = TokenStream::new("{{#format}}").collect();
    assert_eq!(
        tokens[0].kind,
        TokenKind::Count {
            name: "format".to_string()
        }
    );
}

#[test]
fn test_trim_markers() {
    let tokens: Vec<_> = TokenStream::new("{{~#for t~}}{{~ x }}{{y ~}}").collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens[0].trim_left && tokens[0].trim_right);
    assert_eq!(tokens[0].content, "#for t");
    assert!(tokens[1].trim_left && !tokens[1].trim_right);
    assert_eq!(tokens[1].content, "x");
    assert!(!tokens[2].trim_left && tokens[2].trim_right);
}

#[test]
fn test_backslash_count() {
    let tokens: Vec<_> = TokenStream::new(r"\{{a}} \\{{b}}").collect();
    assert_eq!(tokens[0].backslash_count, 1);
    assert!(tokens[0].is_escaped());
    assert_eq!(tokens[1].backslash_count, 2);
    assert!(!tokens[1].is_escaped());
}

#[test]
fn test_line_and_column_tracking() {
    let source = "first\n  second {{a}}\nthird\n\n{{b}}";
    let positions: Vec<_> = TokenStream::new(source)
        .map(|t| (t.line, t.column))
        .collect();
    assert_eq!(positions, vec![(2, 10), (5, 1)]);
}

#[test]
fn test_column_counts_characters() {
    let tokens: Vec<_> = TokenStream::new("äöü {{x}}").collect();
    assert_eq!(tokens[0].column, 5);
}

#[test]
fn test_single_braces_are_text() {
    assert_eq!(TokenStream::new("a { b } c {x}").count(), 0);
}

#[test]
fn test_single_rbrace_inside_token() {
    let tokens: Vec<_> = TokenStream::new("{{a}b}}").collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].content, "a}b");
}

#[test]
fn test_unterminated_is_reported_after_exhaustion() {
    let mut stream = TokenStream::new("ok {{a}}\n  {{b");
    assert_eq!(stream.by_ref().count(), 1);
    assert_eq!(
        stream.unterminated(),
        Some(Unclosed {
            start: 11,
            line: 2,
            column: 3,
            backslash_count: 0,
        })
    );
}

#[test]
fn test_unterminated_escaped_opener() {
    let mut stream = TokenStream::new(r"a \\\{{ b");
    assert_eq!(stream.by_ref().count(), 0);
    let open = stream.unterminated().unwrap();
    assert_eq!((open.start, open.backslash_count), (5, 3));
    assert!(open.is_escaped());
}

#[test]
fn test_terminated_stream_has_no_unterminated() {
    let mut stream = TokenStream::new("{{a}} {");
    assert_eq!(stream.by_ref().count(), 1);
    assert_eq!(stream.unterminated(), None);
}
