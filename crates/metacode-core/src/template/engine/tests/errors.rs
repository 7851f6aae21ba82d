//! Error handling tests for template engine

use super::helpers::{cat_breeds, single_color};
use super::*;

#[test]
fn test_error_unclosed_loop() {
    let table = cat_breeds();
    let env = Environment::new().with_table("t", &table);
    let result = render("a\n{{#for r of t}}{{r.k}}", &env);
    match result {
        Err(TemplateError::MalformedTemplate {
            directive,
            line,
            column,
            message,
        }) => {
            assert_eq!(directive, "#for r of t");
            assert_eq!((line, column), (2, 1));
            assert!(message.contains("unclosed loop"));
        }
        other => panic!("Expected MalformedTemplate error, got {:?}", other),
    }
}

#[test]
fn test_error_unclosed_loop_is_a_parse_error() {
    // No environment is needed to reject the template
    assert!(matches!(
        parse_template("{{#for r of t}}"),
        Err(TemplateError::MalformedTemplate { .. })
    ));
}

#[test]
fn test_error_innermost_unclosed_loop_reported() {
    let result = parse_template("{{#for a of t}}{{/for}}{{#for b of u}}{{#for c of v}}{{/for}}");
    match result {
        Err(TemplateError::MalformedTemplate { directive, .. }) => {
            assert_eq!(directive, "#for b of u");
        }
        other => panic!("Expected MalformedTemplate error, got {:?}", other),
    }
}

#[test]
fn test_error_stray_loop_end() {
    let result = parse_template("x{{/for}}");
    match result {
        Err(TemplateError::MalformedTemplate { message, column, .. }) => {
            assert!(message.contains("without matching"));
            assert_eq!(column, 2);
        }
        other => panic!("Expected MalformedTemplate error, got {:?}", other),
    }
}

#[test]
fn test_error_unknown_block_end() {
    assert!(matches!(
        parse_template("{{#for r of t}}{{/each}}"),
        Err(TemplateError::MalformedTemplate { .. })
    ));
}

#[test]
fn test_error_unclosed_placeholder() {
    let result = parse_template("ok\nValue: {{title");
    match result {
        Err(TemplateError::MalformedTemplate { line, column, .. }) => {
            assert_eq!((line, column), (2, 8));
        }
        other => panic!("Expected MalformedTemplate error, got {:?}", other),
    }
}

#[test]
fn test_error_unclosed_placeholder_after_escaped_opener() {
    for (source, expected) in [(r"a \{{ b {{c", (1, 9)), ("\\{{ x\n  {{y", (2, 3))] {
        match parse_template(source) {
            Err(TemplateError::MalformedTemplate { line, column, .. }) => {
                assert_eq!((line, column), expected, "{}", source);
            }
            other => panic!("Expected MalformedTemplate error, got {:?}", other),
        }
    }
}

#[test]
fn test_error_invalid_directives() {
    for source in [
        "{{}}",
        "{{a b}}",
        "{{a.b.c}}",
        "{{#}}",
        "{{#for}}{{/for}}",
        "{{#for r t}}{{/for}}",
        "{{#for r, r of t}}{{/for}}",
        "{{#for r-x of t}}{{/for}}",
    ] {
        assert!(
            matches!(
                parse_template(source),
                Err(TemplateError::MalformedTemplate { .. })
            ),
            "{} should be rejected",
            source
        );
    }
}

#[test]
fn test_error_unbound_reference_produces_no_output() {
    let table = cat_breeds();
    let env = Environment::new().with_table("t", &table);
    let result = render("{{#for r of t}}{{r.k}}{{/for}}\n{{missing}}", &env);
    match result {
        Err(TemplateError::UnboundReference {
            name,
            directive,
            line,
            column,
        }) => {
            assert_eq!(name, "missing");
            assert_eq!(directive, "missing");
            assert_eq!((line, column), (2, 1));
        }
        other => panic!("Expected UnboundReference error, got {:?}", other),
    }
}

#[test]
fn test_error_unbound_loop_table() {
    let env = Environment::new();
    assert!(matches!(
        render("{{#for r of nowhere}}{{/for}}", &env),
        Err(TemplateError::UnboundReference { name, .. }) if name == "nowhere"
    ));
}

#[test]
fn test_error_field_not_found() {
    let table = single_color();
    let env = Environment::new().with_table("t", &table);
    let result = render("{{#for r of t}}{{r.rgb}}{{/for}}", &env);
    match result {
        Err(TemplateError::FieldNotFound { name, field, .. }) => {
            assert_eq!(name, "r");
            assert_eq!(field, "rgb");
        }
        other => panic!("Expected FieldNotFound error, got {:?}", other),
    }
}

#[test]
fn test_error_row_in_scalar_position() {
    let table = single_color();
    let env = Environment::new().with_table("t", &table);
    let result = render("{{#for r of t}}{{r}}{{/for}}", &env);
    match result {
        Err(TemplateError::TypeMismatch {
            name,
            expected,
            found,
            ..
        }) => {
            assert_eq!(name, "r");
            assert_eq!(expected, "text");
            assert_eq!(found, "row");
        }
        other => panic!("Expected TypeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_error_loop_over_text() {
    let env = Environment::new().with_text("t", "not a table");
    assert!(matches!(
        render("{{#for r of t}}{{/for}}", &env),
        Err(TemplateError::TypeMismatch { expected: "table", found: "text", .. })
    ));
}

#[test]
fn test_error_count_of_text() {
    let env = Environment::new().with_text("t", "x");
    assert!(matches!(
        render("{{#t}}", &env),
        Err(TemplateError::TypeMismatch { expected: "table", .. })
    ));
}

#[test]
fn test_error_field_of_text() {
    let env = Environment::new().with_text("name", "x");
    assert!(matches!(
        render("{{name.k}}", &env),
        Err(TemplateError::TypeMismatch { expected: "row", found: "text", .. })
    ));
}

#[test]
fn test_error_arity_mismatch() {
    let mac = Macro::parse("ENUM", vec!["name".to_string(), "t".to_string()], "").unwrap();
    let result = mac.bind(vec![Binding::Text("X".to_string())]);
    match result {
        Err(TemplateError::ArityMismatch {
            name,
            expected,
            found,
        }) => {
            assert_eq!(name, "ENUM");
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("Expected ArityMismatch error, got {:?}", other),
    }
}

#[test]
fn test_error_missing_argument() {
    let mac = Macro::parse("M", vec!["name".to_string()], "static text").unwrap();
    let result = expand(&mac, &Environment::new());
    match result {
        Err(TemplateError::MissingArgument { name, param }) => {
            assert_eq!(name, "M");
            assert_eq!(param, "name");
        }
        other => panic!("Expected MissingArgument error, got {:?}", other),
    }
}

#[test]
fn test_error_relocate_shifts_position() {
    let err = parse_template("\n  {{#for r of t}}").unwrap_err().relocate(10, 5);
    assert_eq!(err.line(), Some(12));
    match err {
        TemplateError::MalformedTemplate { column, .. } => assert_eq!(column, 8),
        other => panic!("Expected MalformedTemplate error, got {:?}", other),
    }
}

#[test]
fn test_error_display_has_code_prefix() {
    let env = Environment::new();
    let err = render("{{x}}", &env).unwrap_err();
    assert!(err.to_string().starts_with("UNBOUND_REFERENCE:"));
}
