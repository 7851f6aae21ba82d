//! Basic rendering tests for template engine

use super::helpers::{cat_breeds, empty_table};
use super::*;

#[test]
fn test_render_plain_text_unchanged() {
    let env = Environment::new();
    let source = "int x = 0; /* { not a directive } */\n";
    assert_eq!(render(source, &env).unwrap(), source);
}

#[test]
fn test_render_text_argument() {
    let env = Environment::new().with_text("name", "CatBreed");
    assert_eq!(
        render("typedef enum {{name}} {{name}};", &env).unwrap(),
        "typedef enum CatBreed CatBreed;"
    );
}

#[test]
fn test_render_spaces_inside_braces() {
    let env = Environment::new().with_text("name", "X");
    assert_eq!(render("[{{ name }}]", &env).unwrap(), "[X]");
}

#[test]
fn test_render_argument_text_is_not_reexpanded() {
    let env = Environment::new().with_text("name", "{{other}}");
    assert_eq!(render("{{name}}", &env).unwrap(), "{{other}}");
}

#[test]
fn test_render_row_count() {
    let table = cat_breeds();
    let env = Environment::new().with_table("t", &table);
    assert_eq!(
        render("char* S[{{#t}}];", &env).unwrap(),
        "char* S[4];"
    );
}

#[test]
fn test_render_row_count_of_empty_table() {
    let table = empty_table();
    let env = Environment::new().with_table("t", &table);
    assert_eq!(render("{{#t}}", &env).unwrap(), "0");
}

#[test]
fn test_render_table_substitutes_its_name() {
    let table = cat_breeds();
    let env = Environment::new().with_table("t", &table);
    assert_eq!(render("{{t}}", &env).unwrap(), "T_CAT_BREEDS");
}

#[test]
fn test_render_multiline_preserves_line_endings() {
    let env = Environment::new().with_text("n", "A");
    assert_eq!(render("a\r\n{{n}}\r\nb", &env).unwrap(), "a\r\nA\r\nb");
}

#[test]
fn test_expand_binds_positional_arguments() {
    let table = cat_breeds();
    let mac = Macro::parse(
        "COUNT",
        vec!["name".to_string(), "t".to_string()],
        "#define {{name}}_COUNT {{#t}}",
    )
    .unwrap();
    let env = mac
        .bind(vec![Binding::Text("CatBreed".to_string()), Binding::Table(&table)])
        .unwrap();
    assert_eq!(expand(&mac, &env).unwrap(), "#define CatBreed_COUNT 4");
}

#[test]
fn test_expand_is_deterministic() {
    let table = cat_breeds();
    let mac = Macro::parse("M", vec!["t".to_string()], "{{#for r of t}}{{r.k}} {{/for}}").unwrap();
    let env = Environment::new().with_table("t", &table);
    let engine = TemplateEngine::new();
    let first = engine.expand(&mac, &env).unwrap();
    let second = engine.expand(&mac, &env).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "Persian MaineCoon Siamese Bengal ");
}

#[test]
fn test_engine_shared_across_threads() {
    let table = cat_breeds();
    let mac = Macro::parse("M", vec!["t".to_string()], "{{#t}}").unwrap();
    let engine = TemplateEngine::new();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let env = Environment::new().with_table("t", &table);
                    engine.expand(&mac, &env).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "4");
        }
    });
}
