//! Line classification for source files carrying `#metacode` comments

use crate::config::SyntaxConfig;

/// A source line with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'s> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the line terminator
    pub end: usize,
    /// Line content without terminator
    pub content: &'s str,
    /// `"\n"`, `"\r\n"`, or `""` on an unterminated last line
    pub ending: &'s str,
}

/// Split text into lines, keeping byte offsets and terminators
pub(crate) fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    source
        .split_inclusive('\n')
        .enumerate()
        .map(|(i, raw)| {
            let content = raw
                .strip_suffix("\r\n")
                .or_else(|| raw.strip_suffix('\n'))
                .unwrap_or(raw);
            let line = Line {
                number: i + 1,
                start,
                end: start + raw.len(),
                content,
                ending: &raw[content.len()..],
            };
            start += raw.len();
            line
        })
        .collect()
}

/// Marker directives: `<prefix> #keyword ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker<'s> {
    Metacode,
    Macro(&'s str),
    Table(&'s str),
    Metagen,
    Metaend,
}

/// What a line means to the document parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'s> {
    /// Not a comment line
    Code,
    /// `<prefix> #keyword`
    Marker(Marker<'s>),
    /// Comment with nothing but whitespace
    Blank,
    /// Comment indented as a macro/table body line; indentation stripped
    Body(&'s str),
    /// Any other comment text, trimmed
    Text(&'s str),
}

/// Classifies lines according to the configured comment syntax
#[derive(Debug, Clone)]
pub(crate) struct Classifier {
    prefix: String,
    body_indent: String,
}

impl Classifier {
    pub fn new(syntax: &SyntaxConfig) -> Self {
        Self {
            prefix: syntax.comment_prefix.clone(),
            // One separating space, then the body indentation
            body_indent: " ".repeat(syntax.indent + 1),
        }
    }

    /// Width of the prefix stripped from body lines, in characters
    pub fn body_column_offset(&self) -> usize {
        self.prefix.chars().count() + self.body_indent.len()
    }

    pub fn classify<'s>(&self, content: &'s str) -> LineKind<'s> {
        let Some(rest) = content.strip_prefix(self.prefix.as_str()) else {
            return LineKind::Code;
        };
        if rest.trim().is_empty() {
            return LineKind::Blank;
        }
        if let Some(directive) = rest.strip_prefix(" #") {
            if let Some(marker) = parse_marker(directive.trim_end()) {
                return LineKind::Marker(marker);
            }
        }
        if let Some(body) = rest.strip_prefix(self.body_indent.as_str()) {
            return LineKind::Body(body);
        }
        LineKind::Text(rest.trim())
    }
}

fn parse_marker(directive: &str) -> Option<Marker<'_>> {
    let (keyword, rest) = match directive.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (directive, ""),
    };
    match keyword {
        "metacode" if rest.is_empty() => Some(Marker::Metacode),
        "metagen" if rest.is_empty() => Some(Marker::Metagen),
        "metaend" if rest.is_empty() => Some(Marker::Metaend),
        "macro" => Some(Marker::Macro(rest)),
        "table" => Some(Marker::Table(rest)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&SyntaxConfig::default())
    }

    #[test]
    fn test_split_lines_keeps_offsets_and_endings() {
        let lines = split_lines("a\r\nbc\nd");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].content, "a");
        assert_eq!(lines[0].ending, "\r\n");
        assert_eq!(lines[1].start, 3);
        assert_eq!(lines[1].end, 6);
        assert_eq!(lines[2].content, "d");
        assert_eq!(lines[2].ending, "");
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn test_classify_markers() {
        let c = classifier();
        assert_eq!(c.classify("// #metacode"), LineKind::Marker(Marker::Metacode));
        assert_eq!(c.classify("// #metagen  "), LineKind::Marker(Marker::Metagen));
        assert_eq!(
            c.classify("// #macro ENUM(name,t)"),
            LineKind::Marker(Marker::Macro("ENUM(name,t)"))
        );
        assert_eq!(
            c.classify("// #table T_CAT_BREEDS"),
            LineKind::Marker(Marker::Table("T_CAT_BREEDS"))
        );
    }

    #[test]
    fn test_classify_body_blank_text_code() {
        let c = classifier();
        assert_eq!(c.classify("//     {{~/for~}}"), LineKind::Body("  {{~/for~}}"));
        assert_eq!(c.classify("//   #include <x.h>"), LineKind::Body("#include <x.h>"));
        assert_eq!(c.classify("//"), LineKind::Blank);
        assert_eq!(c.classify("//   "), LineKind::Blank);
        assert_eq!(
            c.classify("// ENUM(CatBreed, T)"),
            LineKind::Text("ENUM(CatBreed, T)")
        );
        assert_eq!(c.classify("typedef enum {"), LineKind::Code);
        assert_eq!(c.classify("  // indented comment"), LineKind::Code);
    }

    #[test]
    fn test_unknown_keyword_is_text() {
        assert_eq!(classifier().classify("// #pragma once"), LineKind::Text("#pragma once"));
    }

    #[test]
    fn test_custom_prefix() {
        let syntax = SyntaxConfig {
            comment_prefix: "#".to_string(),
            indent: 4,
        };
        let c = Classifier::new(&syntax);
        assert_eq!(c.classify("# #metacode"), LineKind::Marker(Marker::Metacode));
        assert_eq!(c.classify("#     x"), LineKind::Body("x"));
        assert_eq!(c.body_column_offset(), 6);
    }
}
