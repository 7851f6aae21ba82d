//! Template parsing: tokens → flat pieces → segment tree

use super::blocks::build_segments;
use super::tokenize::{Token, TokenKind, TokenStream, Unclosed};
use super::trim::normalize_whitespace;
use crate::template::error::TemplateError;

/// Where a directive appeared in the template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Directive text between the markers
    pub directive: String,
    /// 1-based line of the opening `{{`
    pub line: usize,
    /// 1-based column of the opening `{{`
    pub column: usize,
}

impl Site {
    pub(crate) fn malformed(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::MalformedTemplate {
            message: message.into(),
            directive: self.directive.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

/// Scalar expression: `name` or `name.field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Field { var: String, field: String },
}

/// A parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, appended verbatim
    Text(String),
    /// `{{name}}` / `{{name.field}}`
    Subst { expr: Expr, site: Site },
    /// `{{#name}}`: row count of a table
    Count { table: String, site: Site },
    /// `{{#for [index,]item of table}} ... {{/for}}`
    Loop {
        index: Option<String>,
        item: Option<String>,
        table: String,
        body: Vec<Segment>,
        site: Site,
    },
}

/// Parsed template: an ordered sequence of segments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse template source text
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        parse_template(source)
    }

    /// Top-level segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Directive after validation, before loop nesting
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive {
    Subst(Expr),
    Count(String),
    LoopStart {
        index: Option<String>,
        item: Option<String>,
        table: String,
    },
    LoopEnd,
}

/// A directive occurrence with its trim flags
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tag {
    pub directive: Directive,
    pub trim_left: bool,
    pub trim_right: bool,
    pub site: Site,
}

/// Flat template element, before loops are nested
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    Text(String),
    Tag(Tag),
}

/// Parse template source into a [`Template`]
///
/// # Errors
///
/// `MalformedTemplate` on unclosed `{{`, unknown directive syntax, or
/// unbalanced `{{#for}}` / `{{/for}}`.
pub fn parse_template(source: &str) -> Result<Template, TemplateError> {
    let pieces = lex(source)?;
    let pieces = normalize_whitespace(pieces);
    build_segments(pieces)
}

/// Split source into text and directive pieces
pub(crate) fn lex(source: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut cursor = 0;
    let mut tokens = TokenStream::new(source);

    for token in tokens.by_ref() {
        let text_end = token.start - token.backslash_count;
        push_text(&mut pieces, &source[cursor..text_end]);

        // Half of the backslashes survive as literal backslashes
        let backslashes = "\\".repeat(token.backslash_count / 2);
        push_text(&mut pieces, &backslashes);

        if token.is_escaped() {
            push_text(&mut pieces, &source[token.start..token.end()]);
        } else {
            pieces.push(Piece::Tag(tag_from_token(&token)?));
        }
        cursor = token.end();
    }

    // An escaped opener is text; scanning resumes after it, and no `}}`
    // remains, so the rest can only hold further unclosed openers
    let mut pending = tokens.unterminated();
    while let Some(open) = pending {
        if !open.is_escaped() {
            return Err(TemplateError::MalformedTemplate {
                message: "unclosed '{{' (missing '}}')".to_string(),
                directive: source[open.start..].lines().next().unwrap_or("").to_string(),
                line: open.line,
                column: open.column,
            });
        }
        push_text(&mut pieces, &source[cursor..open.start - open.backslash_count]);
        push_text(&mut pieces, &"\\".repeat(open.backslash_count / 2));
        push_text(&mut pieces, "{{");
        cursor = open.start + 2;

        let mut rest = TokenStream::new(&source[cursor..]);
        rest.by_ref().for_each(drop);
        pending = rest.unterminated().map(|inner| Unclosed {
            start: cursor + inner.start,
            line: open.line + inner.line - 1,
            column: if inner.line == 1 {
                open.column + 1 + inner.column
            } else {
                inner.column
            },
            backslash_count: inner.backslash_count,
        });
    }

    push_text(&mut pieces, &source[cursor..]);
    Ok(pieces)
}

/// Append text, merging with a preceding text piece
fn push_text(pieces: &mut Vec<Piece>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Piece::Text(last)) = pieces.last_mut() {
        last.push_str(text);
    } else {
        pieces.push(Piece::Text(text.to_string()));
    }
}

fn tag_from_token(token: &Token) -> Result<Tag, TemplateError> {
    let site = Site {
        directive: token.content.clone(),
        line: token.line,
        column: token.column,
    };
    let directive = match &token.kind {
        TokenKind::Placeholder { expr } => Directive::Subst(parse_expr(expr, &site)?),
        TokenKind::Count { name } => Directive::Count(expect_ident(name, &site)?),
        TokenKind::BlockStart { args, .. } => parse_loop_head(args, &site)?,
        TokenKind::BlockEnd { keyword } if keyword == "for" => Directive::LoopEnd,
        TokenKind::BlockEnd { keyword } => {
            return Err(site.malformed(format!("unknown block end '/{}'", keyword)));
        }
    };
    Ok(Tag {
        directive,
        trim_left: token.trim_left,
        trim_right: token.trim_right,
        site,
    })
}

/// Identifiers are `[A-Za-z0-9_]+`
pub(crate) fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn expect_ident(s: &str, site: &Site) -> Result<String, TemplateError> {
    if is_ident(s) {
        Ok(s.to_string())
    } else if s.is_empty() {
        Err(site.malformed("empty directive"))
    } else {
        Err(site.malformed(format!("unknown directive '{}'", s)))
    }
}

/// Parse `name` or `name.field`
fn parse_expr(expr: &str, site: &Site) -> Result<Expr, TemplateError> {
    match expr.split_once('.') {
        Some((var, field)) if is_ident(var) && is_ident(field) => Ok(Expr::Field {
            var: var.to_string(),
            field: field.to_string(),
        }),
        Some(_) => Err(site.malformed(format!("unknown directive '{}'", expr))),
        None => Ok(Expr::Var(expect_ident(expr, site)?)),
    }
}

/// Parse the arguments of `#for`
///
/// Accepted forms:
/// - `item of table`
/// - `index, item of table`
/// - `index in table`
/// - `table` (binds each row to `this`)
fn parse_loop_head(args: &str, site: &Site) -> Result<Directive, TemplateError> {
    let spaced = args.replace(',', " , ");
    let words: Vec<&str> = spaced.split_whitespace().collect();

    let (index, item, table) = match words.as_slice() {
        [item, "of", table] => (None, Some(*item), *table),
        [index, ",", item, "of", table] => (Some(*index), Some(*item), *table),
        [index, "in", table] => (Some(*index), None, *table),
        [table] => (None, Some("this"), *table),
        [] => return Err(site.malformed("'#for' requires a table to iterate")),
        _ => {
            return Err(site.malformed(format!(
                "invalid loop syntax '#for {}': expected '#for [index,]item of table'",
                args
            )));
        }
    };

    for name in index.iter().chain(item.iter()).chain(std::iter::once(&table)) {
        if !is_ident(name) {
            return Err(site.malformed(format!("invalid identifier '{}' in loop", name)));
        }
    }
    if index.is_some() && index == item {
        return Err(site.malformed("loop index and item must have different names"));
    }

    Ok(Directive::LoopStart {
        index: index.map(str::to_string),
        item: item.map(str::to_string),
        table: table.to_string(),
    })
}
