//! Block matching: nest `{{#for}}` ... `{{/for}}` pairs into loop segments

use super::parse::{Directive, Piece, Segment, Site, Template};
use crate::template::error::TemplateError;

/// An open loop waiting for its `{{/for}}`
struct OpenBlock {
    index: Option<String>,
    item: Option<String>,
    table: String,
    site: Site,
    body: Vec<Segment>,
}

/// Build the segment tree from flat pieces
///
/// Uses an explicit stack of open blocks, so nesting depth costs no
/// recursion and the innermost unclosed loop is the one reported.
pub(crate) fn build_segments(pieces: Vec<Piece>) -> Result<Template, TemplateError> {
    let mut root: Vec<Segment> = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();

    for piece in pieces {
        let segment = match piece {
            Piece::Text(text) => Segment::Text(text),
            Piece::Tag(tag) => match tag.directive {
                Directive::Subst(expr) => Segment::Subst {
                    expr,
                    site: tag.site,
                },
                Directive::Count(table) => Segment::Count {
                    table,
                    site: tag.site,
                },
                Directive::LoopStart { index, item, table } => {
                    open.push(OpenBlock {
                        index,
                        item,
                        table,
                        site: tag.site,
                        body: Vec::new(),
                    });
                    continue;
                }
                Directive::LoopEnd => {
                    let block = open.pop().ok_or_else(|| {
                        tag.site
                            .malformed("unexpected '{{/for}}' without matching '{{#for}}'")
                    })?;
                    Segment::Loop {
                        index: block.index,
                        item: block.item,
                        table: block.table,
                        body: block.body,
                        site: block.site,
                    }
                }
            },
        };

        match open.last_mut() {
            Some(block) => block.body.push(segment),
            None => root.push(segment),
        }
    }

    if let Some(block) = open.pop() {
        return Err(block.site.malformed(format!(
            "unclosed loop over '{}' (missing '{{{{/for}}}}')",
            block.table
        )));
    }

    Ok(Template::new(root))
}
