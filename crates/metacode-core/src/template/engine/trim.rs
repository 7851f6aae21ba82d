//! Whitespace trim normalization around `{{~ ... ~}}` directives
//!
//! Runs over the flat piece list, touching only the text pieces adjacent to
//! a trimmed directive. Substituted values are never affected.

use super::parse::Piece;

/// Apply trim markers to neighbouring text pieces
///
/// - left trim (`{{~`): drop spaces/tabs immediately before the directive
/// - right trim (`~}}`): drop spaces/tabs after the directive, then at most
///   one line break
pub(crate) fn normalize_whitespace(mut pieces: Vec<Piece>) -> Vec<Piece> {
    for i in 0..pieces.len() {
        let (trim_left, trim_right) = match &pieces[i] {
            Piece::Tag(tag) => (tag.trim_left, tag.trim_right),
            Piece::Text(_) => continue,
        };

        if trim_left && i > 0 {
            if let Piece::Text(text) = &mut pieces[i - 1] {
                strip_trailing_blanks(text);
            }
        }
        if trim_right {
            if let Some(Piece::Text(text)) = pieces.get_mut(i + 1) {
                strip_leading_line(text);
            }
        }
    }

    pieces.retain(|piece| !matches!(piece, Piece::Text(text) if text.is_empty()));
    pieces
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn strip_trailing_blanks(text: &mut String) {
    let kept = text.trim_end_matches(is_blank).len();
    text.truncate(kept);
}

fn strip_leading_line(text: &mut String) {
    let rest = text.trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let cut = text.len() - rest.len();
    text.drain(..cut);
}
