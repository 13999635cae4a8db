//! Small helpers over the `cssparser` token stream, shared by the
//! stylesheet and selector tree builders.
//!
//! Both builders slice raw text out of the source by byte offset, so every
//! node keeps its exact spelling (escapes, whitespace, comments).

use cssparser::{Parser, Token};

/// Next token, whitespace and comments included. `None` at the end of the
/// input or of the current nested block.
pub(crate) fn next_token<'i>(parser: &mut Parser<'i, '_>) -> Option<Token<'i>> {
    parser.next_including_whitespace_and_comments().ok().cloned()
}

pub(crate) fn peek_token<'i>(parser: &mut Parser<'i, '_>) -> Option<Token<'i>> {
    let state = parser.state();
    let token = next_token(parser);
    parser.reset(&state);
    token
}

pub(crate) fn offset(parser: &Parser<'_, '_>) -> usize {
    parser.position().byte_index()
}

/// cssparser ends an unterminated string at end of input without an
/// error, so the raw text is checked for its closing quote.
pub(crate) fn string_closed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 || bytes[bytes.len() - 1] != bytes[0] {
        return false;
    }
    let escapes = bytes[1..bytes.len() - 1]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    escapes % 2 == 0
}

pub(crate) fn comment_closed(raw: &str) -> bool {
    raw.len() >= 4 && raw.ends_with("*/")
}

/// Called once a nested parser is exhausted: true when the block stopped
/// at its closing `delimiter` rather than at end of input.
pub(crate) fn block_closed(source: &str, parser: &Parser<'_, '_>, delimiter: u8) -> bool {
    source.as_bytes().get(offset(parser)) == Some(&delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_closed() {
        assert!(string_closed(r#""a""#));
        assert!(string_closed(r#"'a\\'"#));
        assert!(!string_closed(r#""a\""#));
        assert!(!string_closed(r#""x }"#));
        assert!(!string_closed("\""));
    }

    #[test]
    fn test_comment_closed() {
        assert!(comment_closed("/**/"));
        assert!(comment_closed("/* a */"));
        assert!(!comment_closed("/*/"));
        assert!(!comment_closed("/* open"));
    }
}
