//! Selector Module
//!
//! Tokenizes selector text (and selector-like values such as `composes`
//! lists and `@keyframes` names) into a tree that serializes back to the
//! exact input. Tokens come from `cssparser`; anything without selector
//! meaning, such as keyframe steps (`12.5%`) or `an+b` arguments, is kept
//! as a raw tag.

use std::fmt;

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::error::SelectorSyntaxError;
use crate::tokens::{block_closed, comment_closed, next_token, offset, peek_token, string_closed};

/// Comma separated selector branches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

/// One branch of a selector list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub before: String,
    pub nodes: Vec<SelectorNode>,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    Class(String),
    Id(String),
    Tag(String),
    Universal,
    Nesting,
    /// Raw text between `[` and `]`.
    Attribute(String),
    Pseudo(Pseudo),
    /// Whitespace and/or `>`, `+`, `~`, kept raw.
    Combinator(String),
    /// Quoted string, quotes included.
    Str(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pseudo {
    /// Name including the leading colon(s), e.g. `:global` or `::before`.
    pub value: String,
    pub arguments: Option<SelectorList>,
}

impl Pseudo {
    pub fn is_global(&self) -> bool {
        self.value == ":global"
    }
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<SelectorList, SelectorSyntaxError> {
        let mut parser_input = ParserInput::new(input);
        let mut parser = Parser::new(&mut parser_input);
        let builder = SelectorBuilder { input };
        builder
            .list(&mut parser, false)
            .map_err(|error| builder.into_error(error))
    }
}

impl Selector {
    /// Nodes that are not whitespace or comments.
    pub fn significant_nodes(&self) -> impl Iterator<Item = &SelectorNode> {
        self.nodes.iter().filter(|node| match node {
            SelectorNode::Combinator(raw) => !raw.trim().is_empty(),
            SelectorNode::Comment(_) => false,
            _ => true,
        })
    }
}

/// Removes one pair of surrounding quotes, if present.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorNode::Class(name) => write!(f, ".{}", name),
            SelectorNode::Id(name) => write!(f, "#{}", name),
            SelectorNode::Tag(name) => f.write_str(name),
            SelectorNode::Universal => f.write_str("*"),
            SelectorNode::Nesting => f.write_str("&"),
            SelectorNode::Attribute(raw) => write!(f, "[{}]", raw),
            SelectorNode::Pseudo(pseudo) => {
                f.write_str(&pseudo.value)?;
                if let Some(arguments) = &pseudo.arguments {
                    write!(f, "({})", arguments)?;
                }
                Ok(())
            }
            SelectorNode::Combinator(raw) | SelectorNode::Str(raw) => f.write_str(raw),
            SelectorNode::Comment(text) => write!(f, "/*{}*/", text),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER
// ═══════════════════════════════════════════════════════════════════════════════

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn is_combinator(token: &Token<'_>) -> bool {
    matches!(token, Token::WhiteSpace(_) | Token::Delim('>' | '+' | '~'))
}

type BuildResult<'i, T> = Result<T, ParseError<'i, SelectorSyntaxError>>;

#[derive(Clone, Copy)]
struct SelectorBuilder<'a> {
    input: &'a str,
}

impl<'a> SelectorBuilder<'a> {
    fn error(&self, message: &str) -> SelectorSyntaxError {
        SelectorSyntaxError {
            message: message.to_string(),
            input: self.input.to_string(),
        }
    }

    fn fail<'i, T>(&self, parser: &Parser<'i, '_>, message: &str) -> BuildResult<'i, T> {
        Err(parser.new_custom_error(self.error(message)))
    }

    fn into_error(&self, error: ParseError<'_, SelectorSyntaxError>) -> SelectorSyntaxError {
        match error.kind {
            ParseErrorKind::Custom(error) => error,
            ParseErrorKind::Basic(kind) => self.error(&format!("{:?}", kind)),
        }
    }

    /// `nested` lists live inside `(...)` and must end on its `)`.
    fn list<'i>(&self, parser: &mut Parser<'i, '_>, nested: bool) -> BuildResult<'i, SelectorList> {
        let mut selectors = vec![self.selector(parser)?];
        while let Some(Token::Comma) = peek_token(parser) {
            next_token(parser);
            selectors.push(self.selector(parser)?);
        }
        if nested && !block_closed(self.input, parser, b')') {
            return self.fail(parser, "Expected )");
        }
        Ok(SelectorList { selectors })
    }

    fn selector<'i>(&self, parser: &mut Parser<'i, '_>) -> BuildResult<'i, Selector> {
        let mut selector = Selector::default();
        if let Some(Token::WhiteSpace(raw)) = peek_token(parser) {
            next_token(parser);
            selector.before = raw.to_string();
        }

        loop {
            let start = offset(parser);
            let state = parser.state();
            let Some(token) = next_token(parser) else {
                break;
            };
            let raw = &self.input[start..offset(parser)];

            let node = match token {
                Token::Comma => {
                    parser.reset(&state);
                    break;
                }
                ref token if is_combinator(token) => {
                    parser.reset(&state);
                    let raw = self.combinator(parser);
                    let at_end = matches!(peek_token(parser), None | Some(Token::Comma));
                    if at_end && raw.bytes().all(is_whitespace) {
                        selector.after = raw.to_string();
                        break;
                    }
                    SelectorNode::Combinator(raw.to_string())
                }
                Token::Delim('.') => {
                    let name_start = offset(parser);
                    match next_token(parser) {
                        Some(Token::Ident(_)) => {
                            SelectorNode::Class(self.input[name_start..offset(parser)].to_string())
                        }
                        _ => return self.fail(parser, "Expected class name"),
                    }
                }
                Token::Hash(_) | Token::IDHash(_) => SelectorNode::Id(raw[1..].to_string()),
                Token::Delim('*') => SelectorNode::Universal,
                Token::Delim('&') => SelectorNode::Nesting,
                Token::SquareBracketBlock => SelectorNode::Attribute(self.attribute(parser, start)?),
                Token::Colon => SelectorNode::Pseudo(self.pseudo(parser, start)?),
                Token::QuotedString(_) if string_closed(raw) => SelectorNode::Str(raw.to_string()),
                Token::QuotedString(_) | Token::BadString(_) => {
                    return self.fail(parser, "Unclosed string")
                }
                Token::Comment(text) if comment_closed(raw) => SelectorNode::Comment(text.to_string()),
                Token::Comment(_) => return self.fail(parser, "Unclosed comment"),
                Token::ParenthesisBlock | Token::Function(_) => return self.fail(parser, "Unexpected ("),
                Token::CloseParenthesis => return self.fail(parser, "Unexpected )"),
                Token::CloseSquareBracket => return self.fail(parser, "Unexpected ]"),
                Token::CurlyBracketBlock | Token::CloseCurlyBracket | Token::Semicolon => {
                    return self.fail(parser, "Unexpected character")
                }
                _ => SelectorNode::Tag(raw.to_string()),
            };
            selector.nodes.push(node);
        }

        Ok(selector)
    }

    /// A run of whitespace and `>`, `+`, `~`.
    fn combinator(&self, parser: &mut Parser<'_, '_>) -> &'a str {
        let start = offset(parser);
        while peek_token(parser).as_ref().is_some_and(is_combinator) {
            next_token(parser);
        }
        &self.input[start..offset(parser)]
    }

    /// Called right after `[`; returns the raw text up to `]`.
    fn attribute<'i>(&self, parser: &mut Parser<'i, '_>, start: usize) -> BuildResult<'i, String> {
        parser.parse_nested_block(|nested| {
            while next_token(nested).is_some() {}
            if !block_closed(self.input, nested, b']') {
                return self.fail(nested, "Unclosed attribute selector");
            }
            Ok(())
        })?;
        Ok(self.input[start + 1..offset(parser) - 1].to_string())
    }

    /// Called right after the first `:`.
    fn pseudo<'i>(&self, parser: &mut Parser<'i, '_>, start: usize) -> BuildResult<'i, Pseudo> {
        if let Some(Token::Colon) = peek_token(parser) {
            next_token(parser);
        }
        match next_token(parser) {
            Some(Token::Ident(_)) => Ok(Pseudo {
                value: self.input[start..offset(parser)].to_string(),
                arguments: None,
            }),
            Some(Token::Function(_)) => {
                let value = self.input[start..offset(parser) - 1].to_string();
                let arguments = parser.parse_nested_block(|nested| self.list(nested, true))?;
                Ok(Pseudo {
                    value,
                    arguments: Some(arguments),
                })
            }
            _ => self.fail(parser, "Expected pseudo-class name"),
        }
    }
}
