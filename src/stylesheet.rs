//! Stylesheet Module
//!
//! A small lossless CSS tree: rules, at-rules, declarations and comments.
//! Every node keeps the raw whitespace around it so an untouched tree
//! serializes back to its exact source text.

use std::fmt;

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::error::CssSyntaxError;
use crate::tokens::{block_closed, comment_closed, next_token, offset, peek_token, string_closed};

// ═══════════════════════════════════════════════════════════════════════════════
// TREE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// Path the stylesheet was loaded from, if known.
    pub source: Option<String>,
    pub nodes: Vec<Node>,
    /// Whitespace after the last node.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub before: String,
    pub selector: String,
    /// Whitespace between the selector and `{`.
    pub between: String,
    pub nodes: Vec<Node>,
    /// Whitespace before the closing `}`.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtRule {
    pub before: String,
    pub name: String,
    pub after_name: String,
    pub params: String,
    pub between: String,
    /// `None` for statement at-rules such as `@import "a.css";`.
    pub nodes: Option<Vec<Node>>,
    pub after: String,
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    pub before: String,
    pub prop: String,
    /// Everything between the property and the value, colon included.
    pub between: String,
    pub value: String,
    /// Whitespace between the value and its terminator.
    pub trailing: String,
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub before: String,
    pub text: String,
}

/// The container a declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent<'a> {
    Root,
    Rule { selector: &'a str },
    AtRule { name: &'a str },
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAVERSAL
// ═══════════════════════════════════════════════════════════════════════════════

impl Stylesheet {
    pub fn parse(source: &str, from: Option<&str>) -> Result<Stylesheet, CssSyntaxError> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let builder = TreeBuilder { src: source };
        let (nodes, after) = builder
            .block(&mut parser, None)
            .map_err(|error| builder.into_error(error))?;
        Ok(Stylesheet {
            source: from.map(str::to_string),
            nodes,
            after,
        })
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Visits every node in document order, parents before children.
    pub fn walk_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Node) -> Result<(), E>,
    {
        walk_nodes_mut(&mut self.nodes, f)
    }

    /// Visits every declaration in document order together with its
    /// container. Declarations for which `f` returns `false` are removed.
    pub fn retain_declarations<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Parent<'_>, &mut Declaration) -> Result<bool, E>,
    {
        retain_declarations_in(&mut self.nodes, Parent::Root, f)
    }

    pub fn declarations(&self) -> Vec<&Declaration> {
        let mut out = Vec::new();
        collect_declarations(&self.nodes, &mut out);
        out
    }
}

fn walk_nodes_mut<E, F>(nodes: &mut [Node], f: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    for node in nodes.iter_mut() {
        f(node)?;
        match node {
            Node::Rule(rule) => walk_nodes_mut(&mut rule.nodes, f)?,
            Node::AtRule(AtRule {
                nodes: Some(children),
                ..
            }) => walk_nodes_mut(children, f)?,
            _ => {}
        }
    }
    Ok(())
}

fn retain_declarations_in<E, F>(nodes: &mut Vec<Node>, parent: Parent<'_>, f: &mut F) -> Result<(), E>
where
    F: FnMut(Parent<'_>, &mut Declaration) -> Result<bool, E>,
{
    let mut index = 0;
    while index < nodes.len() {
        let keep = match &mut nodes[index] {
            Node::Declaration(decl) => f(parent, decl)?,
            Node::Rule(Rule {
                selector,
                nodes: children,
                ..
            }) => {
                retain_declarations_in(children, Parent::Rule { selector: selector.as_str() }, f)?;
                true
            }
            Node::AtRule(AtRule {
                name,
                nodes: Some(children),
                ..
            }) => {
                retain_declarations_in(children, Parent::AtRule { name: name.as_str() }, f)?;
                true
            }
            Node::AtRule(_) | Node::Comment(_) => true,
        };
        if keep {
            index += 1;
        } else {
            nodes.remove(index);
        }
    }
    Ok(())
}

fn collect_declarations<'a>(nodes: &'a [Node], out: &mut Vec<&'a Declaration>) {
    for node in nodes {
        match node {
            Node::Declaration(decl) => out.push(decl),
            Node::Rule(rule) => collect_declarations(&rule.nodes, out),
            Node::AtRule(AtRule {
                nodes: Some(children),
                ..
            }) => collect_declarations(children, out),
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Rule(rule) => {
                write!(f, "{}{}{}{{", rule.before, rule.selector, rule.between)?;
                for child in &rule.nodes {
                    write!(f, "{}", child)?;
                }
                write!(f, "{}}}", rule.after)
            }
            Node::AtRule(at) => {
                write!(f, "{}@{}{}{}{}", at.before, at.name, at.after_name, at.params, at.between)?;
                match &at.nodes {
                    Some(children) => {
                        f.write_str("{")?;
                        for child in children {
                            write!(f, "{}", child)?;
                        }
                        write!(f, "{}}}", at.after)
                    }
                    None if at.semicolon => f.write_str(";"),
                    None => Ok(()),
                }
            }
            Node::Declaration(decl) => {
                write!(
                    f,
                    "{}{}{}{}{}",
                    decl.before, decl.prop, decl.between, decl.value, decl.trailing
                )?;
                if decl.semicolon {
                    f.write_str(";")?;
                }
                Ok(())
            }
            Node::Comment(comment) => write!(f, "{}/*{}*/", comment.before, comment.text),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER
// ═══════════════════════════════════════════════════════════════════════════════

fn is_css_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn split_trailing_whitespace(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim_end_matches(|c: char| c.is_ascii() && is_css_whitespace(c as u8));
    (trimmed, &raw[trimmed.len()..])
}

type BuildResult<'i, T> = Result<T, ParseError<'i, CssSyntaxError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Block,
    /// End of input, or the `}` of the enclosing block (left unconsumed).
    End,
}

#[derive(Debug, Clone, Copy)]
struct Statement {
    /// Offset of the terminator.
    end: usize,
    terminator: Terminator,
    /// Offset of the first `:` outside nested blocks.
    colon: Option<usize>,
}

/// Builds the node tree from cssparser tokens. Raw text is sliced out of
/// `src` by token offsets.
#[derive(Clone, Copy)]
struct TreeBuilder<'a> {
    src: &'a str,
}

impl<'a> TreeBuilder<'a> {
    fn error(&self, message: &str, offset: usize) -> CssSyntaxError {
        let consumed = &self.src[..offset.min(self.src.len())];
        let line = consumed.matches('\n').count() as u32 + 1;
        let column = match consumed.rfind('\n') {
            Some(nl) => consumed[nl + 1..].chars().count() as u32 + 1,
            None => consumed.chars().count() as u32 + 1,
        };
        CssSyntaxError {
            message: message.to_string(),
            line,
            column,
        }
    }

    fn fail<'i, T>(&self, parser: &Parser<'i, '_>, message: &str, offset: usize) -> BuildResult<'i, T> {
        Err(parser.new_custom_error(self.error(message, offset)))
    }

    fn into_error(&self, error: ParseError<'_, CssSyntaxError>) -> CssSyntaxError {
        match error.kind {
            ParseErrorKind::Custom(error) => error,
            ParseErrorKind::Basic(kind) => CssSyntaxError {
                message: format!("{:?}", kind),
                line: error.location.line + 1,
                column: error.location.column,
            },
        }
    }

    /// Whitespace and stray semicolons between nodes.
    fn skip_trivia(&self, parser: &mut Parser<'_, '_>) {
        while matches!(peek_token(parser), Some(Token::WhiteSpace(_) | Token::Semicolon)) {
            next_token(parser);
        }
    }

    /// Parses nodes until the end of the current block. `opened_at` is the
    /// offset of the `{` that opened it, `None` for the root.
    fn block<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
        opened_at: Option<usize>,
    ) -> BuildResult<'i, (Vec<Node>, String)> {
        let mut nodes = Vec::new();
        loop {
            let trivia_start = offset(parser);
            self.skip_trivia(parser);
            let start = offset(parser);
            let before = self.src[trivia_start..start].to_string();

            let state = parser.state();
            let Some(token) = next_token(parser) else {
                return match opened_at {
                    Some(open) if !block_closed(self.src, parser, b'}') => {
                        self.fail(parser, "Unclosed block", open)
                    }
                    _ => Ok((nodes, before)),
                };
            };

            match token {
                Token::CloseCurlyBracket => return self.fail(parser, "Unexpected }", start),
                Token::Comment(text) => {
                    if !comment_closed(&self.src[start..offset(parser)]) {
                        return self.fail(parser, "Unclosed comment", start);
                    }
                    nodes.push(Node::Comment(Comment {
                        before,
                        text: text.to_string(),
                    }));
                }
                Token::AtKeyword(_) => nodes.push(Node::AtRule(self.at_rule(parser, before, start)?)),
                _ => {
                    parser.reset(&state);
                    nodes.push(self.rule_or_declaration(parser, before)?);
                }
            }
        }
    }

    /// Consumes tokens up to the next `;`, `{` or end of block. Blocks
    /// nested inside the statement (`url(...)`, `(...)`) are skipped whole.
    fn statement<'i>(&self, parser: &mut Parser<'i, '_>) -> BuildResult<'i, Statement> {
        let mut colon = None;
        loop {
            let start = offset(parser);
            let state = parser.state();
            let Some(token) = next_token(parser) else {
                return Ok(Statement {
                    end: start,
                    terminator: Terminator::End,
                    colon,
                });
            };
            let raw = &self.src[start..offset(parser)];
            let terminator = match token {
                Token::Semicolon => Terminator::Semicolon,
                Token::CurlyBracketBlock => Terminator::Block,
                Token::CloseCurlyBracket => {
                    parser.reset(&state);
                    Terminator::End
                }
                Token::Colon => {
                    colon.get_or_insert(start);
                    continue;
                }
                Token::QuotedString(_) if !string_closed(raw) => {
                    return self.fail(parser, "Unclosed string", start)
                }
                Token::BadString(_) => return self.fail(parser, "Unclosed string", start),
                Token::BadUrl(_) => return self.fail(parser, "Unclosed url", start),
                Token::Comment(_) if !comment_closed(raw) => {
                    return self.fail(parser, "Unclosed comment", start)
                }
                _ => continue,
            };
            return Ok(Statement {
                end: start,
                terminator,
                colon,
            });
        }
    }

    fn at_rule<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
        before: String,
        start: usize,
    ) -> BuildResult<'i, AtRule> {
        let name = self.src[start + 1..offset(parser)].to_string();
        let after_name_start = offset(parser);
        while matches!(peek_token(parser), Some(Token::WhiteSpace(_))) {
            next_token(parser);
        }
        let params_start = offset(parser);

        let statement = self.statement(parser)?;
        let (params, between) = split_trailing_whitespace(&self.src[params_start..statement.end]);
        let mut at_rule = AtRule {
            before,
            name,
            after_name: self.src[after_name_start..params_start].to_string(),
            params: params.to_string(),
            between: between.to_string(),
            ..AtRule::default()
        };

        match statement.terminator {
            Terminator::Block => {
                let (children, after) =
                    parser.parse_nested_block(|nested| self.block(nested, Some(statement.end)))?;
                at_rule.nodes = Some(children);
                at_rule.after = after;
            }
            Terminator::Semicolon => at_rule.semicolon = true,
            Terminator::End => {}
        }
        Ok(at_rule)
    }

    fn rule_or_declaration<'i>(&self, parser: &mut Parser<'i, '_>, before: String) -> BuildResult<'i, Node> {
        let start = offset(parser);
        let statement = self.statement(parser)?;
        let raw = &self.src[start..statement.end];

        if statement.terminator == Terminator::Block {
            let (selector, between) = split_trailing_whitespace(raw);
            let (nodes, after) =
                parser.parse_nested_block(|nested| self.block(nested, Some(statement.end)))?;
            return Ok(Node::Rule(Rule {
                before,
                selector: selector.to_string(),
                between: between.to_string(),
                nodes,
                after,
            }));
        }

        let Some(colon) = statement.colon.map(|colon| colon - start) else {
            return self.fail(parser, "Unknown word", start);
        };
        let (prop, _) = split_trailing_whitespace(&raw[..colon]);
        if prop.is_empty() {
            return self.fail(parser, "Missing property name", start);
        }
        let rest = &raw[colon + 1..];
        let value_offset = rest.len()
            - rest
                .trim_start_matches(|c: char| c.is_ascii() && is_css_whitespace(c as u8))
                .len();
        let (value, trailing) = split_trailing_whitespace(&rest[value_offset..]);

        Ok(Node::Declaration(Declaration {
            before,
            prop: prop.to_string(),
            between: raw[prop.len()..colon + 1 + value_offset].to_string(),
            value: value.to_string(),
            trailing: trailing.to_string(),
            semicolon: statement.terminator == Terminator::Semicolon,
        }))
    }
}
