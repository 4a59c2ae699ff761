//! Lossless parser for CSS and the Less subset the rules care about.
//!
//! Supported on top of plain CSS: `//` line comments, `@name: value;`
//! variable definitions, nested rules, mixin calls (`.mixin();`) and
//! `@{…}` interpolation in selectors. Anything the parser does not
//! understand inside a block is reported as a [`ParseError`].
//!
//! The parser pulls tokens from [`lexer`](super::lexer) one at a time at a
//! byte cursor, so it can re-read a `//` inside parentheses as a plain `/`.

use super::ast::{AtRule, Comment, Declaration, Node, Position, Root, RuleNode, Span};
use super::lexer::{token_at, LexError, Lexeme, Token};
use regex::Regex;
use std::sync::LazyLock;

static RE_IMPORTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*!\s*important$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Unclosed block")]
    UnclosedBlock,
    #[error("Unexpected \"}}\"")]
    UnexpectedClose,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Unclosed comment")]
    UnclosedComment,
    #[error("Unclosed interpolation")]
    UnclosedInterpolation,
    #[error("Unknown word")]
    UnknownWord,
}

impl From<LexError> for ParseErrorKind {
    fn from(error: LexError) -> Self {
        match error {
            LexError::UnclosedComment => ParseErrorKind::UnclosedComment,
            LexError::UnclosedString => ParseErrorKind::UnclosedString,
            LexError::UnclosedInterpolation => ParseErrorKind::UnclosedInterpolation,
            LexError::Unexpected => ParseErrorKind::UnknownWord,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}:{}", .position.line, .position.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses `source` into a [`Root`]. Printing the result reproduces `source`.
///
/// ```
/// use lessguard::syntax::parser::parse;
///
/// let src = "@red: #f00;\n.a { color: @red; }\n";
/// let root = parse(src).unwrap();
/// assert_eq!(root.to_string(), src);
/// ```
pub fn parse(source: &str) -> ParseResult<Root> {
    let mut parser = Parser::new(source);
    let (nodes, after) = parser.nodes(None)?;
    Ok(Root::new(nodes, after))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Open,
    Semicolon,
    Close,
    Eof,
}

/// Where a statement stops, and the byte offset of its first `:` outside
/// brackets, if any.
#[derive(Debug, Clone, Copy)]
struct Statement {
    end: usize,
    kind: End,
    colon: Option<usize>,
}

struct Parser<'a> {
    source: &'a str,
    /// Byte cursor.
    pos: usize,
    /// `(byte, char)` offsets of every line start.
    lines: Vec<(usize, usize)>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Parser<'a> {
        let mut lines = vec![(0, 0)];
        lines.extend(
            source
                .char_indices()
                .enumerate()
                .filter(|(_, (_, c))| *c == '\n')
                .map(|(chars, (byte, _))| (byte + 1, chars + 1)),
        );
        Parser {
            source,
            pos: 0,
            lines,
        }
    }

    fn token(&self, offset: usize) -> ParseResult<Option<Lexeme>> {
        token_at(self.source, offset).map_err(|(e, at)| self.error(e.into(), at))
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.source[start..end].to_string()
    }

    fn position_at(&self, byte: usize) -> Position {
        let line = self.lines.partition_point(|&(start, _)| start <= byte);
        let (line_byte, line_char) = self.lines[line.saturating_sub(1)];
        let column = self.source[line_byte..byte].chars().count();
        Position {
            line,
            column: column + 1,
            offset: line_char + column,
        }
    }

    /// Span of `start..end`; the end position is the last character.
    fn span(&self, start: usize, end: usize) -> Option<Span> {
        let last = self.source[start..end]
            .char_indices()
            .next_back()
            .map_or(start, |(i, _)| start + i);
        Some(Span {
            start: self.position_at(start),
            end: self.position_at(last),
        })
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError {
            kind,
            position: self.position_at(offset),
        }
    }

    /// Parses child nodes until the closing `}` of the block opened at
    /// `open`, or until end of input at the top level. Returns the nodes and
    /// the raw text after the last one.
    fn nodes(&mut self, open: Option<usize>) -> ParseResult<(Vec<Node>, String)> {
        let mut nodes = Vec::new();
        loop {
            let ws_start = self.pos;
            let next = loop {
                match self.token(self.pos)? {
                    Some(lexeme) if matches!(lexeme.token, Token::Space | Token::Semicolon) => {
                        self.pos = lexeme.end;
                    }
                    other => break other,
                }
            };
            let before = self.text(ws_start, self.pos);

            let Some(lexeme) = next else {
                return match open {
                    Some(at) => Err(self.error(ParseErrorKind::UnclosedBlock, at)),
                    None => Ok((nodes, before)),
                };
            };
            match lexeme.token {
                Token::CloseBrace => {
                    if open.is_none() {
                        return Err(self.error(ParseErrorKind::UnexpectedClose, self.pos));
                    }
                    self.pos = lexeme.end;
                    return Ok((nodes, before));
                }
                Token::BlockComment => nodes.push(self.comment(before, &lexeme, false)),
                Token::LineComment => nodes.push(self.comment(before, &lexeme, true)),
                Token::At => nodes.push(self.at_rule(before, &lexeme)?),
                _ => nodes.push(self.statement(before)?),
            }
        }
    }

    fn comment(&mut self, before: String, lexeme: &Lexeme, inline: bool) -> Node {
        self.pos = lexeme.end;
        Node::Comment(Comment {
            before,
            text: self.text(lexeme.start, lexeme.end),
            inline,
            source: self.span(lexeme.start, lexeme.end),
        })
    }

    /// Finds where the statement starting at `from` ends: the first `{`, `;`
    /// or `}` outside brackets. Strings, comments and interpolations are
    /// single tokens and never end a statement.
    fn scan_statement(&self, from: usize) -> ParseResult<Statement> {
        let mut depth = 0usize;
        let mut colon = None;
        let mut at = from;
        while let Some(lexeme) = self.token(at)? {
            match lexeme.token {
                Token::LineComment if depth > 0 => {
                    // `url(//host/a.png)`: only the first `/` is consumed.
                    at = lexeme.start + 1;
                    continue;
                }
                Token::OpenParen | Token::OpenBracket => depth += 1,
                Token::CloseParen | Token::CloseBracket => depth = depth.saturating_sub(1),
                Token::Colon if depth == 0 && colon.is_none() => colon = Some(lexeme.start),
                Token::OpenBrace | Token::Semicolon | Token::CloseBrace if depth == 0 => {
                    let kind = match lexeme.token {
                        Token::OpenBrace => End::Open,
                        Token::Semicolon => End::Semicolon,
                        _ => End::Close,
                    };
                    return Ok(Statement {
                        end: lexeme.start,
                        kind,
                        colon,
                    });
                }
                _ => {}
            }
            at = lexeme.end;
        }
        Ok(Statement {
            end: self.source.len(),
            kind: End::Eof,
            colon,
        })
    }

    /// Consumes the statement terminator and returns it together with the
    /// trailing whitespace of the statement.
    fn finish(&mut self, statement: Statement, trailing: &str) -> String {
        let mut terminator = trailing.to_string();
        if statement.kind == End::Semicolon {
            terminator.push(';');
            self.pos = statement.end + 1;
        } else {
            self.pos = statement.end;
        }
        terminator
    }

    fn statement(&mut self, before: String) -> ParseResult<Node> {
        let start = self.pos;
        let statement = self.scan_statement(start)?;
        let source = self.source;
        let raw = &source[start..statement.end];

        if statement.kind == End::Open {
            let selector = raw.trim_end().to_string();
            let between = raw[selector.len()..].to_string();
            self.pos = statement.end + 1;
            let (nodes, after) = self.nodes(Some(statement.end))?;
            return Ok(Node::Rule(RuleNode {
                before,
                selector,
                between,
                nodes,
                after,
                mixin: false,
                terminator: String::new(),
                source: self.span(start, self.pos),
            }));
        }

        let trimmed = raw.trim_end();
        let trailing = raw[trimmed.len()..].to_string();

        if let Some(colon) = statement.colon.map(|at| at - start) {
            let prop_raw = &trimmed[..colon];
            let prop = prop_raw.trim_end();
            let rest = &trimmed[colon + 1..];
            let value_raw = rest.trim_start();

            let mut between = prop_raw[prop.len()..].to_string();
            between.push(':');
            between.push_str(&rest[..rest.len() - value_raw.len()]);

            let (value, important) = match RE_IMPORTANT.find(value_raw) {
                Some(m) => (
                    value_raw[..m.start()].to_string(),
                    Some(m.as_str().to_string()),
                ),
                None => (value_raw.to_string(), None),
            };

            let prop = prop.to_string();
            let terminator = self.finish(statement, &trailing);
            return Ok(Node::Decl(Declaration {
                before,
                prop,
                between,
                value,
                important,
                terminator,
                source: self.span(start, self.pos),
            }));
        }

        if trimmed.starts_with('.') || trimmed.starts_with('#') {
            let selector = trimmed.to_string();
            let terminator = self.finish(statement, &trailing);
            return Ok(Node::Rule(RuleNode {
                before,
                selector,
                between: String::new(),
                nodes: Vec::new(),
                after: String::new(),
                mixin: true,
                terminator,
                source: self.span(start, self.pos),
            }));
        }

        Err(self.error(ParseErrorKind::UnknownWord, start))
    }

    fn at_rule(&mut self, before: String, at: &Lexeme) -> ParseResult<Node> {
        let start = at.start;
        let name = match self.token(at.end)? {
            Some(lexeme) if lexeme.token == Token::Word => lexeme,
            _ => return Err(self.error(ParseErrorKind::UnknownWord, start)),
        };
        self.pos = name.end;

        let after_start = self.pos;
        let mut variable = false;
        while let Some(lexeme) = self.token(self.pos)? {
            match lexeme.token {
                Token::Colon if !variable && self.pos == name.end => variable = true,
                Token::Space => {}
                _ => break,
            }
            self.pos = lexeme.end;
        }
        let after_name = self.text(after_start, self.pos);

        let params_start = self.pos;
        let statement = self.scan_statement(params_start)?;
        let source = self.source;
        let raw = &source[params_start..statement.end];
        let params = raw.trim_end().to_string();
        let trailing = raw[params.len()..].to_string();

        let mut at_rule = AtRule {
            before,
            name: self.text(name.start, name.end),
            after_name,
            params,
            between: String::new(),
            nodes: None,
            after: String::new(),
            terminator: String::new(),
            variable,
            source: None,
        };

        if statement.kind == End::Open {
            at_rule.between = trailing;
            self.pos = statement.end + 1;
            let (nodes, after) = self.nodes(Some(statement.end))?;
            at_rule.nodes = Some(nodes);
            at_rule.after = after;
        } else {
            at_rule.terminator = self.finish(statement, &trailing);
        }
        at_rule.source = self.span(start, self.pos);
        Ok(Node::AtRule(at_rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::NodePath;

    const SAMPLE: &str = "// header\n@import (reference) \"{}/styles/vars\";\n@red: #FF0000;\n\n.a, .b:hover {\n  color: #FF0000 !important;\n  margin : 0 auto ;\n  .mixin();\n  @media (min-width: 10px) { width: 1px }\n}\n/* done */\n";

    #[test]
    fn round_trips_source_exactly() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(root.to_string(), SAMPLE);
    }

    #[test]
    fn recognises_variable_definitions() {
        let root = parse("@red: #FF0000;\n@media screen {}\n").unwrap();
        let Node::AtRule(var) = &root.nodes[0] else {
            panic!("expected at-rule");
        };
        assert!(var.variable);
        assert_eq!(var.name, "red");
        assert_eq!(var.variable_value(), Some("#FF0000"));

        let Node::AtRule(media) = &root.nodes[1] else {
            panic!("expected at-rule");
        };
        assert!(!media.variable);
        assert_eq!(media.variable_value(), None);
    }

    #[test]
    fn splits_declaration_parts() {
        let root = parse(".a { margin : 0 auto ; color: red !important }").unwrap();
        let margin = root.decl(&NodePath(vec![0, 0])).unwrap();
        assert_eq!(margin.prop, "margin");
        assert_eq!(margin.between, " : ");
        assert_eq!(margin.value, "0 auto");
        assert_eq!(margin.terminator, " ;");

        let color = root.decl(&NodePath(vec![0, 1])).unwrap();
        assert_eq!(color.value, "red");
        assert_eq!(color.important.as_deref(), Some(" !important"));
        assert_eq!(color.terminator, "");
    }

    #[test]
    fn records_source_positions() {
        let root = parse("a {\n  color: red;\n}").unwrap();
        let decl = root.decl(&NodePath(vec![0, 0])).unwrap();
        let start = decl.source.unwrap().start;
        assert_eq!((start.line, start.column, start.offset), (2, 3, 6));
    }

    #[test]
    fn interpolated_selector_is_one_rule() {
        let root = parse(".icon-@{name} { color: red; }").unwrap();
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector, ".icon-@{name}");
        assert_eq!(rule.nodes.len(), 1);
    }

    #[test]
    fn semicolon_inside_parens_does_not_end_statement() {
        let root = parse(".a { .mixin(1; 2); }").unwrap();
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        let Node::Rule(mixin) = &rule.nodes[0] else {
            panic!("expected mixin");
        };
        assert!(mixin.mixin);
        assert_eq!(mixin.selector, ".mixin(1; 2)");
    }

    #[test]
    fn protocol_relative_url_is_not_a_comment() {
        let src = ".a { background: url(//cdn.example/a.png); color: red }";
        let root = parse(src).unwrap();
        assert_eq!(root.to_string(), src);
        let bg = root.decl(&NodePath(vec![0, 0])).unwrap();
        assert_eq!(bg.value, "url(//cdn.example/a.png)");
        assert_eq!(root.decl(&NodePath(vec![0, 1])).unwrap().prop, "color");
    }

    #[test]
    fn positions_count_characters_not_bytes() {
        let root = parse("/* é */
a { content: \"ü\"; color: red }").unwrap();
        let color = root.decl(&NodePath(vec![1, 1])).unwrap();
        let start = color.source.unwrap().start;
        assert_eq!((start.line, start.column, start.offset), (2, 19, 26));
    }

    #[test]
    fn unclosed_block_is_an_error() {
        let err = parse(".a {\n color: red;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedBlock);
        assert_eq!((err.position.line, err.position.column), (1, 4));
    }

    #[test]
    fn stray_close_brace_is_an_error() {
        let err = parse("a {}\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
        assert_eq!(err.to_string(), "Unexpected \"}\" at 2:1");
    }

    #[test]
    fn unclosed_string_and_comment_are_errors() {
        assert_eq!(
            parse("a { content: \"x; }").unwrap_err().kind,
            ParseErrorKind::UnclosedString
        );
        assert_eq!(
            parse("/* open").unwrap_err().kind,
            ParseErrorKind::UnclosedComment
        );
    }

    #[test]
    fn word_without_colon_is_an_error() {
        assert_eq!(
            parse("a { color red; }").unwrap_err().kind,
            ParseErrorKind::UnknownWord
        );
    }
}
