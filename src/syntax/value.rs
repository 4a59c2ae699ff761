//! Tokenizer for a single property value or at-rule prelude.
//!
//! Built on the [cssparser] tokenizer and shaped like `postcss-value-parser`:
//! words, dimensions, strings, separators, whitespace, comments and functions
//! with their arguments. Every node remembers the character offset at which
//! it starts inside the parsed text.

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNode {
    /// Identifiers, plain numbers, hashes, at-keywords and lone delimiters.
    Word {
        value: String,
        source_index: usize,
    },
    /// A number with a unit, `%` included. `value` is the raw text.
    Dimension {
        value: String,
        unit: String,
        source_index: usize,
    },
    /// `value` is the unescaped content without quotes.
    String {
        value: String,
        quote: char,
        source_index: usize,
    },
    /// `,`, `/` or `:`.
    Div {
        value: char,
        source_index: usize,
    },
    Space {
        value: String,
        source_index: usize,
    },
    Comment {
        value: String,
        source_index: usize,
    },
    /// `name(args)`. A bare parenthesised group has an empty name.
    Function {
        name: String,
        source_index: usize,
        nodes: Vec<ValueNode>,
    },
}

impl ValueNode {
    pub fn source_index(&self) -> usize {
        match self {
            ValueNode::Word { source_index, .. }
            | ValueNode::Dimension { source_index, .. }
            | ValueNode::String { source_index, .. }
            | ValueNode::Div { source_index, .. }
            | ValueNode::Space { source_index, .. }
            | ValueNode::Comment { source_index, .. }
            | ValueNode::Function { source_index, .. } => *source_index,
        }
    }
}

/// Returned by [`walk`] visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not descend into this function's arguments.
    Skip,
}

pub fn parse(value: &str) -> Vec<ValueNode> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    tokens(&mut parser, value)
}

fn char_index(source: &str, position: SourcePosition) -> usize {
    source[..position.byte_index()].chars().count()
}

/// Arguments of the block whose opening token was just consumed.
fn nested<'i>(parser: &mut Parser<'i, '_>, source: &str) -> Vec<ValueNode> {
    parser
        .parse_nested_block(|block| -> Result<_, ParseError<'i, ()>> { Ok(tokens(block, source)) })
        .unwrap_or_default()
}

fn tokens<'i>(parser: &mut Parser<'i, '_>, source: &str) -> Vec<ValueNode> {
    let mut nodes = Vec::new();
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let source_index = char_index(source, start);
        let node = match token {
            Token::WhiteSpace(space) => ValueNode::Space {
                value: space.to_string(),
                source_index,
            },
            Token::Comment(_) => ValueNode::Comment {
                value: parser.slice_from(start).to_string(),
                source_index,
            },
            Token::QuotedString(value) | Token::BadString(value) => ValueNode::String {
                value: value.to_string(),
                quote: parser.slice_from(start).chars().next().unwrap_or('"'),
                source_index,
            },
            Token::Comma => ValueNode::Div {
                value: ',',
                source_index,
            },
            Token::Colon => ValueNode::Div {
                value: ':',
                source_index,
            },
            Token::Delim('/') => ValueNode::Div {
                value: '/',
                source_index,
            },
            Token::Dimension { unit, .. } => ValueNode::Dimension {
                value: parser.slice_from(start).to_string(),
                unit: unit.to_string(),
                source_index,
            },
            Token::Percentage { .. } => ValueNode::Dimension {
                value: parser.slice_from(start).to_string(),
                unit: "%".to_string(),
                source_index,
            },
            Token::Function(name) => ValueNode::Function {
                name: name.to_string(),
                source_index,
                nodes: nested(parser, source),
            },
            Token::ParenthesisBlock => ValueNode::Function {
                name: String::new(),
                source_index,
                nodes: nested(parser, source),
            },
            Token::UnquotedUrl(url) => unquoted_url(parser.slice_from(start), &url, source_index),
            Token::SquareBracketBlock | Token::CurlyBracketBlock => {
                nested(parser, source);
                ValueNode::Word {
                    value: parser.slice_from(start).to_string(),
                    source_index,
                }
            }
            _ => ValueNode::Word {
                value: parser.slice_from(start).to_string(),
                source_index,
            },
        };
        nodes.push(node);
    }
    nodes
}

/// `url(img/a.png)` as a `url` function holding one word.
fn unquoted_url(raw: &str, url: &str, source_index: usize) -> ValueNode {
    let open = raw.find('(').map_or(raw.len(), |i| i + 1);
    let padding = raw[open..].len() - raw[open..].trim_start().len();
    ValueNode::Function {
        name: raw[..open].trim_end_matches('(').to_string(),
        source_index,
        nodes: vec![ValueNode::Word {
            value: url.to_string(),
            source_index: source_index + raw[..open + padding].chars().count(),
        }],
    }
}

/// Visits `nodes` depth-first in source order.
pub fn walk<F>(nodes: &[ValueNode], visit: &mut F)
where
    F: FnMut(&ValueNode) -> Walk,
{
    for node in nodes {
        let action = visit(node);
        if let (Walk::Continue, ValueNode::Function { nodes, .. }) = (action, node) {
            walk(nodes, visit);
        }
    }
}

/// Dimension unit of a node: `10px` → `px`, `50%` → `%`.
///
/// ```
/// use lessguard::syntax::value::{parse, unit_of};
///
/// let nodes = parse("10PX #fff 1.5 auto 1e3 @gutter");
/// let units: Vec<_> = nodes.iter().filter_map(unit_of).collect();
/// assert_eq!(units, vec!["PX"]);
/// ```
pub fn unit_of(node: &ValueNode) -> Option<&str> {
    match node {
        ValueNode::Dimension { unit, .. } => Some(unit.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Leaf text and offset of every word and dimension.
    fn leaves(nodes: &[ValueNode]) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        walk(nodes, &mut |node| {
            match node {
                ValueNode::Word {
                    value,
                    source_index,
                }
                | ValueNode::Dimension {
                    value,
                    source_index,
                    ..
                } => out.push((value.clone(), *source_index)),
                _ => {}
            }
            Walk::Continue
        });
        out
    }

    #[test]
    fn leaves_carry_source_index() {
        let nodes = parse("1px solid  red");
        assert_eq!(
            leaves(&nodes),
            vec![
                ("1px".to_string(), 0),
                ("solid".to_string(), 4),
                ("red".to_string(), 11)
            ]
        );
    }

    #[test]
    fn functions_nest_and_can_be_skipped() {
        let nodes = parse("calc(10px + 2em), rgba(0,0,0,.5)");
        assert!(matches!(&nodes[0], ValueNode::Function { name, .. } if name == "calc"));
        assert_eq!(leaves(&nodes).len(), 7);

        let mut seen = Vec::new();
        walk(&nodes, &mut |node| {
            seen.push(node.source_index());
            match node {
                ValueNode::Function { name, .. } if name == "calc" => Walk::Skip,
                _ => Walk::Continue,
            }
        });
        assert!(!seen.contains(&5));
    }

    #[test]
    fn unquoted_url_is_one_word() {
        let nodes = parse("url( img/a.png) no-repeat");
        let ValueNode::Function { name, nodes: args, .. } = &nodes[0] else {
            panic!("expected function");
        };
        assert_eq!(name, "url");
        assert_eq!(
            args,
            &vec![ValueNode::Word {
                value: "img/a.png".into(),
                source_index: 5
            }]
        );
    }

    #[test]
    fn strings_and_comments_are_not_leaves() {
        let nodes = parse("\"10px\" /* 2em */ 3rem");
        assert_eq!(leaves(&nodes), vec![("3rem".to_string(), 17)]);
        assert!(matches!(&nodes[0], ValueNode::String { value, quote: '"', .. } if value == "10px"));
    }

    #[test]
    fn bare_parens_form_unnamed_function() {
        let nodes = parse("(min-width: 10px)");
        let ValueNode::Function { name, nodes, .. } = &nodes[0] else {
            panic!("expected function");
        };
        assert!(name.is_empty());
        assert_eq!(
            leaves(nodes),
            vec![("min-width".to_string(), 1), ("10px".to_string(), 12)]
        );
    }

    #[test]
    fn offsets_count_characters() {
        let nodes = parse("\"é\" 2em");
        assert_eq!(leaves(&nodes), vec![("2em".to_string(), 4)]);
    }

    #[test]
    fn unit_extraction() {
        let units = |v: &str| {
            parse(v)
                .iter()
                .filter_map(unit_of)
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(units("10px"), vec!["px"]);
        assert_eq!(units("-.5em"), vec!["em"]);
        assert_eq!(units("50%"), vec!["%"]);
        assert_eq!(units("2*3vh"), vec!["vh"]);
        assert!(units("1e3").is_empty());
        assert!(units("#123abc").is_empty());
        assert!(units("@gutter").is_empty());
        assert!(units("auto").is_empty());
        assert!(units("10").is_empty());
    }
}
