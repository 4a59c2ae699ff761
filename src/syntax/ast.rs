//! Stylesheet tree model.
//!
//! Nodes keep every piece of raw text the parser saw (`before`, `between`,
//! `terminator`, …) so that printing an unmodified [`Root`] reproduces the
//! source exactly. Rules mutate the tree through plain field access; the only
//! structural edit supported is [`Root::prepend`].

use std::fmt;

/// A point in the source text. `line` and `column` are 1-based, `offset` is a
/// 0-based character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Walks `index` characters of `text` starting from `self`, where `text`
    /// is the printed form of the node that starts at `self`.
    ///
    /// ```
    /// use lessguard::syntax::ast::Position;
    ///
    /// let start = Position { line: 3, column: 5, offset: 40 };
    /// let pos = start.advance("color:\n  red", 9);
    /// assert_eq!((pos.line, pos.column, pos.offset), (4, 3, 49));
    /// ```
    pub fn advance(self, text: &str, index: usize) -> Position {
        let mut line = self.line;
        let mut column = self.column;
        for c in text.chars().take(index) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            line,
            column,
            offset: self.offset + index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Rule,
    AtRule,
    Decl,
    Comment,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => write!(f, "root"),
            NodeKind::Rule => write!(f, "rule"),
            NodeKind::AtRule => write!(f, "at-rule"),
            NodeKind::Decl => write!(f, "decl"),
            NodeKind::Comment => write!(f, "comment"),
        }
    }
}

/// A `prop: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub before: String,
    pub prop: String,
    /// Raw text between the property and the value, colon included.
    pub between: String,
    /// Raw value text, without the `!important` suffix and trailing whitespace.
    pub value: String,
    /// Raw `!important` suffix including its leading whitespace.
    pub important: Option<String>,
    /// Whitespace and `;` following the value, if any.
    pub terminator: String,
    pub source: Option<Span>,
}

impl Declaration {
    pub fn is_important(&self) -> bool {
        self.important.is_some()
    }
}

/// A selector followed by a block, or a Less mixin call (`.mixin();`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    pub before: String,
    pub selector: String,
    pub between: String,
    pub nodes: Vec<Node>,
    pub after: String,
    /// Set for mixin calls, which have no block; `terminator` then holds the `;`.
    pub mixin: bool,
    pub terminator: String,
    pub source: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub before: String,
    /// Name without the `@`. For variable definitions this is the variable name.
    pub name: String,
    /// Raw text after the name. For variable definitions this includes the `:`.
    pub after_name: String,
    pub params: String,
    pub between: String,
    pub nodes: Option<Vec<Node>>,
    pub after: String,
    pub terminator: String,
    /// `true` for Less variable definitions (`@name: value;`).
    pub variable: bool,
    pub source: Option<Span>,
}

impl AtRule {
    /// Bodiless at-rule without source position, as produced by fixes.
    pub fn synthesized(name: &str, params: &str) -> AtRule {
        AtRule {
            before: String::new(),
            name: name.to_string(),
            after_name: " ".to_string(),
            params: params.to_string(),
            between: String::new(),
            nodes: None,
            after: String::new(),
            terminator: ";".to_string(),
            variable: false,
            source: None,
        }
    }

    /// Value of a `@name: value;` definition.
    pub fn variable_value(&self) -> Option<&str> {
        (self.variable && self.nodes.is_none()).then_some(self.params.as_str())
    }

    pub fn is_import(&self) -> bool {
        !self.variable && self.name.eq_ignore_ascii_case("import")
    }

    /// Target of an `@import`, quotes included, with any leading
    /// `(reference, …)` option group skipped.
    pub fn import_filename(&self) -> Option<&str> {
        if !self.is_import() {
            return None;
        }
        let mut params = self.params.trim();
        if params.starts_with('(') {
            let close = params.find(')')?;
            params = params[close + 1..].trim_start();
        }
        (!params.is_empty()).then_some(params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub before: String,
    /// Full comment text including delimiters.
    pub text: String,
    /// `true` for `//` line comments.
    pub inline: bool,
    pub source: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Decl(Declaration),
    Rule(RuleNode),
    AtRule(AtRule),
    Comment(Comment),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Decl(_) => NodeKind::Decl,
            Node::Rule(_) => NodeKind::Rule,
            Node::AtRule(_) => NodeKind::AtRule,
            Node::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn source(&self) -> Option<&Span> {
        match self {
            Node::Decl(n) => n.source.as_ref(),
            Node::Rule(n) => n.source.as_ref(),
            Node::AtRule(n) => n.source.as_ref(),
            Node::Comment(n) => n.source.as_ref(),
        }
    }

    pub fn before(&self) -> &str {
        match self {
            Node::Decl(n) => &n.before,
            Node::Rule(n) => &n.before,
            Node::AtRule(n) => &n.before,
            Node::Comment(n) => &n.before,
        }
    }

    pub fn before_mut(&mut self) -> &mut String {
        match self {
            Node::Decl(n) => &mut n.before,
            Node::Rule(n) => &mut n.before,
            Node::AtRule(n) => &mut n.before,
            Node::Comment(n) => &mut n.before,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Rule(n) if !n.mixin => Some(&n.nodes),
            Node::AtRule(n) => n.nodes.as_deref(),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(n) if !n.mixin => Some(&mut n.nodes),
            Node::AtRule(n) => n.nodes.as_mut(),
            _ => None,
        }
    }
}

/// Index path from the root to a node: `[2, 0]` is the first child of the
/// root's third node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath(pub Vec<usize>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub nodes: Vec<Node>,
    /// Raw text after the last node.
    pub after: String,
    front_insertions: usize,
}

impl Root {
    pub fn new(nodes: Vec<Node>, after: String) -> Root {
        Root {
            nodes,
            after,
            front_insertions: 0,
        }
    }

    /// Inserts `node` as the root's first child.
    ///
    /// The former first node is moved onto its own line when it shared a
    /// line with the start of the file. Every call bumps
    /// [`front_insertions`](Root::front_insertions), which walkers use to keep
    /// their cursor on the node they were visiting.
    pub fn prepend(&mut self, node: Node) {
        if let Some(first) = self.nodes.first_mut() {
            let before = first.before_mut();
            if !before.contains('\n') {
                before.insert(0, '\n');
            }
        }
        self.nodes.insert(0, node);
        self.front_insertions += 1;
    }

    pub fn front_insertions(&self) -> usize {
        self.front_insertions
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (last, parents) = path.0.split_last()?;
        self.children_at(parents)?.get(*last)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (last, parents) = path.0.split_last()?;
        let mut nodes = &mut self.nodes;
        for index in parents {
            nodes = nodes.get_mut(*index)?.children_mut()?;
        }
        nodes.get_mut(*last)
    }

    pub fn decl(&self, path: &NodePath) -> Option<&Declaration> {
        match self.node(path)? {
            Node::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn decl_mut(&mut self, path: &NodePath) -> Option<&mut Declaration> {
        match self.node_mut(path)? {
            Node::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Children of the container at `parents` (the root itself when empty).
    pub fn children_at(&self, parents: &[usize]) -> Option<&[Node]> {
        let mut nodes: &[Node] = &self.nodes;
        for index in parents {
            nodes = nodes.get(*index)?.children()?;
        }
        Some(nodes)
    }
}

/// Character index of a declaration's value within the declaration's text.
pub fn declaration_value_index(decl: &Declaration) -> usize {
    decl.prop.chars().count() + decl.between.chars().count()
}

/// Character index of an at-rule's params within the at-rule's text.
pub fn at_rule_param_index(at_rule: &AtRule) -> usize {
    1 + at_rule.name.chars().count() + at_rule.after_name.chars().count()
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        write!(f, "{}{}", node.before(), node)?;
    }
    Ok(())
}

/// Prints a node without its leading `before` whitespace.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Decl(d) => write!(
                f,
                "{}{}{}{}{}",
                d.prop,
                d.between,
                d.value,
                d.important.as_deref().unwrap_or(""),
                d.terminator
            ),
            Node::Comment(c) => f.write_str(&c.text),
            Node::Rule(r) if r.mixin => write!(f, "{}{}", r.selector, r.terminator),
            Node::Rule(r) => {
                write!(f, "{}{}{{", r.selector, r.between)?;
                write_nodes(f, &r.nodes)?;
                write!(f, "{}}}{}", r.after, r.terminator)
            }
            Node::AtRule(a) => {
                write!(f, "@{}{}{}{}", a.name, a.after_name, a.params, a.between)?;
                if let Some(nodes) = &a.nodes {
                    f.write_str("{")?;
                    write_nodes(f, nodes)?;
                    write!(f, "{}}}", a.after)?;
                }
                f.write_str(&a.terminator)
            }
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)?;
        f.write_str(&self.after)
    }
}
