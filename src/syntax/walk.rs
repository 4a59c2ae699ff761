//! Depth-first, document-order traversal over a mutable [`Root`].
//!
//! Callbacks receive the whole tree plus the [`NodePath`] of the visited node,
//! so they can read or rewrite that node and also edit the root's front via
//! [`Root::prepend`]. After each callback the walker shifts its cursor by the
//! number of nodes prepended in the meantime: the walk continues with the
//! node that followed the visited one and never re-enters the inserted nodes.

use super::ast::{Node, NodePath, Root};
use regex::Regex;

/// Visits every node of `root`.
pub fn walk<F>(root: &mut Root, mut visit: F)
where
    F: FnMut(&mut Root, &NodePath),
{
    let mut cursor = vec![0usize];
    while let Some(&index) = cursor.last() {
        let parents = &cursor[..cursor.len() - 1];
        let len = root.children_at(parents).map_or(0, <[Node]>::len);
        if index >= len {
            cursor.pop();
            if let Some(last) = cursor.last_mut() {
                *last += 1;
            }
            continue;
        }

        let inserted_before = root.front_insertions();
        visit(root, &NodePath(cursor.clone()));
        cursor[0] += root.front_insertions() - inserted_before;

        let descend = root
            .node(&NodePath(cursor.clone()))
            .and_then(Node::children)
            .is_some_and(|children| !children.is_empty());
        if descend {
            cursor.push(0);
        } else if let Some(last) = cursor.last_mut() {
            *last += 1;
        }
    }
}

/// Visits every declaration.
pub fn walk_decls<F>(root: &mut Root, mut visit: F)
where
    F: FnMut(&mut Root, &NodePath),
{
    walk(root, |root, path| {
        if matches!(root.node(path), Some(Node::Decl(_))) {
            visit(root, path);
        }
    });
}

/// Visits every rule with a block (mixin calls are skipped).
pub fn walk_rules<F>(root: &mut Root, mut visit: F)
where
    F: FnMut(&mut Root, &NodePath),
{
    walk(root, |root, path| {
        if matches!(root.node(path), Some(Node::Rule(rule)) if !rule.mixin) {
            visit(root, path);
        }
    });
}

/// Visits every non-variable at-rule whose name matches `name`.
pub fn walk_at_rules<F>(root: &mut Root, name: &Regex, mut visit: F)
where
    F: FnMut(&mut Root, &NodePath),
{
    walk(root, |root, path| {
        if matches!(root.node(path), Some(Node::AtRule(at)) if !at.variable && name.is_match(&at.name))
        {
            visit(root, path);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::AtRule;
    use crate::syntax::parser::parse;

    fn props(root: &mut Root) -> Vec<String> {
        let mut seen = Vec::new();
        walk_decls(root, |root, path| {
            seen.push(root.decl(path).map(|d| d.prop.clone()).unwrap_or_default());
        });
        seen
    }

    #[test]
    fn visits_declarations_in_document_order() {
        let mut root =
            parse("a { b: 1; @media x { c: 2; d { e: 3 } } f: 4 }\ng { h: 5 }").unwrap();
        assert_eq!(props(&mut root), vec!["b", "c", "e", "f", "h"]);
    }

    #[test]
    fn prepending_during_walk_neither_skips_nor_revisits() {
        let mut root = parse("a { b: 1; c: 2 }\nd { e: 3 }").unwrap();
        let mut seen = Vec::new();
        walk_decls(&mut root, |root, path| {
            seen.push(root.decl(path).map(|d| d.prop.clone()).unwrap_or_default());
            root.prepend(Node::AtRule(AtRule::synthesized("import", "\"x\"")));
        });
        assert_eq!(seen, vec!["b", "c", "e"]);
        assert_eq!(root.nodes.len(), 5);
    }

    #[test]
    fn at_rule_filter_matches_name() {
        let mut root = parse("@media a { x: 1 }\n@supports b {}\n@MEDIA c {}\n@v: 1;").unwrap();
        let re = Regex::new("(?i)^media$").unwrap();
        let mut params = Vec::new();
        walk_at_rules(&mut root, &re, |root, path| {
            if let Some(Node::AtRule(at)) = root.node(path) {
                params.push(at.params.clone());
            }
        });
        assert_eq!(params, vec!["a", "c"]);
    }

    #[test]
    fn rule_walk_skips_mixin_calls() {
        let mut root = parse(".a { .m(); .b { } }").unwrap();
        let mut selectors = Vec::new();
        walk_rules(&mut root, |root, path| {
            if let Some(Node::Rule(rule)) = root.node(path) {
                selectors.push(rule.selector.clone());
            }
        });
        assert_eq!(selectors, vec![".a", ".b"]);
    }
}
