//! Fix-mode edits: value rewrites and the one-time reference import.

use crate::syntax::ast::{AtRule, Declaration, Node, Root};
use std::path::Path;

/// Placeholder the build resolves to the project's import root.
const IMPORT_ROOT_PLACEHOLDER: &str = "{}";

/// Path written into the inserted import: extension dropped, one leading `.`
/// dropped, placeholder prepended.
///
/// ```
/// use lessguard::rules::global_variables::import::import_path;
///
/// assert_eq!(import_path("./styles/vars.less"), "{}/styles/vars");
/// assert_eq!(import_path("styles/vars.less"), "{}styles/vars");
/// ```
pub fn import_path(variables_path: &str) -> String {
    let mut path = variables_path;
    if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
        path = &path[..path.len() - ext.len() - 1];
    }
    path = path.strip_prefix('.').unwrap_or(path);
    format!("{IMPORT_ROOT_PLACEHOLDER}{path}")
}

/// `@import (reference) "{}<path>";` without source position.
pub fn import_node(variables_path: &str) -> Node {
    Node::AtRule(AtRule::synthesized(
        "import",
        &format!("(reference) \"{}\"", import_path(variables_path)),
    ))
}

/// Whether a top-level `@import` already targets `variables_path`: the
/// import's filename, stripped of braces and quotes, must occur inside the
/// configured path.
pub fn has_import(root: &Root, variables_path: &str) -> bool {
    root.nodes.iter().any(|node| match node {
        Node::AtRule(at) => at.import_filename().is_some_and(|filename| {
            let bare: String = filename
                .chars()
                .filter(|c| !matches!(c, '{' | '}' | '"' | '\''))
                .collect();
            variables_path.contains(&bare)
        }),
        _ => false,
    })
}

/// Value-only rewrite; `!important` and the terminator are kept.
pub fn set_declaration_value(decl: &mut Declaration, value: &str) {
    decl.value = value.to_string();
}

/// Makes sure the variables file is imported, checking at most once per
/// rule invocation.
#[derive(Debug)]
pub struct ImportGuard<'a> {
    variables_path: &'a str,
    settled: bool,
}

impl<'a> ImportGuard<'a> {
    pub fn new(variables_path: &'a str) -> Self {
        ImportGuard {
            variables_path,
            settled: false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Prepends the import unless it was handled already or the file imports
    /// the variables itself. Returns `true` when a node was inserted.
    pub fn ensure_import(&mut self, root: &mut Root) -> bool {
        if self.settled {
            return false;
        }
        self.settled = true;
        if has_import(root, self.variables_path) {
            tracing::debug!(path = self.variables_path, "variables already imported");
            return false;
        }
        root.prepend(import_node(self.variables_path));
        tracing::debug!(path = self.variables_path, "inserted variables import");
        true
    }
}
