//! Lint rules and the contract they share.
//!
//! Every rule implements [`Rule`]. A run hands the rule a [`RuleInvocation`]
//! (primary option, secondary options, run mode) together with the parsed
//! tree and a fresh [`RuleResult`]. The rule then:
//!
//! 1. validates its options with [`options::validate_options`] and returns
//!    early, having done nothing, when they are rejected;
//! 2. walks the tree with [`crate::syntax::walk`];
//! 3. for each problem either rewrites the node (when
//!    [`RuleInvocation::can_fix`] allows it) or calls [`report`], never both.
//!
//! Rules never see each other's results; each gets its own full traversal.
//!
//! Use [`all_rules`] to obtain every registered rule and [`find_rule`] to look
//! one up by name.

pub mod global_variables;
pub mod options;
pub mod selector_pseudo_element_case;
pub mod unit_allowed_list;
pub mod value_list_comma_newline_before;
pub mod whitespace;

use crate::syntax::ast::{Node, Root};
use crate::violation::{RuleResult, Severity, Violation};
use serde_json::Value;

/// Run mode shared by all rules of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Fixing was requested for this run.
    pub fix: bool,
}

/// Options and mode for one rule over one tree. Immutable for the duration of
/// the traversal.
#[derive(Debug, Clone, Copy)]
pub struct RuleInvocation<'a> {
    pub primary: &'a Value,
    pub secondary: Option<&'a Value>,
    pub context: RuleContext,
    /// Severity given to every violation this invocation reports.
    pub severity: Severity,
}

impl<'a> RuleInvocation<'a> {
    /// Builds an invocation, reading the `severity` secondary option
    /// (defaults to [`Severity::Error`]).
    pub fn new(primary: &'a Value, secondary: Option<&'a Value>, context: RuleContext) -> Self {
        let severity = secondary
            .and_then(|s| s.get("severity"))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Severity::Error);
        RuleInvocation {
            primary,
            secondary,
            context,
            severity,
        }
    }

    pub fn secondary_option(&self, key: &str) -> Option<&'a Value> {
        self.secondary.and_then(|s| s.get(key))
    }

    /// Whether the rule may rewrite nodes: fixing must be requested for the
    /// run and allowed by the rule itself.
    pub fn can_fix(&self, rule_allows: bool) -> bool {
        self.context.fix && rule_allows
    }
}

/// Static facts about a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    /// Documentation page for the rule, when one exists.
    pub url: Option<&'static str>,
    /// The rule knows how to rewrite what it reports.
    pub fixable: bool,
}

/// A lint rule.
///
/// Implementers must be [`Send`] + [`Sync`]: files are linted in parallel and
/// rules are shared between threads. A single invocation is always
/// single-threaded.
pub trait Rule: Send + Sync {
    /// Unique rule name (e.g., `"global-variables"`).
    fn name(&self) -> &'static str;

    /// Short description for listings.
    fn description(&self) -> &'static str;

    fn meta(&self) -> RuleMeta;

    /// `true` when the primary option is itself a list, so a two-element
    /// setting `[a, b]` is a primary list rather than `[primary, secondary]`.
    fn primary_option_array(&self) -> bool {
        false
    }

    /// Runs the rule over `root`, reporting into `result`.
    fn check(&self, invocation: &RuleInvocation<'_>, root: &mut Root, result: &mut RuleResult);
}

/// Returns every registered rule.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(global_variables::GlobalVariables),
        Box::new(selector_pseudo_element_case::SelectorPseudoElementCase),
        Box::new(unit_allowed_list::UnitAllowedList),
        Box::new(value_list_comma_newline_before::ValueListCommaNewlineBefore),
    ]
}

pub fn find_rule(name: &str) -> Option<Box<dyn Rule>> {
    all_rules().into_iter().find(|rule| rule.name() == name)
}

/// Metadata for a single rule, used by the `list-rules` and `explain`
/// commands.
pub struct RuleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub url: Option<&'static str>,
    pub fixable: bool,
}

pub fn rule_infos() -> Vec<RuleInfo> {
    all_rules()
        .iter()
        .map(|rule| {
            let meta = rule.meta();
            RuleInfo {
                name: rule.name(),
                description: rule.description(),
                url: meta.url,
                fixable: meta.fixable,
            }
        })
        .collect()
}

/// Records a violation at `index` characters into `node`'s printed text.
///
/// Nodes without a source position were inserted by a fix and are never
/// reported on.
pub fn report(
    result: &mut RuleResult,
    invocation: &RuleInvocation<'_>,
    node: &Node,
    index: usize,
    message: String,
) {
    let Some(span) = node.source() else {
        tracing::debug!(rule = %result.rule, "skipping report on synthesized node");
        return;
    };
    let position = span.start.advance(&node.to_string(), index);
    result.violations.push(Violation {
        rule: result.rule.clone(),
        message,
        severity: invocation.severity,
        file: None,
        node: node.kind(),
        index,
        line: position.line,
        column: position.column,
        suppressed: false,
        suppression_reason: None,
    });
}

/// `Expected "<actual>" to be "<expected>"`, shared by rules that propose a
/// replacement.
pub fn expected_message(actual: &str, expected: &str) -> String {
    format!("Expected \"{actual}\" to be \"{expected}\"")
}
