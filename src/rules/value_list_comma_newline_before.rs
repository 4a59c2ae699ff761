//! `value-list-comma-newline-before`: newlines before commas of value lists.

use super::options::{validate_options, OptionSpec, Possible};
use super::whitespace::{check_newline_before, NewlineExpectation, NewlineProblem};
use super::{report, Rule, RuleInvocation, RuleMeta};
use crate::syntax::ast::{declaration_value_index, Node, Root};
use crate::syntax::value::{self, ValueNode};
use crate::syntax::walk::walk_decls;
use crate::violation::RuleResult;

pub const RULE_NAME: &str = "value-list-comma-newline-before";

pub struct ValueListCommaNewlineBefore;

fn message(problem: NewlineProblem) -> &'static str {
    match problem {
        NewlineProblem::ExpectedBefore => "Expected newline before \",\"",
        NewlineProblem::ExpectedBeforeMultiLine => {
            "Expected newline before \",\" in a multi-line list"
        }
        NewlineProblem::RejectedBeforeMultiLine => {
            "Unexpected whitespace before \",\" in a multi-line list"
        }
    }
}

/// Preprocessor variables, custom properties and interpolated names are
/// skipped.
fn is_standard_property(prop: &str) -> bool {
    !(prop.starts_with('@')
        || prop.starts_with('$')
        || prop.starts_with("--")
        || prop.contains("@{")
        || prop.contains("#{"))
}

/// Char indices of the commas separating list items. Commas nested in
/// functions or brackets, strings and comments are not list separators.
fn list_commas(value: &str) -> Vec<usize> {
    value::parse(value)
        .into_iter()
        .filter_map(|node| match node {
            ValueNode::Div {
                value: ',',
                source_index,
            } => Some(source_index),
            _ => None,
        })
        .collect()
}

impl Rule for ValueListCommaNewlineBefore {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Commas in value lists must be preceded by a newline"
    }

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            url: Some("https://stylelint.io/user-guide/rules/list/value-list-comma-newline-before"),
            fixable: false,
        }
    }

    fn check(&self, invocation: &RuleInvocation<'_>, root: &mut Root, result: &mut RuleResult) {
        let valid = validate_options(
            result,
            RULE_NAME,
            &[
                OptionSpec {
                    actual: Some(invocation.primary),
                    possible: Possible::OneOf(NewlineExpectation::OPTIONS),
                    optional: false,
                },
                OptionSpec {
                    actual: invocation.secondary,
                    possible: Possible::Keys(&[]),
                    optional: true,
                },
            ],
        );
        if !valid {
            return;
        }
        let Some(expectation) = invocation
            .primary
            .as_str()
            .and_then(NewlineExpectation::from_option)
        else {
            return;
        };

        walk_decls(root, |root, path| {
            let Some(node @ Node::Decl(decl)) = root.node(path) else {
                return;
            };
            if !is_standard_property(&decl.prop) {
                return;
            }
            let source: Vec<char> = node.to_string().chars().collect();
            let value_index = declaration_value_index(decl);
            for comma in list_commas(&decl.value) {
                let index = value_index + comma;
                if let Some(problem) = check_newline_before(&source, index, expectation) {
                    report(result, invocation, node, index, message(problem).to_string());
                }
            }
        });
    }
}
