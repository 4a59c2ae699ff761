//! `selector-pseudo-element-case`: pseudo-elements in lower or upper case.

use super::options::{validate_options, OptionSpec, Possible};
use super::{expected_message, report, Rule, RuleInvocation, RuleMeta};
use crate::syntax::ast::{Node, Root};
use crate::syntax::selector::{is_standard_syntax_selector, pseudos, Pseudo};
use crate::syntax::walk::walk_rules;
use crate::violation::RuleResult;

pub const RULE_NAME: &str = "selector-pseudo-element-case";

/// Pseudo-elements that CSS 1 and 2 also allow with a single colon.
const LEVEL_ONE_AND_TWO_PSEUDO_ELEMENTS: &[&str] =
    &["before", "after", "first-line", "first-letter"];

pub struct SelectorPseudoElementCase;

fn is_pseudo_element(pseudo: &Pseudo) -> bool {
    pseudo.is_element()
        || LEVEL_ONE_AND_TWO_PSEUDO_ELEMENTS.contains(&pseudo.name().to_lowercase().as_str())
}

fn expected_case(value: &str, upper: bool) -> String {
    if upper {
        value.to_uppercase()
    } else {
        value.to_lowercase()
    }
}

/// Replaces each `(index, old, new)` in `selector`; edits are in ascending
/// index order.
fn rewrite(selector: &str, edits: &[(usize, String, String)]) -> String {
    let chars: Vec<char> = selector.chars().collect();
    let mut out = String::with_capacity(selector.len());
    let mut pos = 0;
    for (index, old, new) in edits {
        out.extend(&chars[pos..*index]);
        out.push_str(new);
        pos = index + old.chars().count();
    }
    out.extend(&chars[pos..]);
    out
}

impl Rule for SelectorPseudoElementCase {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Pseudo-element selectors must use the configured case"
    }

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            url: Some("https://stylelint.io/user-guide/rules/list/selector-pseudo-element-case"),
            fixable: true,
        }
    }

    fn check(&self, invocation: &RuleInvocation<'_>, root: &mut Root, result: &mut RuleResult) {
        let valid = validate_options(
            result,
            RULE_NAME,
            &[
                OptionSpec {
                    actual: Some(invocation.primary),
                    possible: Possible::OneOf(&["lower", "upper"]),
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
        let upper = invocation.primary.as_str() == Some("upper");
        let fix = invocation.can_fix(true);

        walk_rules(root, |root, path| {
            let Some(Node::Rule(rule)) = root.node(path) else {
                return;
            };
            if !rule.selector.contains(':') || !is_standard_syntax_selector(&rule.selector) {
                return;
            }

            let edits: Vec<(usize, String, String)> = pseudos(&rule.selector)
                .into_iter()
                .filter(is_pseudo_element)
                .filter_map(|pseudo| {
                    let expected = expected_case(&pseudo.value, upper);
                    (expected != pseudo.value).then_some((pseudo.index, pseudo.value, expected))
                })
                .collect();
            if edits.is_empty() {
                return;
            }

            if fix {
                let selector = rewrite(&rule.selector, &edits);
                if let Some(Node::Rule(rule)) = root.node_mut(path) {
                    rule.selector = selector;
                    result.fixed += 1;
                }
                return;
            }

            let Some(node) = root.node(path) else {
                return;
            };
            for (index, actual, expected) in &edits {
                report(
                    result,
                    invocation,
                    node,
                    *index,
                    expected_message(actual, expected),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_replaces_ranges() {
        let edits = vec![
            (1, "::BEFORE".to_string(), "::before".to_string()),
            (12, ":AFTER".to_string(), ":after".to_string()),
        ];
        assert_eq!(rewrite("a::BEFORE, b:AFTER", &edits), "a::before, b:after");
    }

    #[test]
    fn single_colon_only_for_legacy_elements() {
        let legacy = Pseudo {
            value: ":First-Line".into(),
            index: 0,
        };
        let class = Pseudo {
            value: ":HOVER".into(),
            index: 0,
        };
        assert!(is_pseudo_element(&legacy));
        assert!(!is_pseudo_element(&class));
    }
}
