//! `unit-allowed-list`: only listed units may appear in values and media
//! queries.

use super::options::{
    is_object_with_string_or_regex_arrays, is_string, is_string_or_regex,
    matches_string_or_regex, string_list, validate_options, OptionSpec, Possible,
};
use super::{report, Rule, RuleInvocation, RuleMeta};
use crate::syntax::ast::{at_rule_param_index, declaration_value_index, Node, Root};
use crate::syntax::value::{self, unit_of, ValueNode, Walk};
use crate::syntax::walk::{walk_at_rules, walk_decls};
use crate::violation::RuleResult;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const RULE_NAME: &str = "unit-allowed-list";

static RE_MEDIA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^media$").unwrap());

const SECONDARY_OPTIONS: &[(&str, Possible)] = &[
    ("ignoreFunctions", Possible::Check(is_string_or_regex)),
    (
        "ignoreProperties",
        Possible::Check(is_object_with_string_or_regex_arrays),
    ),
];

pub struct UnitAllowedList;

/// Resolved options for one invocation.
struct Allowed<'a> {
    units: Vec<String>,
    ignore_functions: Vec<String>,
    ignore_properties: Option<&'a Value>,
}

impl Allowed<'_> {
    /// Units found in `text` that are not allowed, with their char index in
    /// `text`. `prop` is the owning declaration's property, if any.
    fn rejected(&self, text: &str, prop: Option<&str>) -> Vec<(usize, String)> {
        let nodes = value::parse(text);
        let mut rejected = Vec::new();
        value::walk(&nodes, &mut |node| {
            if let ValueNode::Function { name, .. } = node {
                let name = name.to_lowercase();
                if name == "url" || matches_string_or_regex(&name, &self.ignore_functions) {
                    return Walk::Skip;
                }
            }
            let Some(unit) = unit_of(node) else {
                return Walk::Continue;
            };
            let lower = unit.to_lowercase();
            if self.units.contains(&lower) || self.ignored_for(&lower, prop) {
                return Walk::Continue;
            }
            rejected.push((node.source_index(), unit.to_string()));
            Walk::Continue
        });
        rejected
    }

    fn ignored_for(&self, unit: &str, prop: Option<&str>) -> bool {
        let (Some(props), Some(prop)) = (self.ignore_properties, prop) else {
            return false;
        };
        let patterns = string_list(props.get(unit));
        matches_string_or_regex(prop, &patterns)
    }
}

fn rejected_message(unit: &str) -> String {
    format!("Unexpected unit \"{unit}\"")
}

impl Rule for UnitAllowedList {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Only units from the allowed list may be used"
    }

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            url: Some("https://stylelint.io/user-guide/rules/list/unit-allowed-list"),
            fixable: false,
        }
    }

    fn primary_option_array(&self) -> bool {
        true
    }

    fn check(&self, invocation: &RuleInvocation<'_>, root: &mut Root, result: &mut RuleResult) {
        let valid = validate_options(
            result,
            RULE_NAME,
            &[
                OptionSpec {
                    actual: Some(invocation.primary),
                    possible: Possible::Check(is_string),
                    optional: false,
                },
                OptionSpec {
                    actual: invocation.secondary,
                    possible: Possible::Keys(SECONDARY_OPTIONS),
                    optional: true,
                },
            ],
        );
        if !valid {
            return;
        }

        let allowed = Allowed {
            units: string_list(Some(invocation.primary)),
            ignore_functions: string_list(invocation.secondary_option("ignoreFunctions")),
            ignore_properties: invocation.secondary_option("ignoreProperties"),
        };

        walk_at_rules(root, &RE_MEDIA, |root, path| {
            let Some(node @ Node::AtRule(at)) = root.node(path) else {
                return;
            };
            let offset = at_rule_param_index(at);
            for (index, unit) in allowed.rejected(&at.params, None) {
                report(result, invocation, node, offset + index, rejected_message(&unit));
            }
        });

        walk_decls(root, |root, path| {
            let Some(node @ Node::Decl(decl)) = root.node(path) else {
                return;
            };
            let offset = declaration_value_index(decl);
            for (index, unit) in allowed.rejected(&decl.value, Some(&decl.prop)) {
                report(result, invocation, node, offset + index, rejected_message(&unit));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_disallowed_units_with_offsets() {
        let allowed = Allowed {
            units: vec!["px".into()],
            ignore_functions: Vec::new(),
            ignore_properties: None,
        };
        assert_eq!(
            allowed.rejected("1px 2EM calc(3vh*2) url(a.5em)", Some("margin")),
            vec![(4, "EM".to_string()), (13, "vh".to_string())]
        );
    }

    #[test]
    fn honours_ignore_options() {
        let props = json!({ "em": ["line-height", "/^font/"] });
        let allowed = Allowed {
            units: vec!["px".into()],
            ignore_functions: vec!["/^calc$/".into()],
            ignore_properties: Some(&props),
        };
        assert!(allowed.rejected("2em calc(1vh)", Some("font-size")).is_empty());
        assert_eq!(
            allowed.rejected("2em", Some("margin")),
            vec![(0, "em".to_string())]
        );
        assert_eq!(allowed.rejected("2em", None), vec![(0, "em".to_string())]);
    }
}
