//! `global-variables`: literal values that a shared variables file defines
//! must be written as the variable.
//!
//! The primary option is the path of a Less file of `@name: value;`
//! definitions. Every declaration whose raw value equals one of those values
//! is reported, or in fix mode rewritten to `@name`, with a single
//! `@import (reference) "{}<path>";` prepended to the file. A missing or
//! broken variables file turns the rule off for the run.

pub mod dictionary;
pub mod import;
pub mod matcher;

use super::options::{
    is_boolean, is_string, is_string_or_regex, string_list, validate_options, OptionSpec,
    Possible,
};
use super::{expected_message, report, Rule, RuleInvocation, RuleMeta};
use crate::syntax::ast::{declaration_value_index, Node, Root};
use crate::syntax::walk::walk_decls;
use crate::violation::RuleResult;
use dictionary::Variables;
use import::{set_declaration_value, ImportGuard};
use matcher::{find_substitution, IgnoredProperties};
use serde_json::Value;
use std::path::Path;

pub const RULE_NAME: &str = "global-variables";

const SECONDARY_OPTIONS: &[(&str, Possible)] = &[
    ("fixable", Possible::Check(is_boolean)),
    // Misspelling accepted by older configurations.
    ("fixible", Possible::Check(is_boolean)),
    ("ignoreProperties", Possible::Check(is_string_or_regex)),
];

pub struct GlobalVariables;

impl GlobalVariables {
    /// `fixable: false` (or `fixible: false`) opts the rule out of fixing.
    fn allows_fix(invocation: &RuleInvocation<'_>) -> bool {
        invocation
            .secondary_option("fixable")
            .or_else(|| invocation.secondary_option("fixible"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

impl Rule for GlobalVariables {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Values defined in the shared variables file must use the variable"
    }

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            url: None,
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
        let Some(variables_path) = invocation.primary.as_str() else {
            return;
        };

        let ignored = match invocation.secondary_option("ignoreProperties") {
            Some(patterns) => match IgnoredProperties::new(&string_list(Some(patterns))) {
                Ok(ignored) => ignored,
                Err(e) => {
                    result.invalid_options.push(format!(
                        "Invalid value for option \"ignoreProperties\" of rule \"{RULE_NAME}\": {e}"
                    ));
                    return;
                }
            },
            None => IgnoredProperties::default(),
        };

        let variables = match dictionary::load(Path::new(variables_path)) {
            Variables::Dictionary(variables) => variables,
            Variables::Absent => return,
        };

        let fix = invocation.can_fix(Self::allows_fix(invocation));
        let mut guard = ImportGuard::new(variables_path);

        walk_decls(root, |root, path| {
            let Some(substitution) = root
                .decl(path)
                .and_then(|decl| find_substitution(decl, &variables, &ignored))
            else {
                return;
            };

            if fix {
                // Rewrite before importing: prepending shifts `path`.
                if let Some(decl) = root.decl_mut(path) {
                    set_declaration_value(decl, &substitution.replacement);
                    result.fixed += 1;
                }
                guard.ensure_import(root);
                return;
            }

            if let Some(node @ Node::Decl(decl)) = root.node(path) {
                report(
                    result,
                    invocation,
                    node,
                    declaration_value_index(decl),
                    expected_message(&substitution.actual, &substitution.replacement),
                );
            }
        });
    }
}
