//! Option shape validation shared by all rules.
//!
//! A rule declares, for its primary and secondary option, which shapes are
//! acceptable. [`validate_options`] records one message per mismatch in the
//! [`RuleResult`] and tells the rule whether it may run.

use crate::violation::RuleResult;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Secondary option every rule accepts without declaring it.
const SEVERITY_OPTION: &str = "severity";

/// Acceptable shape of an option value. Arrays are validated element-wise
/// against [`OneOf`](Possible::OneOf) and [`Check`](Possible::Check).
#[derive(Clone, Copy)]
pub enum Possible {
    /// One of a fixed set of strings.
    OneOf(&'static [&'static str]),
    /// A predicate on the value.
    Check(fn(&Value) -> bool),
    /// An object whose keys must be listed; each key's value is validated
    /// against the paired shape.
    Keys(&'static [(&'static str, Possible)]),
}

pub struct OptionSpec<'a> {
    pub actual: Option<&'a Value>,
    pub possible: Possible,
    /// An absent value is acceptable.
    pub optional: bool,
}

/// Validates every spec, recording problems in `result`. Returns `true` when
/// all options are acceptable.
pub fn validate_options(result: &mut RuleResult, rule: &str, specs: &[OptionSpec<'_>]) -> bool {
    let before = result.invalid_options.len();
    for spec in specs {
        validate(result, rule, spec);
    }
    result.invalid_options.len() == before
}

fn validate(result: &mut RuleResult, rule: &str, spec: &OptionSpec<'_>) {
    let actual = match spec.actual {
        None | Some(Value::Null) => {
            if !spec.optional {
                result
                    .invalid_options
                    .push(format!("Expected option value for rule \"{rule}\""));
            }
            return;
        }
        Some(actual) => actual,
    };

    match spec.possible {
        Possible::Keys(keys) => {
            let Some(object) = actual.as_object() else {
                result.invalid_options.push(format!(
                    "Invalid option value {} for rule \"{rule}\": should be an object",
                    display(actual)
                ));
                return;
            };
            for (key, value) in object {
                let declared = keys.iter().find(|(k, _)| k == key).map(|(_, p)| *p);
                let possible = match declared {
                    Some(possible) => possible,
                    None if key == SEVERITY_OPTION => Possible::Check(is_severity),
                    None => {
                        result
                            .invalid_options
                            .push(format!("Invalid option name \"{key}\" for rule \"{rule}\""));
                        continue;
                    }
                };
                for item in each(value) {
                    if !is_valid(possible, item) {
                        result.invalid_options.push(format!(
                            "Invalid value {} for option \"{key}\" of rule \"{rule}\"",
                            display(item)
                        ));
                    }
                }
            }
        }
        possible => {
            for item in each(actual) {
                if !is_valid(possible, item) {
                    result.invalid_options.push(format!(
                        "Invalid option value {} for rule \"{rule}\"",
                        display(item)
                    ));
                }
            }
        }
    }
}

fn each(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn is_valid(possible: Possible, value: &Value) -> bool {
    match possible {
        Possible::OneOf(options) => value.as_str().is_some_and(|s| options.contains(&s)),
        Possible::Check(check) => check(value),
        Possible::Keys(_) => value.is_object(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// A string that is either a literal or a `/regex/` that compiles.
pub fn is_string_or_regex(value: &Value) -> bool {
    match value.as_str() {
        Some(s) => regex_literal(s).map_or(true, |pattern| Regex::new(pattern).is_ok()),
        None => false,
    }
}

/// An object whose values are strings/regexes or arrays of them.
pub fn is_object_with_string_or_regex_arrays(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object
            .values()
            .all(|v| each(v).into_iter().all(is_string_or_regex))
    })
}

/// A severity name accepted by the `severity` secondary option.
pub fn is_severity(value: &Value) -> bool {
    matches!(value.as_str(), Some("error") | Some("warning"))
}

/// Body of a `/regex/` literal, or `None` for a plain string.
pub fn regex_literal(s: &str) -> Option<&str> {
    (s.len() >= 2 && s.starts_with('/') && s.ends_with('/')).then(|| &s[1..s.len() - 1])
}

/// Whether `input` equals one of the string patterns or matches one of the
/// `/regex/` patterns.
///
/// ```
/// use lessguard::rules::options::matches_string_or_regex;
///
/// let patterns = vec!["url".to_string(), "/^var/".to_string()];
/// assert!(matches_string_or_regex("url", &patterns));
/// assert!(matches_string_or_regex("variable", &patterns));
/// assert!(!matches_string_or_regex("calc", &patterns));
/// ```
pub fn matches_string_or_regex(input: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| match regex_literal(pattern) {
        Some(body) => Regex::new(body).is_ok_and(|re| re.is_match(input)),
        None => pattern == input,
    })
}

/// Compiles `pattern` (plain or `/regex/`) as a case-insensitive regex.
pub fn case_insensitive_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(regex_literal(pattern).unwrap_or(pattern))
        .case_insensitive(true)
        .build()
}

/// Strings of a value that is a string or an array of strings.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .map(|v| {
            each(v)
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEYS: &[(&str, Possible)] = &[
        ("fixable", Possible::Check(is_boolean)),
        ("ignoreFunctions", Possible::Check(is_string_or_regex)),
    ];

    #[test]
    fn accepts_matching_options() {
        let mut result = RuleResult::new("r");
        let primary = json!("lower");
        let secondary = json!({ "fixable": false, "severity": "warning" });
        assert!(validate_options(
            &mut result,
            "r",
            &[
                OptionSpec {
                    actual: Some(&primary),
                    possible: Possible::OneOf(&["lower", "upper"]),
                    optional: false,
                },
                OptionSpec {
                    actual: Some(&secondary),
                    possible: Possible::Keys(KEYS),
                    optional: true,
                },
            ]
        ));
        assert!(result.invalid_options.is_empty());
    }

    #[test]
    fn reports_each_problem() {
        let mut result = RuleResult::new("r");
        let primary = json!(["px", 3]);
        let secondary = json!({ "fixable": "no", "bogus": 1 });
        assert!(!validate_options(
            &mut result,
            "r",
            &[
                OptionSpec {
                    actual: Some(&primary),
                    possible: Possible::Check(is_string),
                    optional: false,
                },
                OptionSpec {
                    actual: Some(&secondary),
                    possible: Possible::Keys(KEYS),
                    optional: true,
                },
            ]
        ));
        assert_eq!(
            result.invalid_options,
            vec![
                "Invalid option value 3 for rule \"r\"",
                "Invalid option name \"bogus\" for rule \"r\"",
                "Invalid value \"no\" for option \"fixable\" of rule \"r\"",
            ]
        );
    }

    #[test]
    fn missing_required_option_is_invalid() {
        let mut result = RuleResult::new("r");
        assert!(!validate_options(
            &mut result,
            "r",
            &[OptionSpec {
                actual: None,
                possible: Possible::Check(is_string),
                optional: false,
            }]
        ));
        assert_eq!(
            result.invalid_options,
            vec!["Expected option value for rule \"r\""]
        );
    }

    #[test]
    fn regex_literals_must_compile() {
        assert!(is_string_or_regex(&json!("/^url$/")));
        assert!(is_string_or_regex(&json!("url")));
        assert!(!is_string_or_regex(&json!("/(/")));
        assert!(!is_string_or_regex(&json!(1)));
    }
}
