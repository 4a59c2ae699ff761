use lessguard::config::Config;
use lessguard::lint::{lint_source, LintOutcome};
use serde_json::{json, Value};
use std::path::Path;

fn lint(source: &str, setting: Value, fix: bool) -> LintOutcome {
    let config = Config::default().with_rule("selector-pseudo-element-case", setting);
    lint_source(source, Path::new("test.less"), &config, fix, &[])
}

fn messages(outcome: &LintOutcome) -> Vec<(String, usize)> {
    outcome
        .report
        .violations
        .iter()
        .map(|v| (v.message.clone(), v.column))
        .collect()
}

#[test]
fn lower_reports_upper_case_pseudo_elements() {
    let outcome = lint("a::BEFORE, b:After, c:HOVER {}", json!("lower"), false);
    assert_eq!(
        messages(&outcome),
        vec![
            ("Expected \"::BEFORE\" to be \"::before\"".to_string(), 2),
            ("Expected \":After\" to be \":after\"".to_string(), 13),
        ]
    );
}

#[test]
fn upper_reports_lower_case_pseudo_elements() {
    let outcome = lint("a::before, a::-webkit-scrollbar {}", json!("upper"), false);
    assert_eq!(
        messages(&outcome),
        vec![
            ("Expected \"::before\" to be \"::BEFORE\"".to_string(), 2),
            (
                "Expected \"::-webkit-scrollbar\" to be \"::-WEBKIT-SCROLLBAR\"".to_string(),
                13
            ),
        ]
    );
}

#[test]
fn pseudo_classes_are_not_checked() {
    let outcome = lint("a:HOVER, li:Not(.x):First-Child {}", json!("lower"), false);
    assert!(outcome.report.violations.is_empty());
}

#[test]
fn nested_rules_are_checked() {
    let source = "@media print {\n  .a {\n    &::AFTER { content: \"\"; }\n  }\n}\n";
    let outcome = lint(source, json!("lower"), false);
    let v = &outcome.report.violations;
    assert_eq!(v.len(), 1);
    assert_eq!((v[0].line, v[0].column), (3, 6));
}

#[test]
fn fix_rewrites_selector() {
    let outcome = lint("a::BEFORE, b:After, c:HOVER { color: red }", json!("lower"), true);
    assert_eq!(
        outcome.output.as_deref(),
        Some("a::before, b:after, c:HOVER { color: red }")
    );
    assert!(outcome.report.violations.is_empty());
    assert_eq!(outcome.report.fixed_count(), 1);
}

#[test]
fn less_specific_selectors_are_skipped() {
    let source = ".@{name}::BEFORE {}\na:extend(.b)::AFTER {}\n.m() when (@a) { &::AFTER {} }";
    let outcome = lint(source, json!("lower"), false);
    assert_eq!(outcome.report.violations.len(), 1);
    assert_eq!(outcome.report.violations[0].line, 3);
}

#[test]
fn invalid_expectation_is_rejected() {
    let outcome = lint("a::BEFORE {}", json!("camel"), false);
    assert!(outcome.report.violations.is_empty());
    assert_eq!(
        outcome.report.invalid_options,
        vec![
            "selector-pseudo-element-case: Invalid option value \"camel\" for rule \"selector-pseudo-element-case\""
        ]
    );
}
