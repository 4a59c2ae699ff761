use lessguard::config::Config;
use lessguard::lint::lint_source;
use lessguard::output::{self, OutputFormat};
use lessguard::violation::LintReport;
use serde_json::json;
use std::path::Path;

fn config() -> Config {
    Config::default().with_rule("unit-allowed-list", json!(["px"]))
}

fn dirty_report() -> LintReport {
    lint_source(
        "a {\n  margin: 1em;\n}\n",
        Path::new("styles/dirty.less"),
        &config(),
        false,
        &[],
    )
    .report
}

fn clean_report() -> LintReport {
    lint_source("a { margin: 1px; }", Path::new("styles/clean.less"), &config(), false, &[]).report
}

#[test]
fn json_output_is_valid() {
    let json = output::format_reports(&[dirty_report(), clean_report()], &OutputFormat::Json);

    let parsed: serde_json::Value = serde_json::from_str(&json).expect("JSON should be valid");
    assert!(!parsed["passed"].as_bool().unwrap());
    assert_eq!(parsed["summary"]["errors"], 1);
    assert_eq!(parsed["files"].as_array().unwrap().len(), 2);
    let violation = &parsed["files"][0]["violations"][0];
    assert_eq!(violation["rule"], "unit-allowed-list");
    assert_eq!(violation["line"], 2);
    assert_eq!(violation["column"], 11);
    assert_eq!(violation["severity"], "error");
    assert_eq!(violation["node"], "decl");
}

#[test]
fn json_clean_run_passes() {
    let json = output::format_reports(&[clean_report()], &OutputFormat::Json);

    let parsed: serde_json::Value = serde_json::from_str(&json).expect("JSON should be valid");
    assert!(parsed["passed"].as_bool().unwrap());
    assert_eq!(parsed["files"][0]["status"], "passed");
}

#[test]
fn sarif_output_is_valid() {
    let sarif = output::format_reports(&[dirty_report()], &OutputFormat::Sarif);

    let parsed: serde_json::Value =
        serde_json::from_str(&sarif).expect("SARIF JSON should be valid");
    assert_eq!(parsed["version"], "2.1.0");
    assert!(parsed["runs"][0]["tool"]["driver"]["name"] == "lessguard");
    let result = &parsed["runs"][0]["results"][0];
    assert_eq!(result["ruleId"], "unit-allowed-list");
    assert_eq!(result["level"], "error");
    let region = &result["locations"][0]["physicalLocation"]["region"];
    assert_eq!(region["startLine"], 2);
    assert_eq!(region["startColumn"], 11);
    assert_eq!(
        result["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "styles/dirty.less"
    );
}

#[test]
fn pretty_output_lists_violations() {
    colored::control::set_override(false);
    let pretty = output::format_reports(&[dirty_report()], &OutputFormat::Pretty);

    assert!(pretty.contains("styles/dirty.less"));
    assert!(pretty.contains("2:11"));
    assert!(pretty.contains("[ERROR] Unexpected unit \"em\""));
    assert!(pretty.contains("Result: FAILED"));
}

#[test]
fn pretty_output_clean_passes() {
    colored::control::set_override(false);
    let pretty = output::format_reports(&[clean_report()], &OutputFormat::Pretty);

    assert!(!pretty.contains("styles/clean.less"));
    assert!(pretty.contains("Result: PASSED"));
    assert!(pretty.contains("1 files, 0 errors"));
}
