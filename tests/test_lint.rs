use lessguard::config::Config;
use lessguard::lint::{collect_files, lint_file, lint_paths, lint_source};
use lessguard::violation::{LintStatus, PARSE_ERROR_RULE};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn pseudo_config() -> Config {
    Config::default().with_rule("selector-pseudo-element-case", json!("lower"))
}

#[test]
fn parse_error_becomes_a_single_violation() {
    let outcome = lint_source("a {\n  color: red;\n", Path::new("broken.less"), &pseudo_config(), false, &[]);
    let report = outcome.report;
    assert_eq!(report.status, LintStatus::Failed);
    assert!(report.rule_results.is_empty());
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule, PARSE_ERROR_RULE);
    assert_eq!(report.violations[0].line, 1);
}

#[test]
fn rules_run_in_sequence_on_the_same_tree() {
    let config = pseudo_config().with_rule("unit-allowed-list", json!(["px"]));
    let outcome = lint_source(
        "a::BEFORE { top: 1em; }",
        Path::new("a.less"),
        &config,
        true,
        &[],
    );
    assert_eq!(outcome.output.as_deref(), Some("a::before { top: 1em; }"));
    let rules: Vec<&str> = outcome
        .report
        .rule_results
        .iter()
        .map(|r| r.rule.as_str())
        .collect();
    assert_eq!(rules, vec!["selector-pseudo-element-case", "unit-allowed-list"]);
    assert_eq!(outcome.report.violations.len(), 1);
    assert_eq!(outcome.report.violations[0].rule, "unit-allowed-list");
}

#[test]
fn unchanged_source_has_no_output() {
    let outcome = lint_source("a::before {}", Path::new("a.less"), &pseudo_config(), true, &[]);
    assert!(outcome.output.is_none());
    assert!(!outcome.report.fixed);
}

#[test]
fn collect_files_filters_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.less"), "").unwrap();
    fs::write(dir.path().join("a.css"), "").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::write(dir.path().join("nested/c.less"), "").unwrap();

    let files: Vec<PathBuf> = collect_files(dir.path(), &Config::default())
        .into_iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("a.css"),
            PathBuf::from("b.less"),
            PathBuf::from("nested/c.less"),
        ]
    );
}

#[test]
fn lint_paths_fixes_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let fixable = dir.path().join("fixable.less");
    let clean = dir.path().join("clean.less");
    fs::write(&fixable, "a::AFTER { color: red }\n").unwrap();
    fs::write(&clean, "a::after { color: red }\n").unwrap();

    let reports = lint_paths(&[dir.path().to_path_buf()], &pseudo_config(), true);
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.passed));
    assert_eq!(reports.iter().filter(|r| r.fixed).count(), 1);
    assert_eq!(
        fs::read_to_string(&fixable).unwrap(),
        "a::after { color: red }\n"
    );
}

#[test]
fn lint_paths_applies_directory_suppressions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("legacy.less"), "a::AFTER {}\n").unwrap();
    fs::write(
        dir.path().join(".lessguard-ignore"),
        "[[suppress]]\nrule = \"selector-pseudo-element-case\"\nfile = \"legacy.less\"\nreason = \"vendor file\"\n",
    )
    .unwrap();

    let reports = lint_paths(&[dir.path().to_path_buf()], &pseudo_config(), false);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].violations.is_empty());
    assert_eq!(reports[0].suppressed.len(), 1);
    assert!(reports[0].passed);
}

#[test]
fn lint_file_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(lint_file(&dir.path().join("missing.less"), &pseudo_config(), false).is_err());
}
