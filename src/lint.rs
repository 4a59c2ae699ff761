//! Lint orchestration.
//!
//! [`lint_source`] runs every enabled rule over one parsed stylesheet, one
//! rule after the other on the same tree. [`lint_paths`] collects stylesheet
//! files under the given paths, lints them in parallel via [rayon] and, in
//! fix mode, writes changed files back.

use crate::config::{self, Config, RuleSetting, Suppression};
use crate::rules::{Rule, RuleContext, RuleInvocation};
use crate::syntax::{parse, Root};
use crate::violation::{LintReport, RuleResult};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Report for one source text, plus the rewritten text when fix mode changed
/// anything.
#[derive(Debug)]
pub struct LintOutcome {
    pub report: LintReport,
    pub output: Option<String>,
}

/// Runs a single rule over `root` with a fresh result.
///
/// Fixing happens only when requested and the rule is fixable.
pub fn run_rule(rule: &dyn Rule, setting: &RuleSetting, root: &mut Root, fix: bool) -> RuleResult {
    let start = Instant::now();
    let mut result = RuleResult::new(rule.name());
    let context = RuleContext {
        fix: fix && rule.meta().fixable,
    };
    let invocation = RuleInvocation::new(&setting.primary, setting.secondary.as_ref(), context);
    rule.check(&invocation, root, &mut result);
    result.duration_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(
        rule = rule.name(),
        violations = result.violations.len(),
        fixed = result.fixed,
        "rule finished"
    );
    result
}

/// Lints `source` as if read from `path`.
///
/// A parse failure yields a report with a single `parse-error` violation
/// and no rule runs.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lessguard::{config::Config, lint::lint_source};
/// use serde_json::json;
///
/// let config = Config::default().with_rule("selector-pseudo-element-case", json!("lower"));
/// let outcome = lint_source("a::BEFORE { color: red }", Path::new("a.less"), &config, false, &[]);
/// assert_eq!(outcome.report.violations.len(), 1);
///
/// let outcome = lint_source("a::BEFORE { color: red }", Path::new("a.less"), &config, true, &[]);
/// assert_eq!(outcome.output.as_deref(), Some("a::before { color: red }"));
/// ```
pub fn lint_source(
    source: &str,
    path: &Path,
    config: &Config,
    fix: bool,
    suppressions: &[Suppression],
) -> LintOutcome {
    let mut root = match parse(source) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "parse failed");
            return LintOutcome {
                report: LintReport::parse_failure(path, &e),
                output: None,
            };
        }
    };

    let results: Vec<RuleResult> = config
        .enabled_rules()
        .iter()
        .map(|(rule, setting)| run_rule(rule.as_ref(), setting, &mut root, fix))
        .collect();

    let output = if fix {
        Some(root.to_string()).filter(|printed| printed != source)
    } else {
        None
    };
    let report = LintReport::from_results(
        path,
        results,
        suppressions,
        config.strict,
        output.is_some(),
    );
    LintOutcome { report, output }
}

/// Lints one file using the suppressions of its directory. In fix mode the
/// file is rewritten when a rule changed it.
pub fn lint_file(path: &Path, config: &Config, fix: bool) -> Result<LintReport, LintError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    lint_file_with(path, config, fix, &config::load_suppressions(dir))
}

fn lint_file_with(
    path: &Path,
    config: &Config,
    fix: bool,
    suppressions: &[Suppression],
) -> Result<LintReport, LintError> {
    let source = std::fs::read_to_string(path).map_err(|source| LintError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let outcome = lint_source(&source, path, config, fix, suppressions);
    if let Some(output) = outcome.output {
        std::fs::write(path, output).map_err(|source| LintError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "fixed");
    }
    Ok(outcome.report)
}

/// Stylesheet files under `path`: the file itself, or every file with a
/// configured extension below a directory, in name order.
pub fn collect_files(path: &Path, config: &Config) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && config.is_lintable(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Lints every stylesheet under `paths` in parallel. Suppressions come from
/// the `.lessguard-ignore` of each given directory (or a given file's
/// directory). Files that cannot be read or written are logged and left
/// out of the result.
pub fn lint_paths(paths: &[PathBuf], config: &Config, fix: bool) -> Vec<LintReport> {
    let jobs: Vec<(PathBuf, Vec<Suppression>)> = paths
        .iter()
        .flat_map(|path| {
            let dir = if path.is_file() {
                path.parent().unwrap_or_else(|| Path::new("."))
            } else {
                path.as_path()
            };
            let suppressions = config::load_suppressions(dir);
            collect_files(path, config)
                .into_iter()
                .map(move |file| (file, suppressions.clone()))
        })
        .collect();

    tracing::debug!(files = jobs.len(), "linting");

    jobs.par_iter()
        .filter_map(|(file, suppressions)| {
            match lint_file_with(file, config, fix, suppressions) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping file");
                    None
                }
            }
        })
        .collect()
}
