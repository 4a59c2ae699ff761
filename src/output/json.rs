//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document with one entry per linted file
//! (status, counts, active and suppressed violations, rejected options) and
//! a run-wide summary.

use crate::violation::{LintReport, LintStatus, Violation};
use std::path::Path;

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    summary: Summary,
    files: Vec<FileOutput<'a>>,
}

#[derive(serde::Serialize)]
struct FileOutput<'a> {
    file: &'a Path,
    lint_timestamp: &'a str,
    status: LintStatus,
    passed: bool,
    fixed: bool,
    summary: Summary,
    violations: &'a [Violation],
    suppressed: &'a [Violation],
    invalid_options: &'a [String],
}

#[derive(serde::Serialize, Default)]
struct Summary {
    errors: usize,
    warnings: usize,
    suppressed: usize,
    fixed: usize,
}

impl Summary {
    fn of(report: &LintReport) -> Summary {
        let (errors, warnings) = report.count_by_severity();
        Summary {
            errors,
            warnings,
            suppressed: report.suppressed.len(),
            fixed: report.fixed_count(),
        }
    }

    fn add(mut self, other: &Summary) -> Summary {
        self.errors += other.errors;
        self.warnings += other.warnings;
        self.suppressed += other.suppressed;
        self.fixed += other.fixed;
        self
    }
}

/// Formats lint reports as pretty-printed JSON.
pub fn format(reports: &[LintReport]) -> String {
    let files: Vec<FileOutput<'_>> = reports
        .iter()
        .map(|report| FileOutput {
            file: &report.file,
            lint_timestamp: &report.lint_timestamp,
            status: report.status,
            passed: report.passed,
            fixed: report.fixed,
            summary: Summary::of(report),
            violations: &report.violations,
            suppressed: &report.suppressed,
            invalid_options: &report.invalid_options,
        })
        .collect();

    let output = JsonOutput {
        passed: reports.iter().all(|r| r.passed),
        summary: files
            .iter()
            .fold(Summary::default(), |total, f| total.add(&f.summary)),
        files,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
