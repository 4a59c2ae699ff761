//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes: one section per
//! file that has something to say (violations, rejected options, suppressed
//! items, fixes), followed by a one-line summary for the whole run.

use crate::violation::{LintReport, LintStatus, Severity};
use colored::Colorize;

/// Formats lint reports as human-readable, ANSI-colored text.
pub fn format(reports: &[LintReport]) -> String {
    let mut out = String::new();

    for report in reports {
        let quiet = report.violations.is_empty()
            && report.invalid_options.is_empty()
            && report.suppressed.is_empty()
            && !report.fixed;
        if quiet {
            continue;
        }
        format_file(&mut out, report);
    }

    let (mut errors, mut warnings, mut suppressed, mut fixed) = (0, 0, 0, 0);
    let mut failed = 0usize;
    for report in reports {
        let (e, w) = report.count_by_severity();
        errors += e;
        warnings += w;
        suppressed += report.suppressed.len();
        fixed += report.fixed_count();
        if report.status == LintStatus::Failed {
            failed += 1;
        }
    }

    let status_str = if failed > 0 {
        "FAILED".red().bold().to_string()
    } else if warnings > 0 {
        "WARNING".yellow().bold().to_string()
    } else {
        "PASSED".green().bold().to_string()
    };

    out.push_str(&format!(
        "Result: {status_str}  |  {} files, {} errors, {} warnings, {} suppressed, {} fixed\n",
        reports.len(),
        errors,
        warnings,
        suppressed,
        fixed,
    ));

    out
}

fn format_file(out: &mut String, report: &LintReport) {
    out.push_str(&format!(
        "{}\n",
        report.file.display().to_string().bold().underline()
    ));

    for violation in &report.violations {
        let severity_str = match violation.severity {
            Severity::Error => "ERROR".red().bold().to_string(),
            Severity::Warning => " WARN".yellow().bold().to_string(),
        };
        let location = format!("{}:{}", violation.line, violation.column);
        out.push_str(&format!(
            "  {location:>7}  [{severity_str}] {message}  {rule}\n",
            location = location.dimmed(),
            message = violation.message,
            rule = violation.rule.dimmed(),
        ));
    }

    for message in &report.invalid_options {
        out.push_str(&format!(
            "  [{}] {}\n",
            "OPTION".red().bold(),
            message
        ));
    }

    for violation in &report.suppressed {
        let reason = violation
            .suppression_reason
            .as_deref()
            .unwrap_or("no reason given");
        out.push_str(&format!(
            "  [SKIP] {:<32} {}\n",
            violation.rule.dimmed(),
            reason.dimmed(),
        ));
    }

    if report.fixed {
        out.push_str(&format!(
            "  {} {} fixes applied\n",
            "FIXED".green().bold(),
            report.fixed_count()
        ));
    }
    out.push('\n');
}
