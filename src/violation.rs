use crate::syntax::ast::NodeKind;
use crate::syntax::ParseError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Rule identifier used for files that could not be parsed.
pub const PARSE_ERROR_RULE: &str = "parse-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A problem a rule found in one node.
///
/// `index` is the character offset inside the node's printed text (without
/// its leading whitespace); `line` and `column` are that offset resolved
/// against the node's source position.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub severity: Severity,
    pub file: Option<PathBuf>,
    pub node: NodeKind,
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub suppressed: bool,
    pub suppression_reason: Option<String>,
}

/// Everything one rule produced for one file.
#[derive(Debug, serde::Serialize)]
pub struct RuleResult {
    pub rule: String,
    pub violations: Vec<Violation>,
    /// Option validation failures. A rule with any of these did nothing.
    pub invalid_options: Vec<String>,
    /// Number of nodes rewritten in fix mode.
    pub fixed: usize,
    pub duration_ms: u64,
}

impl RuleResult {
    pub fn new(rule: &str) -> Self {
        RuleResult {
            rule: rule.to_string(),
            violations: Vec::new(),
            invalid_options: Vec::new(),
            fixed: 0,
            duration_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintStatus {
    Passed,
    Warning,
    Failed,
}

/// Outcome of linting a single file.
#[derive(Debug, serde::Serialize)]
pub struct LintReport {
    pub file: PathBuf,
    pub lint_timestamp: String,
    pub status: LintStatus,
    pub rule_results: Vec<RuleResult>,
    pub violations: Vec<Violation>,
    pub suppressed: Vec<Violation>,
    /// `"<rule>: <message>"` for every rule whose options were rejected.
    pub invalid_options: Vec<String>,
    /// `true` when fix mode changed the file.
    pub fixed: bool,
    pub passed: bool,
}

impl LintReport {
    pub fn from_results(
        file: &Path,
        results: Vec<RuleResult>,
        suppressions: &[crate::config::Suppression],
        strict: bool,
        fixed: bool,
    ) -> Self {
        let mut active = Vec::new();
        let mut suppressed = Vec::new();
        let mut invalid_options = Vec::new();

        for result in &results {
            invalid_options.extend(
                result
                    .invalid_options
                    .iter()
                    .map(|m| format!("{}: {}", result.rule, m)),
            );
            for violation in &result.violations {
                let mut v = violation.clone();
                v.file = Some(file.to_path_buf());
                if let Some(s) = find_suppression(&v, suppressions) {
                    v.suppressed = true;
                    v.suppression_reason = Some(s.reason.clone());
                    suppressed.push(v);
                } else {
                    active.push(v);
                }
            }
        }

        let status = compute_status(&active, !invalid_options.is_empty(), strict);
        let passed = !matches!(status, LintStatus::Failed);

        LintReport {
            file: file.to_path_buf(),
            lint_timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            rule_results: results,
            violations: active,
            suppressed,
            invalid_options,
            fixed,
            passed,
        }
    }

    /// Report for a file that could not be parsed: a single error violation
    /// at the parser's position, no rule results.
    pub fn parse_failure(file: &Path, error: &ParseError) -> Self {
        let violation = Violation {
            rule: PARSE_ERROR_RULE.to_string(),
            message: error.kind.to_string(),
            severity: Severity::Error,
            file: Some(file.to_path_buf()),
            node: NodeKind::Root,
            index: error.position.offset,
            line: error.position.line,
            column: error.position.column,
            suppressed: false,
            suppression_reason: None,
        };
        LintReport {
            file: file.to_path_buf(),
            lint_timestamp: chrono::Utc::now().to_rfc3339(),
            status: LintStatus::Failed,
            rule_results: Vec::new(),
            violations: vec![violation],
            suppressed: Vec::new(),
            invalid_options: Vec::new(),
            fixed: false,
            passed: false,
        }
    }

    /// Count errors and warnings in a single pass. Returns `(errors, warnings)`.
    pub fn count_by_severity(&self) -> (usize, usize) {
        self.violations
            .iter()
            .fold((0, 0), |(e, w), v| match v.severity {
                Severity::Error => (e + 1, w),
                Severity::Warning => (e, w + 1),
            })
    }

    pub fn fixed_count(&self) -> usize {
        self.rule_results.iter().map(|r| r.fixed).sum()
    }
}

fn compute_status(violations: &[Violation], invalid_options: bool, strict: bool) -> LintStatus {
    let (has_errors, has_warnings) =
        violations
            .iter()
            .fold((false, false), |(e, w), v| match v.severity {
                Severity::Error => (true, w),
                Severity::Warning => (e, true),
            });

    if has_errors || invalid_options {
        LintStatus::Failed
    } else if has_warnings {
        if strict {
            LintStatus::Failed
        } else {
            LintStatus::Warning
        }
    } else {
        LintStatus::Passed
    }
}

fn find_suppression<'a>(
    violation: &Violation,
    suppressions: &'a [crate::config::Suppression],
) -> Option<&'a crate::config::Suppression> {
    suppressions.iter().find(|s| {
        if s.rule != violation.rule {
            return false;
        }
        // Path::ends_with compares whole components: "a.less" matches
        // "styles/a.less" but not "styles/data.less".
        match &violation.file {
            Some(file) => {
                if !s.file.is_empty() && !file.ends_with(Path::new(&s.file)) {
                    return false;
                }
            }
            None => {
                if !s.file.is_empty() {
                    return false;
                }
            }
        }
        if let Some(ref lines) = s.lines {
            match parse_line_range(lines) {
                Some((start, end)) if violation.line >= start && violation.line <= end => {}
                _ => return false,
            }
        }
        true
    })
}

fn parse_line_range(lines: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = lines.split('-').collect();
    if parts.len() == 2 {
        let start = parts[0].trim().parse().ok()?;
        let end = parts[1].trim().parse().ok()?;
        if start > end {
            return None;
        }
        Some((start, end))
    } else if parts.len() == 1 {
        let line = parts[0].trim().parse().ok()?;
        Some((line, line))
    } else {
        None
    }
}
