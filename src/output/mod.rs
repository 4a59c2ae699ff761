//! Output formatting for lint reports.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |
//!
//! Use [`format_reports`] to render the reports of one run in any of the
//! above formats.

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::violation::LintReport;

/// Supported output formats for lint reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text grouped by file.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats the reports of one run in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use lessguard::output::{format_reports, OutputFormat};
/// # use lessguard::violation::LintReport;
/// # fn example(reports: &[LintReport]) {
/// let json = format_reports(reports, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_reports(reports: &[LintReport], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(reports),
        OutputFormat::Json => json::format(reports),
        OutputFormat::Sarif => sarif::format(reports),
    }
}
