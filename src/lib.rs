//! # lessguard
//!
//! A linter for Less and CSS stylesheets.
//!
//! `lessguard` parses stylesheets into a lossless tree, runs independently
//! configured rules over it and either reports violations at exact source
//! positions or, in fix mode, rewrites the tree and prints it back. Reports
//! render as human-readable text, JSON, or [SARIF].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use lessguard::{config::Config, lint, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let reports = lint::lint_paths(&[PathBuf::from("styles")], &config, false);
//!
//! print!("{}", output::format_reports(&reports, &output::OutputFormat::Pretty));
//! ```
//!
//! ## Architecture
//!
//! 1. **[`syntax`]**: parser, tree model, value tokenizer and tree walking.
//! 2. **[`rules`]**: the [`rules::Rule`] contract and the built-in rules.
//! 3. **[`config`]**: TOML configuration and suppression files.
//! 4. **[`lint`]**: run rules over files, in parallel across files.
//! 5. **[`violation`]**: violations, per-rule results and per-file reports.
//! 6. **[`output`]**: pretty text, JSON, or SARIF.
//!
//! ## Rules
//!
//! | Rule | Fixable | Description |
//! |------|---------|-------------|
//! | `global-variables` | yes | Literal values defined in a variables file must use the variable |
//! | `selector-pseudo-element-case` | yes | Pseudo-element case |
//! | `unit-allowed-list` | no | Only listed units |
//! | `value-list-comma-newline-before` | no | Newline before value-list commas |
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod config;
pub mod lint;
pub mod output;
pub mod rules;
pub mod syntax;
pub mod violation;
