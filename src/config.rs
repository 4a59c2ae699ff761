//! Configuration loading and management.
//!
//! Provides types for the TOML-based configuration file and for
//! violation-suppression entries stored in `.lessguard-ignore` files.
//!
//! # Configuration file
//!
//! The default configuration file is `lessguard.toml` in the current working
//! directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use lessguard::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! for (rule, setting) in config.enabled_rules() {
//!     println!("{} = {}", rule.name(), setting.primary);
//! }
//! ```
//!
//! Rules are off unless configured:
//!
//! ```toml
//! strict = false
//!
//! [rules]
//! global-variables = ["./styles/vars.less", { ignoreProperties = ["width", "/^max-/"] }]
//! selector-pseudo-element-case = "lower"
//! unit-allowed-list = [["px", "em", "%"], { ignoreFunctions = ["calc"] }]
//! value-list-comma-newline-before = false
//! ```
//!
//! # Suppression files
//!
//! Place a `.lessguard-ignore` file in a linted directory to suppress specific
//! violations. See [`Suppression`] for the format and [`load_suppressions`]
//! for loading.

use crate::rules::{find_rule, Rule};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lessguard.toml";

/// Name of the per-directory suppression file.
pub const SUPPRESSION_FILE: &str = ".lessguard-ignore";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown rule \"{0}\"")]
    UnknownRule(String),
}

/// Main configuration for a lint run.
///
/// All fields carry defaults so the config file can be omitted entirely;
/// the default enables no rules.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Treat warnings as failures.
    pub strict: bool,
    pub files: FilesConfig,
    /// Rule name → raw setting (`primary` or `[primary, { secondary }]`).
    pub rules: BTreeMap<String, Value>,
}

/// Which files a directory walk picks up.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Extensions without the dot, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            extensions: vec!["less".to_string(), "css".to_string()],
        }
    }
}

/// A rule's options after normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub primary: Value,
    pub secondary: Option<Value>,
}

impl RuleSetting {
    /// Splits a raw setting into primary and secondary options. Returns
    /// `None` for a disabled rule (`false`).
    ///
    /// When the rule's primary option is itself a list, a bare list is the
    /// primary option and `[[…], {…}]` carries secondary options.
    ///
    /// ```
    /// use lessguard::config::RuleSetting;
    /// use serde_json::json;
    ///
    /// let s = RuleSetting::from_value(&json!(["a.less", { "fixable": false }]), false).unwrap();
    /// assert_eq!(s.primary, json!("a.less"));
    /// assert_eq!(s.secondary, Some(json!({ "fixable": false })));
    ///
    /// let s = RuleSetting::from_value(&json!(["px", "em"]), true).unwrap();
    /// assert_eq!(s.primary, json!(["px", "em"]));
    /// assert!(RuleSetting::from_value(&json!(false), false).is_none());
    /// ```
    pub fn from_value(raw: &Value, primary_option_array: bool) -> Option<RuleSetting> {
        match raw {
            Value::Null | Value::Bool(false) => None,
            Value::Array(items) if !items.is_empty() => {
                if primary_option_array && !items[0].is_array() {
                    return Some(RuleSetting {
                        primary: raw.clone(),
                        secondary: None,
                    });
                }
                Some(RuleSetting {
                    primary: items[0].clone(),
                    secondary: items.get(1).cloned(),
                })
            }
            other => Some(RuleSetting {
                primary: other.clone(),
                secondary: None,
            }),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `lessguard.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the explicit path does not exist, the
    /// file cannot be read or parsed, or it names a rule that does not exist.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            tracing::debug!("no config file, using defaults");
            return Ok(Config::default());
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), rules = config.rules.len(), "loaded config");
        Ok(config)
    }

    /// Fails on rule names no rule answers to.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.rules.keys().find(|name| find_rule(name).is_none()) {
            Some(name) => Err(ConfigError::UnknownRule(name.clone())),
            None => Ok(()),
        }
    }

    /// Adds or replaces a rule setting.
    ///
    /// ```
    /// use lessguard::config::Config;
    /// use serde_json::json;
    ///
    /// let config = Config::default().with_rule("selector-pseudo-element-case", json!("lower"));
    /// assert_eq!(config.enabled_rules().len(), 1);
    /// ```
    pub fn with_rule(mut self, name: &str, setting: Value) -> Self {
        self.rules.insert(name.to_string(), setting);
        self
    }

    /// Configured rules that are not disabled, in name order. Unknown names
    /// are skipped.
    pub fn enabled_rules(&self) -> Vec<(Box<dyn Rule>, RuleSetting)> {
        self.rules
            .iter()
            .filter_map(|(name, raw)| {
                let rule = find_rule(name)?;
                let setting = RuleSetting::from_value(raw, rule.primary_option_array())?;
                Some((rule, setting))
            })
            .collect()
    }

    /// Whether `path` has one of the configured extensions.
    pub fn is_lintable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.files
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

/// Root structure of a `.lessguard-ignore` TOML file.
///
/// # File format
///
/// ```toml
/// [[suppress]]
/// rule = "global-variables"
/// file = "legacy/buttons.less"
/// lines = "10-20"
/// reason = "Brand colors predate the variables file"
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct SuppressionFile {
    pub suppress: Vec<Suppression>,
}

/// Silences matching violations.
///
/// A suppression matches a [`Violation`](crate::violation::Violation) when:
/// - `rule` equals the violation's rule.
/// - `file` is a path suffix of the linted file (empty string matches all).
/// - `lines` (if set) contains the violation's line.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Suppression {
    pub rule: String,
    #[serde(default)]
    pub file: String,
    /// Line range (`"10-20"`) or single line (`"15"`).
    pub lines: Option<String>,
    pub reason: String,
    /// Optional issue-tracker reference.
    pub ticket: Option<String>,
}

/// Loads suppressions from `dir/.lessguard-ignore`.
///
/// Returns an empty vector when the file is absent or unreadable; a parse
/// failure is logged and also yields an empty vector.
pub fn load_suppressions(dir: &Path) -> Vec<Suppression> {
    let ignore_path = dir.join(SUPPRESSION_FILE);
    if !ignore_path.exists() {
        return vec![];
    }

    let content = match std::fs::read_to_string(&ignore_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %ignore_path.display(), error = %e, "cannot read suppression file");
            return vec![];
        }
    };

    match toml::from_str::<SuppressionFile>(&content) {
        Ok(file) => file.suppress,
        Err(e) => {
            tracing::warn!(path = %ignore_path.display(), error = %e, "failed to parse suppression file");
            vec![]
        }
    }
}
