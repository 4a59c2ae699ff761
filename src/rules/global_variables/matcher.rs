//! Decides whether a declaration's literal value should be a variable.

use super::dictionary::VariableDictionary;
use crate::rules::options::case_insensitive_regex;
use crate::syntax::ast::Declaration;
use regex::Regex;
use std::sync::LazyLock;

/// Sizing properties are expected to carry literals.
pub const DEFAULT_IGNORED_PROPERTIES: &[&str] = &["width", "height", "margin", "padding"];

/// Less variable reference sigil.
const SIGIL: char = '@';

/// Property name patterns exempt from substitution. Each pattern is a plain
/// string or a `/regex/`, matched case-insensitively anywhere in the name.
#[derive(Debug, Clone)]
pub struct IgnoredProperties {
    patterns: Vec<Regex>,
}

impl IgnoredProperties {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| case_insensitive_regex(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(IgnoredProperties { patterns })
    }

    pub fn matches(&self, prop: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(prop))
    }
}

static DEFAULT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_IGNORED_PROPERTIES
        .iter()
        .map(|p| case_insensitive_regex(p).unwrap())
        .collect()
});

impl Default for IgnoredProperties {
    fn default() -> Self {
        IgnoredProperties {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }
}

/// A literal value and the variable reference that should replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub actual: String,
    pub replacement: String,
}

/// Exact-string lookup of the declaration's raw value. No normalisation:
/// `#F00` and `#FF0000` are different values.
pub fn find_substitution(
    decl: &Declaration,
    variables: &VariableDictionary,
    ignored: &IgnoredProperties,
) -> Option<Substitution> {
    let name = variables.name_for(&decl.value)?;
    if ignored.matches(&decl.prop) {
        return None;
    }
    Some(Substitution {
        actual: decl.value.clone(),
        replacement: format!("{SIGIL}{name}"),
    })
}
