//! Loads a Less variables file into a value → name lookup.

use crate::syntax::ast::{Node, Root};
use crate::syntax::{parse, ParseError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read variables file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse variables file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Literal value → variable name (without the `@` sigil).
///
/// Two variables bound to the same literal collide; the one defined last in
/// the file wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDictionary {
    by_value: HashMap<String, String>,
}

impl VariableDictionary {
    /// Folds the top-level `@name: value;` definitions of `root`, in file
    /// order. Every other statement is ignored.
    pub fn from_root(root: &Root) -> Self {
        let mut dictionary = VariableDictionary::default();
        for node in &root.nodes {
            if let Node::AtRule(at) = node {
                if let Some(value) = at.variable_value() {
                    dictionary.insert(value, &at.name);
                }
            }
        }
        dictionary
    }

    pub fn insert(&mut self, value: &str, name: &str) {
        self.by_value.insert(value.to_string(), name.to_string());
    }

    pub fn name_for(&self, value: &str) -> Option<&str> {
        self.by_value.get(value).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for VariableDictionary {
    /// Builds from `(value, name)` pairs; later pairs win.
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut dictionary = VariableDictionary::default();
        for (value, name) in iter {
            dictionary.insert(value, name);
        }
        dictionary
    }
}

/// Outcome of loading the variables file. A rule that gets
/// [`Variables::Absent`] does nothing for the run.
#[derive(Debug)]
pub enum Variables {
    Dictionary(VariableDictionary),
    Absent,
}

pub fn read_dictionary(path: &Path) -> Result<VariableDictionary, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse(&source).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(VariableDictionary::from_root(&root))
}

/// Like [`read_dictionary`], but any failure yields [`Variables::Absent`].
pub fn load(path: &Path) -> Variables {
    match read_dictionary(path) {
        Ok(dictionary) => {
            tracing::debug!(
                path = %path.display(),
                variables = dictionary.len(),
                "loaded variables"
            );
            Variables::Dictionary(dictionary)
        }
        Err(e) => {
            tracing::debug!(error = %e, "variables unavailable, rule disabled for this run");
            Variables::Absent
        }
    }
}
