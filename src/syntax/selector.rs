//! Selector helpers: pseudo-class/element scanning and preprocessor
//! detection.

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};
use regex::Regex;
use std::sync::LazyLock;

static RE_EXTEND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":extend(\(.*?\))?").unwrap());

static RE_MIXIN_WITH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[\w-]+\(.*\).+").unwrap());

static RE_PARAMETRIC_MIXIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(@.*\)$").unwrap());

/// A `:pseudo` or `::pseudo` inside a selector. `value` includes the colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pseudo {
    pub value: String,
    /// Character index of the first colon inside the selector.
    pub index: usize,
}

impl Pseudo {
    pub fn is_element(&self) -> bool {
        self.value.starts_with("::")
    }

    /// Name without colons.
    pub fn name(&self) -> &str {
        self.value.trim_start_matches(':')
    }
}

/// Whether a selector is plain CSS rather than Less (interpolation, extends,
/// mixin definitions, guards) or template syntax.
pub fn is_standard_syntax_selector(selector: &str) -> bool {
    !(selector.contains("@{")
        || selector.contains("#{")
        || selector.starts_with('%')
        || selector.ends_with(':')
        || RE_EXTEND.is_match(selector)
        || RE_MIXIN_WITH_SUFFIX.is_match(selector)
        || (selector.ends_with(')') && !selector.contains(':'))
        || RE_PARAMETRIC_MIXIN.is_match(selector)
        || selector.contains("<%")
        || selector.contains("%>")
        || selector.contains("//"))
}

/// Every pseudo in `selector`, including those nested in `:not(…)` and
/// similar arguments. Strings, attribute selectors, escapes and comments are
/// skipped by the tokenizer.
///
/// ```
/// use lessguard::syntax::selector::pseudos;
///
/// let found: Vec<_> = pseudos("a:hover::BEFORE, [x=':y']")
///     .into_iter()
///     .map(|p| (p.value, p.index))
///     .collect();
/// assert_eq!(found, vec![(":hover".to_string(), 1), ("::BEFORE".to_string(), 7)]);
/// ```
pub fn pseudos(selector: &str) -> Vec<Pseudo> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut found = Vec::new();
    scan(&mut parser, selector, &mut found);
    found
}

fn scan<'i>(parser: &mut Parser<'i, '_>, selector: &str, found: &mut Vec<Pseudo>) {
    // Start of the colon run that may begin a pseudo.
    let mut colons: Option<SourcePosition> = None;
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Colon => {
                colons.get_or_insert(start);
            }
            Token::Ident(_) => {
                if let Some(from) = colons.take() {
                    found.push(pseudo(selector, from, parser.slice_from(from)));
                }
            }
            Token::Function(_) => {
                if let Some(from) = colons.take() {
                    let value = parser.slice_from(from).trim_end_matches('(');
                    found.push(pseudo(selector, from, value));
                }
                scan_nested(parser, selector, found);
            }
            Token::ParenthesisBlock => {
                colons = None;
                scan_nested(parser, selector, found);
            }
            _ => colons = None,
        }
    }
}

fn scan_nested<'i>(parser: &mut Parser<'i, '_>, selector: &str, found: &mut Vec<Pseudo>) {
    let _ = parser.parse_nested_block(|block| -> Result<(), ParseError<'i, ()>> {
        scan(block, selector, found);
        Ok(())
    });
}

fn pseudo(selector: &str, from: SourcePosition, value: &str) -> Pseudo {
    Pseudo {
        value: value.to_string(),
        index: selector[..from.byte_index()].chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_pseudos() {
        let found = pseudos("li:not(:FIRST-CHILD)::After");
        let values: Vec<_> = found.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec![":not", ":FIRST-CHILD", "::After"]);
        assert_eq!(found[2].index, 20);
        assert!(found[2].is_element());
        assert_eq!(found[2].name(), "After");
    }

    #[test]
    fn ignores_colons_in_strings_attributes_and_comments() {
        assert!(pseudos("a[href='x:y'] /* :hover */ \"::b\"").is_empty());
    }

    #[test]
    fn escaped_colon_is_not_a_pseudo() {
        assert!(pseudos(r".sm\:block").is_empty());
    }

    #[test]
    fn lone_colons_are_not_pseudos() {
        assert!(pseudos("a: b").is_empty());
        let found = pseudos("é:hover");
        assert_eq!(found[0].index, 1);
    }

    #[test]
    fn recognises_less_selectors() {
        assert!(is_standard_syntax_selector("a:hover, .b::before"));
        assert!(!is_standard_syntax_selector(".@{name}:hover"));
        assert!(!is_standard_syntax_selector("a:extend(.b)"));
        assert!(!is_standard_syntax_selector(".mixin()"));
        assert!(!is_standard_syntax_selector(".mixin(@a: 1px)"));
        assert!(!is_standard_syntax_selector(".m() when (iscolor(@c))"));
    }
}
