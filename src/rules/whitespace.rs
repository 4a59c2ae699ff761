//! Shared whitespace checks for the list-punctuation rules.

/// Where a newline is expected (or rejected) relative to a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineExpectation {
    Always,
    AlwaysMultiLine,
    NeverMultiLine,
}

impl NewlineExpectation {
    pub const OPTIONS: &'static [&'static str] = &["always", "always-multi-line", "never-multi-line"];

    pub fn from_option(option: &str) -> Option<Self> {
        match option {
            "always" => Some(Self::Always),
            "always-multi-line" => Some(Self::AlwaysMultiLine),
            "never-multi-line" => Some(Self::NeverMultiLine),
            _ => None,
        }
    }
}

/// What is wrong before the checked character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineProblem {
    ExpectedBefore,
    ExpectedBeforeMultiLine,
    RejectedBeforeMultiLine,
}

pub fn is_single_line(source: &[char]) -> bool {
    !source.contains(&'\n')
}

/// Checks the whitespace before `source[index]`. Spaces and tabs between the
/// newline and the character are indentation and allowed. The multi-line
/// expectations only apply when `source` spans several lines.
pub fn check_newline_before(
    source: &[char],
    index: usize,
    expectation: NewlineExpectation,
) -> Option<NewlineProblem> {
    match expectation {
        NewlineExpectation::Always => {
            (!newline_before(source, index)).then_some(NewlineProblem::ExpectedBefore)
        }
        NewlineExpectation::AlwaysMultiLine => (!is_single_line(source)
            && !newline_before(source, index))
        .then_some(NewlineProblem::ExpectedBeforeMultiLine),
        NewlineExpectation::NeverMultiLine => (!is_single_line(source)
            && index > 0
            && source[index - 1].is_whitespace())
        .then_some(NewlineProblem::RejectedBeforeMultiLine),
    }
}

fn newline_before(source: &[char], index: usize) -> bool {
    source[..index]
        .iter()
        .rev()
        .find(|c| !matches!(**c, ' ' | '\t'))
        == Some(&'\n')
}
