//! Statement-level lexer for CSS/Less source, built on logos.
//!
//! Whitespace and comments are tokens too, so the parser can keep every byte
//! of the input in the tree.

use logos::{Lexer, Logos};

/// Lexing failures. `Unexpected` is required by logos for unmatched input;
/// every character is covered by some token, so it should not surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    #[default]
    Unexpected,
    UnclosedComment,
    UnclosedString,
    UnclosedInterpolation,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
pub enum Token {
    #[regex(r"[ \t\r\n\f]+")]
    Space,
    #[token("/*", block_comment)]
    BlockComment,
    /// `// …` up to, not including, the newline. Only meaningful outside
    /// parentheses; inside them the parser reads it as a `/`.
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("\"", quoted)]
    #[token("'", quoted)]
    String,
    /// Less `@{name}` or `#{name}`.
    #[token("@{", interpolation)]
    #[token("#{", interpolation)]
    Interpolation,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("@")]
    At,
    #[token("#")]
    #[token(",")]
    #[token("/")]
    Punct,
    #[regex(r#"[^ \t\r\n\f/"'{};:()\[\],@#]+"#)]
    Word,
}

fn block_comment(lex: &mut Lexer<'_, Token>) -> Result<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => Err(LexError::UnclosedComment),
    }
}

fn quoted(lex: &mut Lexer<'_, Token>) -> Result<(), LexError> {
    let quote = if lex.slice() == "'" { '\'' } else { '"' };
    let mut escaped = false;
    let mut close = None;
    for (i, c) in lex.remainder().char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            close = Some(i);
            break;
        }
    }
    let end = close.ok_or(LexError::UnclosedString)?;
    lex.bump(end + 1);
    Ok(())
}

fn interpolation(lex: &mut Lexer<'_, Token>) -> Result<(), LexError> {
    let end = lex
        .remainder()
        .find('}')
        .ok_or(LexError::UnclosedInterpolation)?;
    lex.bump(end + 1);
    Ok(())
}

/// A token with its byte range in the full source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

/// Lexes the single token starting at byte `offset` of `source`.
///
/// Returns `Ok(None)` at end of input and the error with its start offset
/// when the token is malformed.
pub fn token_at(source: &str, offset: usize) -> Result<Option<Lexeme>, (LexError, usize)> {
    let mut lex = Token::lexer(&source[offset..]);
    let Some(next) = lex.next() else {
        return Ok(None);
    };
    let span = lex.span();
    match next {
        Ok(token) => Ok(Some(Lexeme {
            token,
            start: offset + span.start,
            end: offset + span.end,
        })),
        Err(e) => Err((e, offset + span.start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<(Token, &str)> {
        let mut lex = Token::lexer(source);
        let mut out = Vec::new();
        while let Some(Ok(token)) = lex.next() {
            out.push((token, lex.slice()));
        }
        out
    }

    #[test]
    fn keeps_whitespace_and_comments() {
        assert_eq!(
            tokens("a /* x; */ {\n// y\n}"),
            vec![
                (Token::Word, "a"),
                (Token::Space, " "),
                (Token::BlockComment, "/* x; */"),
                (Token::Space, " "),
                (Token::OpenBrace, "{"),
                (Token::Space, "\n"),
                (Token::LineComment, "// y"),
                (Token::Space, "\n"),
                (Token::CloseBrace, "}"),
            ]
        );
    }

    #[test]
    fn strings_and_interpolations_are_single_tokens() {
        assert_eq!(
            tokens(r#""a\"; }" .x-@{n}"#),
            vec![
                (Token::String, r#""a\"; }""#),
                (Token::Space, " "),
                (Token::Word, ".x-"),
                (Token::Interpolation, "@{n}"),
            ]
        );
    }

    #[test]
    fn at_sign_splits_from_name() {
        assert_eq!(
            tokens("@red:#f00"),
            vec![
                (Token::At, "@"),
                (Token::Word, "red"),
                (Token::Colon, ":"),
                (Token::Punct, "#"),
                (Token::Word, "f00"),
            ]
        );
    }

    #[test]
    fn unclosed_constructs_are_errors() {
        assert_eq!(token_at("x /* open", 2), Err((LexError::UnclosedComment, 2)));
        assert_eq!(token_at("'open", 0), Err((LexError::UnclosedString, 0)));
        assert_eq!(token_at("@{open", 0), Err((LexError::UnclosedInterpolation, 0)));
    }

    #[test]
    fn token_at_reports_absolute_offsets() {
        let lexeme = token_at("a { b }", 2).unwrap().unwrap();
        assert_eq!(
            lexeme,
            Lexeme {
                token: Token::OpenBrace,
                start: 2,
                end: 3
            }
        );
        assert_eq!(token_at("a", 1).unwrap(), None);
    }
}
