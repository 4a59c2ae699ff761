//! Stylesheet syntax: tree model, parser, value tokenizer and traversal.
//!
//! - [`ast`]: the node tree rules operate on, printable back to source.
//! - [`lexer`]: statement-level tokens, whitespace and comments included.
//! - [`parser`]: turns CSS/Less source into an [`ast::Root`].
//! - [`selector`]: pseudo scanning and preprocessor selector detection.
//! - [`value`]: splits a single value into words, functions and separators.
//! - [`walk`]: document-order traversal that tolerates front insertions.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod selector;
pub mod value;
pub mod walk;

pub use ast::{Declaration, Node, NodeKind, NodePath, Root};
pub use parser::{parse, ParseError};
