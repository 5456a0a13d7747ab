//! Lexer module for bracketed tag markup
//!
//! Tokenization is a flat logos pass: brackets, slashes, name runs and everything else.
//! The lexer knows nothing about which tag names exist or how tags pair up; that is
//! decided by the [grammar](crate::grammar) stage, which reads this token stream together
//! with the source text.
//!
//! Every character of the input lands in exactly one token, so the spans of the stream
//! tile the source without gaps. This keeps literal text recoverable by slicing.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::tokenize_with_spans;
pub use tokens::Token;
