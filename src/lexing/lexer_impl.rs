//! Implementation of the tag lexer
//!
//! Convenience functions over the logos lexer.

use crate::lexing::tokens::Token;
use logos::Logos;

/// Tokenize a string and collect tokens with their byte spans
pub fn tokenize_with_spans(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
