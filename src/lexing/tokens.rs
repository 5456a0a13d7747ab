//! Token definitions for bracketed tag markup
//!
//! The token classes are disjoint character sets, so the logos DFA never has to back
//! off a partially matched token.
use logos::Logos;

/// All possible tokens in tag markup
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("/")]
    Slash,

    // Tag-name characters: letters, digits, underscore, hyphen
    #[regex(r"[A-Za-z0-9_-]+")]
    Name,

    // Everything else, including whitespace, quotes and newlines
    #[regex(r"[^\[\]/A-Za-z0-9_-]+")]
    Text,
}

impl Token {
    /// Check if this token is a run of tag-name characters
    pub fn is_name(&self) -> bool {
        matches!(self, Token::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(|result| result.ok()).collect()
    }

    #[test]
    fn test_brackets_and_slash() {
        assert_eq!(
            lex_all("[/]"),
            vec![Token::OpenBracket, Token::Slash, Token::CloseBracket]
        );
    }

    #[test]
    fn test_name_run() {
        assert_eq!(lex_all("gravity_view-2"), vec![Token::Name]);
    }

    #[test]
    fn test_text_excludes_name_chars() {
        assert_eq!(
            lex_all("a = \"b\""),
            vec![Token::Name, Token::Text, Token::Name, Token::Text]
        );
    }

    #[test]
    fn test_opening_tag_shape() {
        assert_eq!(
            lex_all("[g id=1]"),
            vec![
                Token::OpenBracket,
                Token::Name,
                Token::Text,
                Token::Name,
                Token::Text,
                Token::Name,
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_unicode_is_text() {
        assert_eq!(lex_all("héllo"), vec![Token::Name, Token::Text, Token::Name]);
    }

    #[test]
    fn test_predicates() {
        assert!(Token::Name.is_name());
        assert!(!Token::Text.is_name());
    }
}
