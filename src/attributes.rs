//! Attribute parsing for opening tags
//!
//!     The attribute text is everything between the tag name and the closing bracket of
//!     an opening tag, e.g. ` id="3" page_size=25 'compact'` in `[view id="3" page_size=25 'compact']`.
//!
//!     Supported forms, separated by whitespace:
//!         name="value"    double quoted
//!         name='value'    single quoted
//!         name=value      unquoted (no whitespace or quotes)
//!         "value"         positional, double quoted
//!         'value'         positional, single quoted
//!         value           positional, bare
//!
//!     Names are lower-cased. Positional values are keyed by their position among the
//!     positional values ("0", "1", ...). When a name repeats, the last value wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Parsed attributes of one opening tag.
pub type Attributes = BTreeMap<String, String>;

static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)"#,
        r#"|"([^"]*)"(?:\s|$)"#,
        r#"|'([^']*)'(?:\s|$)"#,
        r#"|(\S+)(?:\s|$)"#,
    ))
    .expect("attribute pattern is a valid regex")
});

static SPACE_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{00a0}\x{200b}]+").expect("space pattern is a valid regex"));

/// Parse the attribute text of an opening tag.
pub fn parse_attributes(text: &str) -> Attributes {
    let normalized = SPACE_LIKE.replace_all(text, " ");
    let mut attributes = Attributes::new();
    let mut positional = 0usize;

    for caps in ATTRIBUTE_PATTERN.captures_iter(&normalized) {
        let named = [(1, 2), (3, 4), (5, 6)]
            .into_iter()
            .find_map(|(key, value)| Some((caps.get(key)?, caps.get(value)?)));

        if let Some((key, value)) = named {
            attributes.insert(key.as_str().to_lowercase(), value.as_str().to_string());
            continue;
        }

        if let Some(value) = [7, 8, 9].into_iter().find_map(|group| caps.get(group)) {
            attributes.insert(positional.to_string(), value.as_str().to_string());
            positional += 1;
        }
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_text_has_no_attributes() {
        assert!(parse_attributes("").is_empty());
        assert!(parse_attributes("   ").is_empty());
    }

    #[test]
    fn double_quoted_value() {
        assert_eq!(
            parse_attributes(r#" id="3""#),
            attrs(&[("id", "3")])
        );
    }

    #[test]
    fn single_quoted_value_keeps_spaces() {
        assert_eq!(
            parse_attributes(" title='My Directory'"),
            attrs(&[("title", "My Directory")])
        );
    }

    #[test]
    fn unquoted_value() {
        assert_eq!(
            parse_attributes(" page_size=25 lightbox=true"),
            attrs(&[("page_size", "25"), ("lightbox", "true")])
        );
    }

    #[test]
    fn spaces_around_equals() {
        assert_eq!(parse_attributes(r#" id = "7""#), attrs(&[("id", "7")]));
    }

    #[test]
    fn names_are_lower_cased() {
        assert_eq!(parse_attributes(" ID=4"), attrs(&[("id", "4")]));
    }

    #[test]
    fn last_duplicate_wins() {
        assert_eq!(parse_attributes(" id=1 id=2"), attrs(&[("id", "2")]));
    }

    #[test]
    fn positional_values_are_numbered() {
        assert_eq!(
            parse_attributes(r#" compact "first" 'second'"#),
            attrs(&[("0", "compact"), ("1", "first"), ("2", "second")])
        );
    }

    #[test]
    fn mixed_named_and_positional() {
        assert_eq!(
            parse_attributes(r#" id="9" featured"#),
            attrs(&[("id", "9"), ("0", "featured")])
        );
    }

    #[test]
    fn empty_quoted_value() {
        assert_eq!(parse_attributes(r#" search="""#), attrs(&[("search", "")]));
    }

    #[test]
    fn non_breaking_space_separates() {
        assert_eq!(
            parse_attributes(" a=1\u{00a0}b=2"),
            attrs(&[("a", "1"), ("b", "2")])
        );
    }
}
