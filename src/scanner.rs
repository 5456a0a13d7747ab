//! Nested-tag scanner
//!
//!     Finds every occurrence of one target tag in a block of text, including occurrences
//!     nested inside the content of other tags.
//!
//!     The scan works level by level. The [grammar](crate::grammar) returns the outermost
//!     registered tags of the text; each one is then handled as follows:
//!
//!         - target tag: recorded as a [`TagMatch`]. Its content is scanned again, and the
//!           findings are placed according to the [`NestingPolicy`].
//!         - any other tag with content: its content is scanned again and the findings are
//!           spliced into the result where the wrapper stood.
//!
//!     Results come out in order of first appearance, depth first. Recursion stops at
//!     `max_depth` levels below the top; deeper content is not searched.
//!
//!     The scanner never fails. Invalid or unregistered tag names, text without tags and
//!     malformed markup all give an empty result.

use crate::attributes::Attributes;
use crate::error::TagscanError;
use crate::grammar::parse_shortcodes;
use crate::registry::{is_valid_tag_name, TagRegistry};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

/// Maximum nesting levels searched below the top level unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Tag name used by directory views embedded in post content.
pub const VIEW_TAG: &str = "gravityview";

/// Where matches of the target tag found inside another match of the target tag go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestingPolicy {
    /// Attached to the outer match as `children`.
    #[default]
    Nested,
    /// Placed right after the outer match in the same flat list.
    Flattened,
}

impl FromStr for NestingPolicy {
    type Err = TagscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nested" => Ok(NestingPolicy::Nested),
            "flattened" => Ok(NestingPolicy::Flattened),
            other => Err(TagscanError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub max_depth: usize,
    pub policy: NestingPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            policy: NestingPolicy::default(),
        }
    }
}

/// One located occurrence of the target tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatch {
    pub raw_text: String,
    pub tag_name: String,
    pub attributes: Attributes,
    /// `None` for self-closing and unpaired tags.
    pub enclosed_content: Option<String>,
    /// Byte range of `raw_text` in the scanned input.
    pub span: Range<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TagMatch>,
}

impl TagMatch {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_self_closing(&self) -> bool {
        self.enclosed_content.is_none()
    }

    /// This match and all of its descendants, depth first.
    pub fn iter(&self) -> impl Iterator<Item = &TagMatch> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Number of matches in this subtree, this one included.
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Total matches in a result list, nested children included.
pub fn total_matches(matches: &[TagMatch]) -> usize {
    matches.iter().map(TagMatch::count).sum()
}

/// A scanner bound to a registry and a set of options.
pub struct Scanner<'r, R: TagRegistry + ?Sized> {
    registry: &'r R,
    options: ScanOptions,
}

impl<R: TagRegistry + ?Sized> Clone for Scanner<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: TagRegistry + ?Sized> Copy for Scanner<'_, R> {}

impl<R: TagRegistry + ?Sized> std::fmt::Debug for Scanner<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'r, R: TagRegistry + ?Sized> Scanner<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    pub fn policy(mut self, policy: NestingPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Find every occurrence of `tag_name` in `content`.
    pub fn find(&self, content: &str, tag_name: &str) -> Vec<TagMatch> {
        if !content.contains('[') {
            return Vec::new();
        }
        if !is_valid_tag_name(tag_name) {
            tracing::debug!(tag = tag_name, "invalid tag name, nothing to scan for");
            return Vec::new();
        }
        if !self.registry.is_registered(tag_name) {
            tracing::debug!(tag = tag_name, "tag is not registered");
            return Vec::new();
        }

        let matches = self.scan_level(content, 0, tag_name, 0);
        tracing::debug!(
            tag = tag_name,
            bytes = content.len(),
            found = total_matches(&matches),
            "scan finished"
        );
        matches
    }

    /// Whether `content` contains at least one occurrence of `tag_name`.
    pub fn contains(&self, content: &str, tag_name: &str) -> bool {
        !self.find(content, tag_name).is_empty()
    }

    fn scan_level(
        &self,
        text: &str,
        offset: usize,
        tag_name: &str,
        depth: usize,
    ) -> Vec<TagMatch> {
        let mut found = Vec::new();

        for shortcode in parse_shortcodes(text, self.registry) {
            let nested = match (shortcode.content, &shortcode.content_span) {
                (Some(inner), Some(range)) if inner.contains('[') => {
                    if depth < self.options.max_depth {
                        self.scan_level(inner, offset + range.start, tag_name, depth + 1)
                    } else {
                        tracing::debug!(
                            tag = shortcode.name,
                            depth,
                            "nesting limit reached, content not searched"
                        );
                        Vec::new()
                    }
                }
                _ => Vec::new(),
            };

            if shortcode.name != tag_name {
                found.extend(nested);
                continue;
            }

            tracing::trace!(
                tag = tag_name,
                start = offset + shortcode.span.start,
                depth,
                "match"
            );
            let mut tag_match = TagMatch {
                raw_text: shortcode.raw.to_string(),
                tag_name: shortcode.name.to_string(),
                attributes: shortcode.attributes,
                enclosed_content: shortcode.content.map(str::to_string),
                span: offset + shortcode.span.start..offset + shortcode.span.end,
                children: Vec::new(),
            };

            match self.options.policy {
                NestingPolicy::Nested => {
                    tag_match.children = nested;
                    found.push(tag_match);
                }
                NestingPolicy::Flattened => {
                    found.push(tag_match);
                    found.extend(nested);
                }
            }
        }

        found
    }
}

/// Find every occurrence of `tag_name` in `content` with the default options.
pub fn find_tag_occurrences<R>(content: &str, tag_name: &str, registry: &R) -> Vec<TagMatch>
where
    R: TagRegistry + ?Sized,
{
    Scanner::new(registry).find(content, tag_name)
}

/// Whether `content` contains `tag_name` anywhere, nested occurrences included.
pub fn has_tag<R>(content: &str, tag_name: &str, registry: &R) -> bool
where
    R: TagRegistry + ?Sized,
{
    Scanner::new(registry).contains(content, tag_name)
}

/// The directory view tags embedded in a post body, if any.
pub fn view_tags<R>(content: &str, registry: &R) -> Option<Vec<TagMatch>>
where
    R: TagRegistry + ?Sized,
{
    let matches = find_tag_occurrences(content, VIEW_TAG, registry);
    (!matches.is_empty()).then_some(matches)
}

/// Whether a post body embeds a directory view.
pub fn has_view_tag<R>(content: &str, registry: &R) -> bool
where
    R: TagRegistry + ?Sized,
{
    has_tag(content, VIEW_TAG, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: [&str; 3] = ["g", "wrap", "gravityview"];

    #[test]
    fn no_brackets_no_matches() {
        assert!(find_tag_occurrences("plain text", "g", &REGISTRY).is_empty());
        assert!(find_tag_occurrences("", "g", &REGISTRY).is_empty());
    }

    #[test]
    fn self_closing_match() {
        let found = find_tag_occurrences(r#"x [g attr="v"/] y"#, "g", &REGISTRY);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attribute("attr"), Some("v"));
        assert_eq!(found[0].attributes.len(), 1);
        assert!(found[0].is_self_closing());
        assert_eq!(found[0].span, 2..15);
        assert!(found[0].children.is_empty());
    }

    #[test]
    fn paired_match() {
        let found = find_tag_occurrences("[g]inner[/g]", "g", &REGISTRY);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].enclosed_content.as_deref(), Some("inner"));
        assert_eq!(found[0].raw_text, "[g]inner[/g]");
    }

    #[test]
    fn wrapper_is_transparent() {
        let found = find_tag_occurrences("[wrap][g]a[/g][g]b[/g][/wrap]", "g", &REGISTRY);
        let contents: Vec<_> = found
            .iter()
            .map(|m| m.enclosed_content.as_deref())
            .collect();
        assert_eq!(contents, vec![Some("a"), Some("b")]);
        assert_eq!(found[0].span, 6..14);
        assert_eq!(found[1].span, 14..22);
    }

    #[test]
    fn self_nesting_nested_policy() {
        let found = find_tag_occurrences("[g][g]x[/g][/g]", "g", &REGISTRY);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].enclosed_content.as_deref(), Some("[g]x[/g]"));
        assert_eq!(found[0].children.len(), 1);
        assert_eq!(found[0].children[0].enclosed_content.as_deref(), Some("x"));
        assert_eq!(found[0].children[0].span, 3..11);
        assert_eq!(total_matches(&found), 2);
    }

    #[test]
    fn self_nesting_flattened_policy() {
        let found = Scanner::new(&REGISTRY)
            .policy(NestingPolicy::Flattened)
            .find("[g][g]x[/g][/g]", "g");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].raw_text, "[g][g]x[/g][/g]");
        assert_eq!(found[1].raw_text, "[g]x[/g]");
        assert!(found.iter().all(|m| m.children.is_empty()));
    }

    #[test]
    fn escaped_tags_do_not_match() {
        assert!(find_tag_occurrences("[[g]]not-a-shortcode[[/g]]", "g", &REGISTRY).is_empty());
    }

    #[test]
    fn unregistered_target_does_not_match() {
        assert!(find_tag_occurrences("[h/]", "h", &REGISTRY).is_empty());
        let only_wrap = ["wrap"];
        assert!(find_tag_occurrences("[wrap][g/][/wrap]", "g", &only_wrap).is_empty());
    }

    #[test]
    fn invalid_tag_names_do_not_match() {
        let anything = |_: &str| true;
        assert!(find_tag_occurrences("[g/]", "", &anything).is_empty());
        assert!(find_tag_occurrences("[g/]", "g g", &anything).is_empty());
    }

    #[test]
    fn depth_limit_stops_descent() {
        let text = "[wrap][wrap][g/][/wrap][/wrap]";
        let scanner = Scanner::new(&REGISTRY);
        assert_eq!(scanner.max_depth(2).find(text, "g").len(), 1);
        assert!(scanner.max_depth(1).find(text, "g").is_empty());
        assert!(scanner.max_depth(0).find(text, "g").is_empty());
        assert_eq!(scanner.max_depth(0).find("[g/]", "g").len(), 1);
    }

    #[test]
    fn depth_limit_keeps_outer_match() {
        let found = Scanner::new(&REGISTRY)
            .max_depth(0)
            .find("[g][g/][/g]", "g");
        assert_eq!(found.len(), 1);
        assert!(found[0].children.is_empty());
    }

    #[test]
    fn iter_is_depth_first() {
        let text = "[g id=1][g id=2][g id=3/][/g][g id=4/][/g]";
        let found = find_tag_occurrences(text, "g", &REGISTRY);
        let ids: Vec<_> = found[0].iter().filter_map(|m| m.attribute("id")).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(found[0].count(), 4);
    }

    #[test]
    fn view_tag_helpers() {
        let registry = ["gravityview"];
        let post = r#"Intro [gravityview id="12"] outro"#;
        assert!(has_view_tag(post, &registry));
        let tags = view_tags(post, &registry).expect("view tag present");
        assert_eq!(tags[0].attribute("id"), Some("12"));
        assert!(view_tags("no views", &registry).is_none());
        assert!(!has_view_tag(post, &["gallery"]));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("nested".parse::<NestingPolicy>().ok(), Some(NestingPolicy::Nested));
        assert_eq!(
            "flattened".parse::<NestingPolicy>().ok(),
            Some(NestingPolicy::Flattened)
        );
        assert!("sideways".parse::<NestingPolicy>().is_err());
    }
}
