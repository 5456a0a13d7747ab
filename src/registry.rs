//! Tag registry
//!
//! The scanner only recognizes tags whose names a registry accepts. A registry is any
//! [`TagRegistry`]: the owned [`Registry`] set, a `HashSet<String>`, a list of names, or
//! a closure `Fn(&str) -> bool`.

use std::collections::{BTreeSet, HashSet};

/// Capability consulted before a candidate tag name is treated as a tag.
pub trait TagRegistry {
    fn is_registered(&self, name: &str) -> bool;
}

impl<F> TagRegistry for F
where
    F: Fn(&str) -> bool,
{
    fn is_registered(&self, name: &str) -> bool {
        self(name)
    }
}

impl TagRegistry for HashSet<String> {
    fn is_registered(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl TagRegistry for [&str] {
    fn is_registered(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl<const N: usize> TagRegistry for [&str; N] {
    fn is_registered(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Check that a name is a usable tag name: non-empty, ASCII letters, digits, `_` or `-`.
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Owned set of registered tag names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    tags: BTreeSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag name. Invalid names are rejected and `false` is returned.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if !is_valid_tag_name(&name) {
            tracing::warn!(tag = %name, "ignoring invalid tag name");
            return false;
        }
        self.tags.insert(name);
        true
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.register(name);
        self
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.tags.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagRegistry for Registry {
    fn is_registered(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for Registry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for name in iter {
            registry.register(name);
        }
        registry
    }
}

impl<S: Into<String>> Extend<S> for Registry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.register(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tag_names() {
        assert!(is_valid_tag_name("gravityview"));
        assert!(is_valid_tag_name("gv_entry-link2"));
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("has space"));
        assert!(!is_valid_tag_name("a/b"));
        assert!(!is_valid_tag_name("ünï"));
    }

    #[test]
    fn registry_rejects_invalid_names() {
        let mut registry = Registry::new();
        assert!(registry.register("view"));
        assert!(!registry.register("bad name"));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("view"));
        assert!(!registry.is_registered("bad name"));
    }

    #[test]
    fn registry_from_iterator_and_extend() {
        let mut registry: Registry = ["a", "b"].into_iter().collect();
        registry.extend(vec!["c".to_string()]);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(registry.unregister("b"));
        assert!(!registry.contains("b"));
    }

    #[test]
    fn closures_and_lists_are_registries() {
        let closure = |name: &str| name.starts_with("gv");
        assert!(closure.is_registered("gventry"));
        assert!(!closure.is_registered("gallery"));

        let list = ["gallery", "caption"];
        assert!(list.is_registered("caption"));
        assert!(!list[..].is_registered("audio"));

        let set: HashSet<String> = ["x".to_string()].into_iter().collect();
        assert!(set.is_registered("x"));
    }
}
