//! # tagscan
//!
//! A recursive scanner for bracketed shortcode tags such as
//! `[gravityview id="3"]`, `[gallery ids="1,2"/]` or `[wrap]...[/wrap]`.
//!
//! The crate is layered the same way the scan runs:
//!
//! - [lexing]: logos tokenizer over the raw text.
//! - [grammar]: recognizes the registered tags of one nesting level, pairs openers with
//!   closers and drops escaped `[[...]]` forms.
//! - [attributes]: parses the attribute text of an opening tag.
//! - [scanner]: walks the levels recursively and collects [`TagMatch`] values for one
//!   target tag.
//!
//! Only tag names accepted by a [`TagRegistry`] are ever treated as tags.
//!
//! ```text
//! let registry = ["gravityview", "columns"];
//! let found = find_tag_occurrences(post_body, "gravityview", &registry);
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod lexing;
pub mod registry;
pub mod scanner;

pub use attributes::{parse_attributes, Attributes};
pub use error::TagscanError;
pub use grammar::{parse_shortcodes, Shortcode};
pub use registry::{is_valid_tag_name, Registry, TagRegistry};
pub use scanner::{
    find_tag_occurrences, has_tag, has_view_tag, total_matches, view_tags, NestingPolicy,
    ScanOptions, Scanner, TagMatch, DEFAULT_MAX_DEPTH, VIEW_TAG,
};
