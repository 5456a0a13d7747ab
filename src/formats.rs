//! Output formats for scan results
//!
//!     json     serde_json, pretty or compact
//!     yaml     serde_yaml
//!     treeviz  one line per match, two spaces of indentation per nesting level
//!     count    one line per source with the number of matches
//!
//! Treeviz lines look like
//!
//!     ⟦ name key="value" @start..end ¶ content preview...
//!
//! where the content preview is only present for paired tags, has newlines shown as ↵
//! and is truncated to 30 characters.

use crate::error::TagscanError;
use crate::scanner::{total_matches, TagMatch};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

const PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Yaml,
    Treeviz,
    Count,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Treeviz,
        OutputFormat::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Count => "count",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TagscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| TagscanError::UnknownFormat(s.to_string()))
    }
}

/// Matches found in one input source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub matches: Vec<TagMatch>,
}

impl SourceReport {
    pub fn new(source: impl Into<String>, matches: Vec<TagMatch>) -> Self {
        Self {
            source: source.into(),
            matches,
        }
    }

    pub fn total(&self) -> usize {
        total_matches(&self.matches)
    }
}

/// Render reports in the requested format.
pub fn serialize(
    reports: &[SourceReport],
    format: OutputFormat,
    pretty: bool,
) -> Result<String, TagscanError> {
    let output = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(reports)? + "\n",
        OutputFormat::Json => serde_json::to_string(reports)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(reports)?,
        OutputFormat::Treeviz => {
            let mut out = String::new();
            for report in reports {
                out.push_str(&report.source);
                out.push('\n');
                write_matches(&mut out, &report.matches, 1);
            }
            out
        }
        OutputFormat::Count => reports
            .iter()
            .map(|report| format!("{}: {}\n", report.source, report.total()))
            .collect(),
    };
    Ok(output)
}

/// Render a match list as a treeviz string.
pub fn to_treeviz(matches: &[TagMatch]) -> String {
    let mut out = String::new();
    write_matches(&mut out, matches, 0);
    out
}

fn write_matches(out: &mut String, matches: &[TagMatch], depth: usize) {
    for tag_match in matches {
        out.push_str(&"  ".repeat(depth));
        out.push_str("⟦ ");
        out.push_str(&tag_match.tag_name);
        for (key, value) in &tag_match.attributes {
            let _ = write!(out, " {}=\"{}\"", key, value);
        }
        let _ = write!(out, " @{}..{}", tag_match.span.start, tag_match.span.end);
        if let Some(content) = &tag_match.enclosed_content {
            out.push_str(" ¶ ");
            out.push_str(&preview(content));
        }
        out.push('\n');
        write_matches(out, &tag_match.children, depth + 1);
    }
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', "↵");
    if flat.chars().count() > PREVIEW_CHARS {
        let mut truncated = flat.chars().take(PREVIEW_CHARS).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        flat
    }
}
