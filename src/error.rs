//! Error types for the configuration, input and output surfaces
//!
//! Scanning itself is total and never produces these.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TagscanError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown output format '{0}' (available: json, yaml, treeviz, count)")]
    UnknownFormat(String),

    #[error("Unknown nesting policy '{0}' (available: nested, flattened)")]
    UnknownPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let error = TagscanError::Io {
            path: PathBuf::from("posts/missing.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read posts/missing.html: no such file"
        );
    }

    #[test]
    fn unknown_format_lists_choices() {
        let error = TagscanError::UnknownFormat("xml".into());
        assert!(error.to_string().contains("json, yaml, treeviz, count"));
    }
}
