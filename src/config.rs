//! Configuration loading.
//!
//! `defaults/tagscan.default.toml` is embedded into the binary so that docs and
//! runtime behavior stay in sync. User files and single-key overrides are layered on
//! top of those defaults via [`Loader`] before deserializing into [`TagscanConfig`].

use crate::error::TagscanError;
use crate::formats::OutputFormat;
use crate::registry::Registry;
use crate::scanner::{NestingPolicy, ScanOptions};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/tagscan.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TagscanConfig {
    pub scan: ScanConfig,
    pub registry: RegistryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub nesting_policy: NestingPolicy,
}

/// Tag names recognized during a scan.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl TagscanConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_depth: self.scan.max_depth,
            policy: self.scan.nesting_policy,
        }
    }

    pub fn registry(&self) -> Registry {
        self.registry.tags.iter().cloned().collect()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override; the CLI maps its flags onto these.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TagscanConfig, TagscanError> {
        let config: TagscanConfig = self.builder.build()?.try_deserialize()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TagscanConfig, TagscanError> {
    Loader::new().build()
}
