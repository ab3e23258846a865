//! Shared configuration loader for the chatmark toolchain.
//!
//! `defaults/chatmark.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ChatmarkConfig`].

use chatmark_babel::grammar::RuleParser;
use chatmark_babel::render::RenderTarget;
use chatmark_babel::{RenderOptions, SerializerOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/chatmark.default.toml");

/// Top-level configuration consumed by chatmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatmarkConfig {
    pub serializer: SerializerConfig,
    pub renderer: RendererConfig,
}

/// Knobs of the styled tree → markdown direction.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializerConfig {
    pub embed_links: bool,
    pub escape_markdown: bool,
    pub max_depth: usize,
}

impl From<&SerializerConfig> for SerializerOptions {
    fn from(config: &SerializerConfig) -> Self {
        SerializerOptions::defaults()
            .with_embed_links(config.embed_links)
            .with_escape_markdown(config.escape_markdown)
            .with_max_depth(config.max_depth)
    }
}

/// Knobs of the markdown → styled tree direction and of escape mode.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    pub debug: bool,
    pub max_depth: usize,
}

impl RendererConfig {
    /// Applies these settings on top of existing options; rules and renderers are kept, the
    /// parser is replaced by the bundled one with the configured depth limit.
    pub fn apply<O: RenderTarget>(&self, options: &RenderOptions<O>) -> RenderOptions<O> {
        options
            .with_debug(self.debug)
            .with_max_depth(self.max_depth)
            .with_parser(Arc::new(RuleParser::with_max_depth(self.max_depth)))
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

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ChatmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ChatmarkConfig, ConfigError> {
    Loader::new().build()
}
