//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for blogtoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Table of contents settings.
    #[serde(default)]
    pub toc: TocConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, used as the last title fallback for articles.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Default language code.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// `strftime` pattern for publish dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding exported article JSON files.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Abort the whole build on the first article that fails to render.
    #[serde(default)]
    pub fail_fast: bool,
}

/// Table of contents configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocConfig {
    /// Whether article bodies are annotated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prefix prepended to every anchor id. Empty keeps bare integers.
    #[serde(default)]
    pub anchor_prefix: String,

    /// Treat any HTML parse error as fatal.
    #[serde(default)]
    pub strict: bool,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            fail_fast: false,
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor_prefix: String::new(),
            strict: false,
        }
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the site identity.
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                base_url: base_url.into(),
                default_language: default_language(),
                description: None,
                author: None,
                date_format: default_date_format(),
            },
            build: BuildConfig::default(),
            toc: TocConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, honouring `BLOGTOC__*` overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("BLOGTOC").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        if self
            .toc
            .anchor_prefix
            .chars()
            .any(|c| c.is_whitespace() || c == '#')
        {
            return Err(CoreError::config(
                "toc.anchor_prefix cannot contain whitespace or '#'",
            ));
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
