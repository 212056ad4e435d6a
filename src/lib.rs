//! folio-rs: a static portfolio/blog generator
//!
//! Posts come from one configured content provider (a local folder of
//! Markdown files, a Strapi backend or a Contentful space), are normalized
//! into uniform [`content::PostSummary`] records and rendered into static
//! pages with embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod provider;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{EnvSource, ProcessEnv, ProviderKind, ProviderSettings, SiteConfig};
use content::MarkdownRenderer;
use provider::ContentProvider;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The site being built
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Load the site in `base_dir`; a missing `_config.yml` means defaults
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Use `kind` instead of the configured provider
    pub fn override_provider(&mut self, kind: ProviderKind) {
        self.config.provider.kind = kind;
    }

    /// Markdown renderer honoring the `highlight` settings
    pub fn markdown_renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_options(
            &self.config.highlight.theme,
            self.config.highlight.line_number,
        )
    }

    /// Resolve provider settings, reading credentials from `env`
    pub fn provider_settings(&self, env: &impl EnvSource) -> Result<ProviderSettings> {
        ProviderSettings::resolve(&self.config.provider, &self.base_dir, env)
            .context("Invalid content provider configuration")
    }

    /// Build the configured provider with credentials from `env`
    pub fn provider_with_env(&self, env: &impl EnvSource) -> Result<Arc<dyn ContentProvider>> {
        let settings = self.provider_settings(env)?;
        Ok(provider::from_settings(settings, self.markdown_renderer())?)
    }

    /// Build the configured provider with credentials from the process environment
    pub fn provider(&self) -> Result<Arc<dyn ContentProvider>> {
        self.provider_with_env(&ProcessEnv)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post file
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}
