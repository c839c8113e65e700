//! folio-rs: content pipeline and page builder for a personal portfolio site
//!
//! Two independent pipelines live here. The content side reads markdown
//! projects and posts with front-matter, orders and filters them, and renders
//! sanitized HTML. The builder side expands includes and tokens in plain HTML
//! pages into a mirrored output tree.

pub mod builder;
pub mod commands;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown content root (holds `projects/` and `posts/`)
    pub content_dir: PathBuf,
    /// Page builder source directory
    pub source_dir: PathBuf,
    /// HTML pages, under the source directory
    pub pages_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already-loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let source_dir = base_dir.join(&config.source_dir);
        let pages_dir = source_dir.join(&config.pages_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            source_dir,
            pages_dir,
            public_dir,
        }
    }

    /// Content repository over the content directory
    pub fn repository(&self) -> content::Repository {
        content::Repository::new(&self.content_dir)
    }

    /// Markdown renderer for document bodies
    pub fn renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::new()
    }

    /// Build the static pages
    pub fn build(&self) -> Result<builder::BuildReport> {
        Ok(builder::Builder::new(self).build()?)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
