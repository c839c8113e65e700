//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Directory
    pub content_dir: String,
    pub source_dir: String,
    pub pages_dir: String,
    pub public_dir: String,
    pub asset_dirs: Vec<String>,

    // Builder
    /// Site-wide default tokens, overridden by page metadata
    pub tokens: IndexMap<String, String>,
    pub max_include_depth: usize,

    // Content
    pub excerpt_words: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "bruh.ae".to_string(),
            description: "A 2000s-style personal site".to_string(),

            content_dir: "content".to_string(),
            source_dir: "src".to_string(),
            pages_dir: "pages".to_string(),
            public_dir: "dist".to_string(),
            asset_dirs: vec![
                "assets".to_string(),
                "styles".to_string(),
                "scripts".to_string(),
            ],

            tokens: IndexMap::new(),
            max_include_depth: 32,

            excerpt_words: 40,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Default token values, in declaration order: title, description, then
    /// any configured extras
    pub fn default_tokens(&self) -> IndexMap<String, String> {
        let mut tokens = IndexMap::new();
        tokens.insert("title".to_string(), self.title.clone());
        tokens.insert("description".to_string(), self.description.clone());
        for (key, value) in &self.tokens {
            tokens.insert(key.clone(), value.clone());
        }
        tokens
    }
}
