//! folio: a personal blog and portfolio server
//!
//! Content lives as markdown files with YAML front-matter plus a projects
//! data file; pages are rendered per request with embedded Tera templates
//! and every response carries a fixed security header set and a
//! Content-Security-Policy built at startup.

pub mod commands;
pub mod config;
pub mod content;
pub mod filters;
pub mod helpers;
pub mod security;
pub mod seo;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory (holds folio.yml)
    pub base_dir: std::path::PathBuf,
    /// Content directory (posts + projects.yml)
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("folio.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env_overrides();

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Load all site content (posts + projects) from disk
    pub fn load_content(&self) -> Result<content::SiteContent> {
        content::SiteContent::load(self)
    }
}
