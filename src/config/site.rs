//! Site configuration (folio.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable overriding the configured site URL
pub const ENV_SITE_URL: &str = "FOLIO_SITE_URL";
/// Environment variable overriding the configured analytics id
pub const ENV_ANALYTICS_ID: &str = "FOLIO_ANALYTICS_ID";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub keywords: Option<Vec<String>>,

    // URL
    pub url: String,

    // Directories (relative to the site root)
    pub content_dir: String,

    // Blog listing
    pub posts_per_page: usize,
    /// Render posts marked `draft: true` (useful while writing)
    pub render_drafts: bool,

    // Analytics (script host is added to the CSP when set)
    pub analytics_id: Option<String>,
    pub analytics_host: String,

    #[serde(default)]
    pub social: SocialConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "folio".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),
            keywords: None,

            url: "http://localhost:3000".to_string(),

            content_dir: "content".to_string(),

            posts_per_page: 6,
            render_drafts: false,

            analytics_id: None,
            analytics_host: "https://plausible.io".to_string(),

            social: SocialConfig::default(),
            highlight: HighlightConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides (site URL, analytics id)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_SITE_URL) {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
        if let Ok(id) = std::env::var(ENV_ANALYTICS_ID) {
            if !id.trim().is_empty() {
                self.analytics_id = Some(id);
            }
        }
    }
}

/// Social links shown in the footer and used for SEO metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "folio");
        assert_eq!(config.posts_per_page, 6);
        assert!(config.analytics_id.is_none());
        assert!(!config.render_drafts);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
url: https://blog.example.com
posts_per_page: 10
analytics_id: blog.example.com
social:
  github: testuser
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.analytics_id.as_deref(), Some("blog.example.com"));
        assert_eq!(config.social.github.as_deref(), Some("testuser"));
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let yaml = "title: X\ncustom_flag: true\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.extra.contains_key("custom_flag"));
    }

    // Both override vars in one test, set and cleaned up together, since
    // the process environment is shared across the test binary.
    #[test]
    fn test_env_overrides() {
        std::env::set_var(ENV_SITE_URL, "https://override.example");
        std::env::set_var(ENV_ANALYTICS_ID, "override.example");
        let mut config = SiteConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.url, "https://override.example");
        assert_eq!(config.analytics_id.as_deref(), Some("override.example"));

        // Empty or blank values leave the configured values alone
        std::env::set_var(ENV_SITE_URL, "  ");
        std::env::set_var(ENV_ANALYTICS_ID, "");
        let mut config = SiteConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.url, SiteConfig::default().url);
        assert!(config.analytics_id.is_none());

        std::env::remove_var(ENV_SITE_URL);
        std::env::remove_var(ENV_ANALYTICS_ID);
    }
}
