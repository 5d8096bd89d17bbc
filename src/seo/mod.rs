//! SEO metadata, Atom feed, and search index

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{strip_html, Post};
use crate::helpers::full_url_for;

mod feed;

pub use feed::{atom_feed, search_index};

/// Metadata rendered into the head partial of every page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Document title, "page — site"
    pub title: String,
    pub description: String,
    pub canonical: String,
    /// Open Graph type: "website" or "article"
    pub og_type: String,
    pub site_name: String,
    pub author: String,
    /// Article fields, present for posts only
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub tags: Vec<String>,
    /// JSON-LD payload for posts, pre-serialized
    pub json_ld: Option<String>,
}

impl PageMeta {
    /// Metadata for a non-article page
    pub fn page(config: &SiteConfig, title: &str, description: &str, path: &str) -> Self {
        let title = if title.is_empty() {
            config.title.clone()
        } else {
            format!("{} — {}", title, config.title)
        };

        Self {
            title,
            description: description.to_string(),
            canonical: full_url_for(config, path),
            og_type: "website".to_string(),
            site_name: config.title.clone(),
            author: config.author.clone(),
            published_time: None,
            modified_time: None,
            tags: Vec::new(),
            json_ld: None,
        }
    }

    /// Metadata for a blog post
    pub fn post(config: &SiteConfig, post: &Post) -> Self {
        let mut meta = Self::page(config, &post.title, &post.description, &post.path);
        meta.og_type = "article".to_string();
        meta.author = post.author.clone();
        meta.published_time = Some(post.date.to_rfc3339());
        meta.modified_time = post.updated.map(|d| d.to_rfc3339());
        meta.tags = post.tags.clone();
        meta.json_ld = Some(json_ld(config, post));
        meta
    }
}

/// BlogPosting JSON-LD for a post page
fn json_ld(config: &SiteConfig, post: &Post) -> String {
    let value = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.description,
        "url": post.permalink,
        "datePublished": post.date.to_rfc3339(),
        "dateModified": post.updated.unwrap_or(post.date).to_rfc3339(),
        "author": {
            "@type": "Person",
            "name": post.author,
        },
        "keywords": post.tags.join(", "),
        "wordCount": strip_html(&post.content).split_whitespace().count(),
        "publisher": {
            "@type": "Person",
            "name": config.author,
        },
    });
    value.to_string()
}
