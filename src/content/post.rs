//! Post model and post-list lookups

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::markdown::strip_html;

/// Words per minute used for the reading-time estimate
const READING_WPM: usize = 200;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL-safe unique key, derived from the source filename
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short description for listings and meta tags
    pub description: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Post author
    pub author: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Plain-text excerpt for listings
    pub excerpt: String,

    /// Estimated reading time in minutes (word count / 200 wpm, min 1)
    pub reading_time: usize,

    /// Whether the post is published (false for drafts)
    pub published: bool,

    /// URL path (e.g. /blog/hello-world)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, date: DateTime<Local>) -> Self {
        Self {
            slug,
            title,
            description: String::new(),
            date,
            updated: None,
            author: String::new(),
            tags: Vec::new(),
            raw: String::new(),
            content: String::new(),
            excerpt: String::new(),
            reading_time: 1,
            published: true,
            path: String::new(),
            permalink: String::new(),
            full_source: PathBuf::new(),
            extra: HashMap::new(),
        }
    }
}

/// Estimate reading time in minutes from rendered HTML
pub fn reading_time(content: &str) -> usize {
    let words = strip_html(content).split_whitespace().count();
    words.div_ceil(READING_WPM).max(1)
}

/// Posts sharing at least one tag, ranked by shared-tag count then recency
pub fn related_posts<'a>(post: &Post, posts: &'a [Post], limit: usize) -> Vec<&'a Post> {
    let mut scored: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|p| p.slug != post.slug)
        .filter_map(|p| {
            let shared = p.tags.iter().filter(|t| post.tags.contains(t)).count();
            (shared > 0).then_some((shared, p))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.date.cmp(&a.1.date)));
    scored.into_iter().take(limit).map(|(_, p)| p).collect()
}

/// Previous (older) and next (newer) posts in a newest-first list
pub fn adjacent_posts<'a>(post: &Post, posts: &'a [Post]) -> (Option<&'a Post>, Option<&'a Post>) {
    let Some(pos) = posts.iter().position(|p| p.slug == post.slug) else {
        return (None, None);
    };

    let prev = posts.get(pos + 1);
    let next = if pos > 0 { posts.get(pos - 1) } else { None };
    (prev, next)
}
