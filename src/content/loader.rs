//! Content loader - loads posts from the content directory

use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use super::markdown::strip_html;
use super::post::reading_time;
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::Folio;

/// Errors raised while loading a single content file
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render markdown for {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        let renderer = MarkdownRenderer::with_theme(&folio.config.highlight.theme);
        Self { folio, renderer }
    }

    /// Load all posts from content/posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.content_dir.join("posts");
        if !posts_dir.exists() {
            tracing::warn!("Posts directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut seen_slugs: HashSet<String> = HashSet::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(post) => {
                    if !post.published && !self.folio.config.render_drafts {
                        continue;
                    }
                    if !seen_slugs.insert(post.slug.clone()) {
                        tracing::warn!(
                            "Duplicate slug {:?}, replacing earlier post",
                            post.slug
                        );
                        posts.retain(|p: &Post| p.slug != post.slug);
                    }
                    posts.push(post);
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        // Newest first
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Render a standalone markdown page (e.g. content/about.md)
    ///
    /// Front-matter is stripped; a missing or unrenderable file is None.
    pub fn load_page(&self, path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        let (_, body) = FrontMatter::parse(&content);
        match self.renderer.render(body) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!("Failed to render page {:?}: {}", path, e);
                None
            }
        }
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let display_path = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: display_path.clone(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content);

        // File mtime backs up a missing date
        let file_modified = fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));
        let updated = fm.parse_updated().or(file_modified);

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slug::slugify)
            .unwrap_or_else(|| "untitled".to_string());

        let title = fm.title.unwrap_or_else(|| slug.clone());

        let content_html = self
            .renderer
            .render(body)
            .map_err(|source| ContentError::Render {
                path: display_path,
                source,
            })?;

        let description = fm
            .description
            .clone()
            .unwrap_or_else(|| make_excerpt(&content_html, 160));

        let path_str = format!("/blog/{}", slug);
        let permalink = format!(
            "{}{}",
            self.folio.config.url.trim_end_matches('/'),
            path_str
        );

        let mut post = Post::new(slug, title, date);
        post.description = description;
        post.updated = updated;
        post.author = fm
            .author
            .unwrap_or_else(|| self.folio.config.author.clone());
        post.tags = fm.tags;
        post.raw = body.to_string();
        post.excerpt = make_excerpt(&content_html, 240);
        post.reading_time = reading_time(&content_html);
        post.content = content_html;
        post.published = !fm.draft;
        post.path = path_str;
        post.permalink = permalink;
        post.full_source = path.to_path_buf();
        post.extra = fm.extra;

        Ok(post)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Plain-text excerpt from rendered HTML, cut at a word boundary
fn make_excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_html(html);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= max_chars {
        return text;
    }

    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}…", &truncated[..cut])
}
