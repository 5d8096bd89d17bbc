//! Content models and loading

mod frontmatter;
mod loader;
mod markdown;
mod post;
mod projects;

pub use frontmatter::FrontMatter;
pub use loader::{ContentError, ContentLoader};
pub use markdown::{strip_html, MarkdownRenderer};
pub use post::{adjacent_posts, related_posts, Post};
pub use projects::{load_projects, Project, ProjectStatus};

use anyhow::Result;

use crate::Folio;

/// Everything the site serves, loaded into memory
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    /// Published posts, newest first
    pub posts: Vec<Post>,
    /// Portfolio projects
    pub projects: Vec<Project>,
    /// Rendered HTML for the about page, when content/about.md exists
    pub about_html: Option<String>,
}

impl SiteContent {
    /// Load posts, projects and the about page from the content directory
    pub fn load(folio: &Folio) -> Result<Self> {
        let loader = ContentLoader::new(folio);
        let posts = loader.load_posts()?;
        let projects = load_projects(&folio.content_dir.join("projects.yml"));
        let about_html = loader.load_page(&folio.content_dir.join("about.md"));

        tracing::info!(
            "Loaded {} posts and {} projects",
            posts.len(),
            projects.len()
        );

        Ok(Self {
            posts,
            projects,
            about_html,
        })
    }
}
