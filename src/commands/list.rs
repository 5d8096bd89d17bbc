//! List site content to stdout

use anyhow::{bail, Result};

use crate::filters::tag_counts;
use crate::Folio;

/// List posts, tags or projects
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let content = folio.load_content()?;

    match content_type {
        "posts" | "post" => {
            println!("{:<12} {:<40} {}", "Date", "Title", "Tags");
            for post in &content.posts {
                println!(
                    "{:<12} {:<40} {}",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.tags.join(", ")
                );
            }
            println!("\n{} posts", content.posts.len());
        }

        "tags" | "tag" => {
            for tag in tag_counts(&content.posts) {
                println!("{:<24} {}", tag.name, tag.count);
            }
        }

        "projects" | "project" => {
            println!("{:<20} {:<12} {:<12} {}", "Id", "Date", "Status", "Title");
            for project in &content.projects {
                println!(
                    "{:<20} {:<12} {:<12} {}",
                    project.id,
                    project.date,
                    project.status.label(),
                    project.title
                );
            }
        }

        other => {
            bail!("Unknown list type {:?} (expected posts, tags or projects)", other);
        }
    }

    Ok(())
}
