//! Create a new post

use anyhow::{bail, Result};
use std::fs;

use crate::Folio;

/// Create a new post file under content/posts
pub fn create_post(folio: &Folio, title: &str, draft: bool) -> Result<()> {
    let posts_dir = folio.content_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;

    let slug = slug::slugify(title);
    let file_path = posts_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        bail!("Post already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let mut front_matter = format!(
        "---\ntitle: {}\ndescription: \ndate: {}\ntags: []\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    if draft {
        front_matter.push_str("draft: true\n");
    }
    front_matter.push_str("---\n\n");

    fs::write(&file_path, front_matter)?;
    println!("Created {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn folio() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        (dir, folio)
    }

    #[test]
    fn test_create_post() {
        let (_dir, folio) = folio();
        create_post(&folio, "My New Post", false).unwrap();

        let path = folio.content_dir.join("posts/my-new-post.md");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("---\ntitle: My New Post"));
        assert!(!content.contains("draft: true"));
    }

    #[test]
    fn test_create_draft() {
        let (_dir, folio) = folio();
        create_post(&folio, "WIP", true).unwrap();

        let content = fs::read_to_string(folio.content_dir.join("posts/wip.md")).unwrap();
        assert!(content.contains("draft: true"));
    }

    #[test]
    fn test_refuses_duplicate() {
        let (_dir, folio) = folio();
        create_post(&folio, "Once", false).unwrap();
        assert!(create_post(&folio, "Once", false).is_err());
    }
}
