//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"title: My Site
description: Notes on software and other things
author: Your Name
url: http://localhost:3000
posts_per_page: 6

social:
  github: your-github
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
description: The first post on this site
date: {date}
tags:
  - meta
---

Welcome! This post was created by `folio init`. Edit or delete it, then add
your own markdown files under `content/posts/`.

```rust
fn main() {
    println!("hello, folio");
}
```
"#;

const SAMPLE_PROJECTS: &str = r#"# Portfolio projects shown on /projects
- id: example-project
  title: Example Project
  description: A placeholder project entry
  date: {date}
  technologies: [rust]
  category: tools
  status: in-progress
  featured: true
"#;

const SAMPLE_ABOUT: &str = r#"---
title: About
---

A few words about yourself go here.
"#;

/// Scaffold a new site directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("folio.yml").exists() {
        bail!("{:?} already contains a folio site", target_dir);
    }

    let posts_dir = target_dir.join("content/posts");
    fs::create_dir_all(&posts_dir)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    fs::write(target_dir.join("folio.yml"), DEFAULT_CONFIG)?;
    fs::write(
        posts_dir.join("hello-world.md"),
        SAMPLE_POST.replace("{date}", &today),
    )?;
    fs::write(
        target_dir.join("content/projects.yml"),
        SAMPLE_PROJECTS.replace("{date}", &today),
    )?;
    fs::write(target_dir.join("content/about.md"), SAMPLE_ABOUT)?;

    tracing::info!("Scaffolded site in {:?}", target_dir);
    Ok(())
}
