//! Portfolio projects loaded from content/projects.yml

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
}

fn default_category() -> String {
    "general".to_string()
}

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    /// Human-readable label for templates
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Planned => "Planned",
        }
    }
}

/// Load projects from a YAML file, newest first.
///
/// A missing or malformed file yields an empty list with a warning; duplicate
/// ids keep the first occurrence.
pub fn load_projects(path: &Path) -> Vec<Project> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("No projects file at {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let mut projects: Vec<Project> = match serde_yaml::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Failed to parse projects file {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    projects.retain(|p| {
        let fresh = seen.insert(p.id.clone());
        if !fresh {
            tracing::warn!("Duplicate project id {:?}, keeping first", p.id);
        }
        fresh
    });

    projects.sort_by(|a, b| b.date.cmp(&a.date));
    projects
}
