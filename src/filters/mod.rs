//! Blog listing pipeline: search, tag filter, sort, paginate
//!
//! The whole listing is a single-pass recomputation over the in-memory post
//! list, driven by URL query parameters. Filter links emitted by the
//! templates never carry a `page` parameter, so changing any filter lands on
//! page one; out-of-range pages are clamped instead of erroring.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::content::Post;

/// Sort field for the blog listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Title,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Listing layout toggle (cosmetic, echoed back to the template)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Query parameters accepted by the blog index
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogQuery {
    /// Search string, matched against title, description and tags
    pub q: Option<String>,
    /// Exact tag filter
    pub tag: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sort: SortField,
    #[serde(deserialize_with = "lenient")]
    pub order: SortOrder,
    #[serde(deserialize_with = "lenient")]
    pub view: ViewMode,
    #[serde(deserialize_with = "lenient")]
    pub page: Option<usize>,
}

/// Unknown enum values fall back to the default instead of failing the request
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(T::deserialize(deserializer).unwrap_or_default())
}

/// One page of filtered results plus everything the template needs
#[derive(Debug, Clone, Serialize)]
pub struct BlogPage {
    /// Posts in the current page window
    pub posts: Vec<Post>,
    /// Total matches before pagination
    pub total: usize,
    /// Current page, clamped to 1..=total_pages
    pub page: usize,
    pub total_pages: usize,
    /// Distinct tags with counts across published posts, sorted by name
    pub tags: Vec<TagCount>,
    pub query: String,
    pub tag: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
    pub view: ViewMode,
    /// Query-string suffix carrying the active filters (no page parameter)
    pub filter_params: String,
    /// Same suffix without the view parameter, for the view toggle links
    pub view_params: String,
}

/// A tag and how many published posts carry it
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Run the full listing pipeline over the post list
pub fn filter_posts(posts: &[Post], query: &BlogQuery, per_page: usize) -> BlogPage {
    // Matching is case-insensitive; the typed string is kept for display
    let q_raw = query.q.as_deref().unwrap_or("").trim();
    let q = q_raw.to_lowercase();
    let tag = query.tag.as_deref().filter(|t| !t.is_empty());

    let mut matched: Vec<&Post> = posts
        .iter()
        .filter(|p| p.published)
        .filter(|p| {
            if q.is_empty() {
                return true;
            }
            p.title.to_lowercase().contains(&q)
                || p.description.to_lowercase().contains(&q)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
        })
        .filter(|p| tag.map_or(true, |t| p.tags.iter().any(|pt| pt == t)))
        .collect();

    match (query.sort, query.order) {
        (SortField::Date, SortOrder::Desc) => matched.sort_by(|a, b| b.date.cmp(&a.date)),
        (SortField::Date, SortOrder::Asc) => matched.sort_by(|a, b| a.date.cmp(&b.date)),
        (SortField::Title, SortOrder::Asc) => {
            matched.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        (SortField::Title, SortOrder::Desc) => {
            matched.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
    }

    let total = matched.len();
    let per_page = per_page.max(1);
    let total_pages = total.div_ceil(per_page).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let window: Vec<Post> = matched
        .into_iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    BlogPage {
        posts: window,
        total,
        page,
        total_pages,
        tags: tag_counts(posts),
        filter_params: filter_params(q_raw, tag, query.sort, query.order, Some(query.view)),
        view_params: filter_params(q_raw, tag, query.sort, query.order, None),
        query: q_raw.to_string(),
        tag: tag.map(|t| t.to_string()),
        sort: query.sort,
        order: query.order,
        view: query.view,
    }
}

/// Distinct tags with counts across published posts, sorted by name
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
    for post in posts.iter().filter(|p| p.published) {
        for tag in &post.tags {
            if tag.trim().is_empty() {
                continue;
            }
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect()
}

/// Build the query-string suffix for pager links, omitting defaults
fn filter_params(
    q: &str,
    tag: Option<&str>,
    sort: SortField,
    order: SortOrder,
    view: Option<ViewMode>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !q.is_empty() {
        parts.push(format!(
            "q={}",
            utf8_percent_encode(q, NON_ALPHANUMERIC)
        ));
    }
    if let Some(tag) = tag {
        parts.push(format!(
            "tag={}",
            utf8_percent_encode(tag, NON_ALPHANUMERIC)
        ));
    }
    if sort != SortField::default() {
        parts.push("sort=title".to_string());
    }
    if order != SortOrder::default() {
        parts.push("order=asc".to_string());
    }
    if view.is_some_and(|v| v != ViewMode::default()) {
        parts.push("view=list".to_string());
    }

    parts.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(slug: &str, title: &str, day: u32, tags: &[&str], published: bool) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let mut p = Post::new(slug.to_string(), title.to_string(), date);
        p.description = format!("About {}", title);
        p.tags = tags.iter().map(|t| t.to_string()).collect();
        p.published = published;
        p
    }

    fn sample() -> Vec<Post> {
        vec![
            post("zebra", "Zebra Patterns", 5, &["animals"], true),
            post("axum-intro", "Intro to Axum", 4, &["rust", "web"], true),
            post("rust-errors", "Rust Error Handling", 3, &["rust"], true),
            post("secret", "Unpublished Draft", 2, &["rust"], false),
        ]
    }

    #[test]
    fn test_published_only() {
        let page = filter_posts(&sample(), &BlogQuery::default(), 10);
        assert_eq!(page.total, 3);
        assert!(page.posts.iter().all(|p| p.published));
    }

    #[test]
    fn test_default_sort_newest_first() {
        let page = filter_posts(&sample(), &BlogQuery::default(), 10);
        assert_eq!(page.posts[0].slug, "zebra");
        assert_eq!(page.posts[2].slug, "rust-errors");
    }

    #[test]
    fn test_search_matches_title_description_tags() {
        let posts = sample();

        let by_title = filter_posts(
            &posts,
            &BlogQuery {
                q: Some("AXUM".to_string()),
                ..Default::default()
            },
            10,
        );
        assert_eq!(by_title.total, 1);
        assert_eq!(by_title.posts[0].slug, "axum-intro");

        let by_tag = filter_posts(
            &posts,
            &BlogQuery {
                q: Some("animals".to_string()),
                ..Default::default()
            },
            10,
        );
        assert_eq!(by_tag.total, 1);
        assert_eq!(by_tag.posts[0].slug, "zebra");
    }

    #[test]
    fn test_tag_filter_is_exact() {
        let page = filter_posts(
            &sample(),
            &BlogQuery {
                tag: Some("rust".to_string()),
                ..Default::default()
            },
            10,
        );
        assert_eq!(page.total, 2);
        assert!(page.posts.iter().all(|p| p.tags.contains(&"rust".into())));
    }

    #[test]
    fn test_sort_by_title_asc() {
        let page = filter_posts(
            &sample(),
            &BlogQuery {
                sort: SortField::Title,
                order: SortOrder::Asc,
                ..Default::default()
            },
            10,
        );
        assert_eq!(page.posts[0].slug, "axum-intro");
        assert_eq!(page.posts[2].slug, "zebra");
    }

    #[test]
    fn test_pagination_window() {
        let page1 = filter_posts(
            &sample(),
            &BlogQuery {
                page: Some(1),
                ..Default::default()
            },
            2,
        );
        assert_eq!(page1.posts.len(), 2);
        assert_eq!(page1.total_pages, 2);

        let page2 = filter_posts(
            &sample(),
            &BlogQuery {
                page: Some(2),
                ..Default::default()
            },
            2,
        );
        assert_eq!(page2.posts.len(), 1);
        assert_eq!(page2.posts[0].slug, "rust-errors");
    }

    #[test]
    fn test_page_clamped_to_range() {
        let high = filter_posts(
            &sample(),
            &BlogQuery {
                page: Some(99),
                ..Default::default()
            },
            2,
        );
        assert_eq!(high.page, 2);

        let zero = filter_posts(
            &sample(),
            &BlogQuery {
                page: Some(0),
                ..Default::default()
            },
            2,
        );
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn test_empty_results_still_one_page() {
        let page = filter_posts(
            &sample(),
            &BlogQuery {
                q: Some("no such thing".to_string()),
                ..Default::default()
            },
            10,
        );
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_tag_counts_published_only() {
        let tags = tag_counts(&sample());
        let rust = tags.iter().find(|t| t.name == "rust").unwrap();
        // The draft carrying "rust" does not count
        assert_eq!(rust.count, 2);
    }

    #[test]
    fn test_filter_params_omits_defaults() {
        let page = filter_posts(&sample(), &BlogQuery::default(), 10);
        assert_eq!(page.filter_params, "");

        let page = filter_posts(
            &sample(),
            &BlogQuery {
                q: Some("rust web".to_string()),
                order: SortOrder::Asc,
                ..Default::default()
            },
            10,
        );
        assert!(page.filter_params.contains("q=rust%20web"));
        assert!(page.filter_params.contains("order=asc"));
        assert!(!page.filter_params.contains("sort="));
    }

    #[test]
    fn test_query_case_kept_for_display() {
        let page = filter_posts(
            &sample(),
            &BlogQuery {
                q: Some("  Axum ".to_string()),
                ..Default::default()
            },
            10,
        );
        assert_eq!(page.total, 1);
        assert_eq!(page.query, "Axum");
        assert!(page.filter_params.contains("q=Axum"));
    }

    #[test]
    fn test_view_params_never_carry_view() {
        let page = filter_posts(
            &sample(),
            &BlogQuery {
                tag: Some("rust".to_string()),
                view: ViewMode::List,
                ..Default::default()
            },
            10,
        );
        assert!(page.filter_params.contains("view=list"));
        assert!(!page.view_params.contains("view="));
        assert!(page.view_params.contains("tag=rust"));
    }
}
