//! HTML page handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Datelike;
use serde::Serialize;
use tera::Context;

use crate::content::{adjacent_posts, related_posts, Project};
use crate::filters::{filter_posts, BlogQuery};
use crate::seo::{atom_feed, search_index, PageMeta};
use crate::templates::{FAVICON, STYLESHEET};

use super::AppState;

/// How many related posts a post page shows
pub(crate) const RELATED_LIMIT: usize = 3;

/// Site fields exposed to every template
#[derive(Debug, Serialize)]
struct SiteContext {
    title: String,
    description: String,
    author: String,
    language: String,
    keywords: Option<Vec<String>>,
    analytics_id: Option<String>,
    analytics_host: String,
    social: crate::config::SocialConfig,
}

impl SiteContext {
    fn new(state: &AppState) -> Self {
        let config = &state.folio.config;
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            keywords: config.keywords.clone(),
            analytics_id: config.analytics_id.clone(),
            analytics_host: config.analytics_host.clone(),
            social: config.social.clone(),
        }
    }
}

/// Base context shared by every page
fn base_context(state: &AppState, meta: &PageMeta, current_path: &str) -> Context {
    let mut context = Context::new();
    context.insert("site", &SiteContext::new(state));
    context.insert("meta", meta);
    context.insert("current_path", current_path);
    context.insert("dev", &state.dev);
    context.insert("year", &chrono::Local::now().year());
    context
}

/// Render a template or fall back to a bare 500
fn render(state: &AppState, template: &str, context: &Context) -> Response {
    match state.renderer.render(template, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render failed for {}: {:#}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    let recent: Vec<_> = content.posts.iter().filter(|p| p.published).take(3).collect();
    let featured: Vec<&Project> = content.projects.iter().filter(|p| p.featured).collect();

    let meta = PageMeta::page(
        &state.folio.config,
        "",
        &state.folio.config.description,
        "/",
    );
    let mut context = base_context(&state, &meta, "/");
    context.insert("recent_posts", &recent);
    context.insert("featured_projects", &featured);

    render(&state, "home.html", &context)
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    let meta = PageMeta::page(
        &state.folio.config,
        "About",
        &state.folio.config.description,
        "/about",
    );
    let mut context = base_context(&state, &meta, "/about");
    context.insert("content", &content.about_html);

    render(&state, "about.html", &context)
}

/// GET /blog with filter/sort/paginate query parameters
pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    let listing = filter_posts(&content.posts, &query, state.folio.config.posts_per_page);

    let meta = PageMeta::page(
        &state.folio.config,
        "Blog",
        "Blog posts, notes and writeups",
        "/blog",
    );
    let mut context = base_context(&state, &meta, "/blog");
    context.insert("listing", &listing);

    render(&state, "blog.html", &context)
}

/// GET /blog/:slug
pub async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match render_blog_post(&state, &slug) {
        Some(response) => response,
        None => not_found(State(state)).await,
    }
}

/// The post page, or None when no published post has the slug.
///
/// Synchronous so the content read guard is released before the 404
/// fallback awaits.
fn render_blog_post(state: &AppState, slug: &str) -> Option<Response> {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response())
        }
    };

    let post = content.posts.iter().find(|p| p.slug == slug && p.published)?;

    let related = related_posts(post, &content.posts, RELATED_LIMIT);
    let (prev, next) = adjacent_posts(post, &content.posts);

    let meta = PageMeta::post(&state.folio.config, post);
    let mut context = base_context(state, &meta, &post.path);
    context.insert("post", post);
    context.insert("related", &related);
    context.insert("prev", &prev);
    context.insert("next", &next);

    Some(render(state, "post.html", &context))
}

/// GET /projects
pub async fn projects(State(state): State<AppState>) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    #[derive(Serialize)]
    struct CategoryGroup<'a> {
        name: &'a str,
        projects: Vec<&'a Project>,
    }

    // Group by category, alphabetical; projects stay newest-first
    let mut groups: std::collections::BTreeMap<&str, Vec<&Project>> =
        std::collections::BTreeMap::new();
    for project in &content.projects {
        groups.entry(&project.category).or_default().push(project);
    }
    let categories: Vec<CategoryGroup> = groups
        .into_iter()
        .map(|(name, projects)| CategoryGroup { name, projects })
        .collect();

    let meta = PageMeta::page(
        &state.folio.config,
        "Projects",
        "Selected projects and experiments",
        "/projects",
    );
    let mut context = base_context(&state, &meta, "/projects");
    context.insert("categories", &categories);

    render(&state, "projects.html", &context)
}

/// GET /feed.xml
pub async fn feed(State(state): State<AppState>) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    let xml = atom_feed(&state.folio.config, &content.posts);
    (
        [(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")],
        xml,
    )
        .into_response()
}

/// GET /search.json
pub async fn search_json(State(state): State<AppState>) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "State poisoned").into_response(),
    };

    axum::Json(search_index(&content.posts)).into_response()
}

/// GET /assets/style.css
pub async fn stylesheet() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLESHEET,
    )
        .into_response()
}

/// GET /assets/favicon.svg
pub async fn favicon() -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], FAVICON).into_response()
}

/// Fallback: rendered 404 page
pub async fn not_found(State(state): State<AppState>) -> Response {
    let meta = PageMeta::page(&state.folio.config, "Not found", "Page not found", "/404");
    let context = base_context(&state, &meta, "/404");

    let mut response = render(&state, "404.html", &context);
    if response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NOT_FOUND;
    }
    response
}
