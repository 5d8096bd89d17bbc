//! JSON API handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::content::{adjacent_posts, related_posts, Post};
use crate::security::CspReportBody;

use super::pages::RELATED_LIMIT;
use super::AppState;

/// Listing-sized view of a post for related/adjacent entries
#[derive(Debug, Serialize)]
struct PostSummary {
    slug: String,
    title: String,
    description: String,
    date: String,
    tags: Vec<String>,
    path: String,
    reading_time: usize,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.date.to_rfc3339(),
            tags: post.tags.clone(),
            path: post.path.clone(),
            reading_time: post.reading_time,
        }
    }
}

#[derive(Debug, Serialize)]
struct PostResponse {
    post: Post,
    related: Vec<PostSummary>,
    prev: Option<PostSummary>,
    next: Option<PostSummary>,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /api/posts/:slug — a post plus its related and adjacent posts
pub async fn post_with_context(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let content = match state.content.read() {
        Ok(c) => c,
        Err(_) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, "state poisoned"),
    };

    let Some(post) = content.posts.iter().find(|p| p.slug == slug && p.published) else {
        return api_error(StatusCode::NOT_FOUND, "post not found");
    };

    let related = related_posts(post, &content.posts, RELATED_LIMIT)
        .into_iter()
        .map(PostSummary::from)
        .collect();
    let (prev, next) = adjacent_posts(post, &content.posts);

    Json(PostResponse {
        post: post.clone(),
        related,
        prev: prev.map(PostSummary::from),
        next: next.map(PostSummary::from),
    })
    .into_response()
}

/// POST /api/csp-report — accept a browser CSP violation report
///
/// Browsers send Content-Type application/csp-report, so the body is read
/// raw and parsed by hand; anything that is not the expected envelope is a
/// 400. A valid report is logged and acknowledged with 204.
pub async fn csp_report(body: Bytes) -> Response {
    match serde_json::from_slice::<CspReportBody>(&body) {
        Ok(report) => {
            tracing::warn!("CSP violation: {}", report.csp_report.summary());
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::debug!("Rejected malformed CSP report: {}", e);
            api_error(StatusCode::BAD_REQUEST, "malformed CSP report")
        }
    }
}
