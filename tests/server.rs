use std::fs;

use folio::server::{build_router, AppState};
use folio::Folio;
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn fixture_site() -> TempDir {
    let dir = tempdir().expect("tempdir");
    let posts = dir.path().join("content/posts");
    fs::create_dir_all(&posts).expect("posts dir");

    fs::write(
        dir.path().join("folio.yml"),
        "title: Test Site\nauthor: Tester\nurl: https://test.example\nposts_per_page: 2\n",
    )
    .expect("config");

    fs::write(
        posts.join("first-post.md"),
        "---\ntitle: First Post\ndescription: The first one\ndate: 2024-01-01\ntags: [rust, web]\n---\nHello **world** from the first post.\n",
    )
    .expect("post one");
    fs::write(
        posts.join("second-post.md"),
        "---\ntitle: Second Post\ndescription: Another one\ndate: 2024-02-01\ntags: [rust]\n---\nMore words here.\n",
    )
    .expect("post two");
    fs::write(
        posts.join("zebra-thoughts.md"),
        "---\ntitle: Zebra Thoughts\ndescription: Animals\ndate: 2024-03-01\ntags: [animals]\n---\nStripes.\n",
    )
    .expect("post three");
    fs::write(
        posts.join("hidden.md"),
        "---\ntitle: Hidden\ndate: 2024-04-01\ndraft: true\n---\nNot yet.\n",
    )
    .expect("draft");

    fs::write(
        dir.path().join("content/projects.yml"),
        "- id: demo\n  title: Demo Project\n  description: A demo\n  date: 2024-01-15\n  technologies: [rust]\n  category: tools\n  status: completed\n  featured: true\n",
    )
    .expect("projects");

    fs::write(
        dir.path().join("content/about.md"),
        "---\ntitle: About\n---\nI write software.\n",
    )
    .expect("about");

    dir
}

async fn spawn_site(dev: bool) -> (TempDir, std::net::SocketAddr) {
    let dir = fixture_site();
    let folio = Folio::new(dir.path()).expect("folio");
    let state = AppState::new(&folio, dev).expect("state");
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    (dir, addr)
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(body) = body {
        req.push_str("Content-Type: application/csp-report\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_lowercase(), body.to_string())
}

async fn get(addr: std::net::SocketAddr, path: &str) -> (u16, String, String) {
    send_raw(addr, "GET", path, None).await
}

#[tokio::test]
async fn html_pages_respond() {
    let (_dir, addr) = spawn_site(false).await;

    for path in ["/", "/about", "/blog", "/projects", "/blog/first-post"] {
        let (status, _, body) = get(addr, path).await;
        assert_eq!(status, 200, "status for {path}");
        assert!(body.contains("<!DOCTYPE html>"), "html for {path}");
    }

    let (_, _, body) = get(addr, "/blog/first-post").await;
    assert!(body.contains("First Post"));
    assert!(body.contains("<strong>world</strong>"));

    let (_, _, body) = get(addr, "/projects").await;
    assert!(body.contains("Demo Project"));
    assert!(body.contains("status-completed"));
    assert!(body.contains(">Completed</span>"));
}

#[tokio::test]
async fn security_headers_on_every_route() {
    let (_dir, addr) = spawn_site(false).await;

    for path in ["/", "/blog", "/feed.xml", "/api/posts/first-post", "/nope"] {
        let (_, head, _) = get(addr, path).await;
        assert!(head.contains("content-security-policy:"), "csp on {path}");
        assert!(head.contains("x-frame-options: deny"), "xfo on {path}");
        assert!(
            head.contains("x-content-type-options: nosniff"),
            "nosniff on {path}"
        );
        assert!(head.contains("strict-transport-security:"), "hsts on {path}");
        assert!(head.contains("referrer-policy:"), "referrer on {path}");
        assert!(head.contains("permissions-policy:"), "permissions on {path}");
    }

    let (_, head, _) = get(addr, "/").await;
    assert!(head.contains("default-src 'self'"));
    assert!(head.contains("report-uri /api/csp-report"));
    assert!(!head.contains("'unsafe-eval'"));
}

#[tokio::test]
async fn dev_mode_relaxes_csp() {
    let (_dir, addr) = spawn_site(true).await;
    let (_, head, _) = get(addr, "/").await;
    assert!(head.contains("'unsafe-eval'"));
    assert!(head.contains("ws:"));
}

#[tokio::test]
async fn missing_post_renders_404_page() {
    let (_dir, addr) = spawn_site(false).await;

    let (status, _, body) = get(addr, "/blog/no-such-post").await;
    assert_eq!(status, 404);
    assert!(body.contains("404"));

    // Drafts are not routable
    let (status, _, _) = get(addr, "/blog/hidden").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn blog_listing_filters_and_paginates() {
    let (_dir, addr) = spawn_site(false).await;

    // Page 1 of 2 (3 published posts, 2 per page), newest first
    let (status, _, body) = get(addr, "/blog").await;
    assert_eq!(status, 200);
    assert!(body.contains("Zebra Thoughts"));
    assert!(body.contains("Second Post"));
    assert!(!body.contains("First Post"));
    assert!(!body.contains("Hidden"));

    let (_, _, body) = get(addr, "/blog?page=2").await;
    assert!(body.contains("First Post"));
    assert!(!body.contains("Zebra Thoughts"));

    // Out-of-range page clamps instead of erroring
    let (status, _, body) = get(addr, "/blog?page=99").await;
    assert_eq!(status, 200);
    assert!(body.contains("First Post"));

    // Search and tag filters
    let (_, _, body) = get(addr, "/blog?q=zebra").await;
    assert!(body.contains("Zebra Thoughts"));
    assert!(!body.contains("Second Post"));

    let (_, _, body) = get(addr, "/blog?tag=animals").await;
    assert!(body.contains("Zebra Thoughts"));
    assert!(!body.contains("Second Post"));

    // Unknown sort values fall back to defaults
    let (status, _, _) = get(addr, "/blog?sort=bogus&order=sideways").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn search_query_reflected_escaped() {
    let (_dir, addr) = spawn_site(false).await;

    // q = "><script>alert(1)</script>
    let (status, _, body) = get(
        addr,
        "/blog?q=%22%3E%3Cscript%3Ealert(1)%3C%2Fscript%3E",
    )
    .await;
    assert_eq!(status, 200);
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;alert(1)&lt;"));

    let (status, _, body) = get(addr, "/blog?tag=%3Cimg%20src%3Dx%20onerror%3Dalert(1)%3E").await;
    assert_eq!(status, 200);
    assert!(!body.contains("<img src=x onerror"));

    // Post markdown still renders as HTML
    let (_, _, body) = get(addr, "/blog/first-post").await;
    assert!(body.contains("<strong>world</strong>"));
}

#[tokio::test]
async fn search_box_echoes_typed_query() {
    let (_dir, addr) = spawn_site(false).await;
    let (status, _, body) = get(addr, "/blog?q=Zebra").await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"value="Zebra""#));
    assert!(body.contains("Zebra Thoughts"));
}

#[tokio::test]
async fn post_api_returns_related_and_adjacent() {
    let (_dir, addr) = spawn_site(false).await;

    let (status, head, body) = get(addr, "/api/posts/second-post").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: application/json"));

    let json: Value = serde_json::from_str(&body).expect("post json");
    assert_eq!(json["post"]["slug"], "second-post");
    assert_eq!(json["post"]["reading_time"], 1);

    // first-post shares the rust tag
    let related = json["related"].as_array().expect("related array");
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["slug"], "first-post");

    // Newest-first list: prev is older, next is newer
    assert_eq!(json["prev"]["slug"], "first-post");
    assert_eq!(json["next"]["slug"], "zebra-thoughts");

    let (status, _, body) = get(addr, "/api/posts/missing").await;
    assert_eq!(status, 404);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "post not found");
}

#[tokio::test]
async fn csp_report_endpoint_validates_shape() {
    let (_dir, addr) = spawn_site(false).await;

    let valid = r#"{"csp-report":{"document-uri":"https://test.example/","blocked-uri":"https://evil.example/x.js","effective-directive":"script-src"}}"#;
    let (status, _, _) = send_raw(addr, "POST", "/api/csp-report", Some(valid)).await;
    assert_eq!(status, 204);

    let (status, _, _) = send_raw(addr, "POST", "/api/csp-report", Some("not json")).await;
    assert_eq!(status, 400);

    let (status, _, _) =
        send_raw(addr, "POST", "/api/csp-report", Some(r#"{"wrong":{}}"#)).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn feed_and_search_index() {
    let (_dir, addr) = spawn_site(false).await;

    let (status, head, body) = get(addr, "/feed.xml").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: application/atom+xml"));
    assert!(body.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
    assert!(body.contains("https://test.example/blog/first-post"));
    assert!(!body.contains("Hidden"));

    let (status, _, body) = get(addr, "/search.json").await;
    assert_eq!(status, 200);
    // Body may be chunk-encoded; find the JSON array inside
    let start = body.find('[').expect("json start");
    let end = body.rfind(']').expect("json end");
    let json: Value = serde_json::from_str(&body[start..=end]).expect("search json");
    let entries = json.as_array().expect("entries");
    assert_eq!(entries.len(), 3);
}

#[tokio::test]
async fn static_assets_served() {
    let (_dir, addr) = spawn_site(false).await;

    let (status, head, body) = get(addr, "/assets/style.css").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/css"));
    assert!(body.contains("--bg"));

    let (status, head, body) = get(addr, "/assets/favicon.svg").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: image/svg+xml"));
    assert!(body.contains("<svg"));
}
