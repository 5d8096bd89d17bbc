//! The site server: routing, shared state, dev-mode reload

mod api;
mod pages;

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::content::SiteContent;
use crate::security::{security_headers_middleware, SecurityHeaders};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub folio: Folio,
    /// Loaded content; the dev watcher swaps it in place
    pub content: Arc<RwLock<SiteContent>>,
    pub renderer: Arc<TemplateRenderer>,
    pub reload_tx: broadcast::Sender<()>,
    pub dev: bool,
}

impl AppState {
    /// Build state with content loaded from disk
    pub fn new(folio: &Folio, dev: bool) -> Result<Self> {
        let content = folio.load_content()?;
        let (reload_tx, _) = broadcast::channel::<()>(16);

        Ok(Self {
            folio: folio.clone(),
            content: Arc::new(RwLock::new(content)),
            renderer: Arc::new(TemplateRenderer::new()?),
            reload_tx,
            dev,
        })
    }
}

/// Build the site router with the security-header middleware attached
pub fn build_router(state: AppState) -> Router {
    let analytics_host = state
        .folio
        .config
        .analytics_id
        .as_ref()
        .map(|_| state.folio.config.analytics_host.clone());

    let security = Arc::new(SecurityHeaders::new(state.dev, analytics_host.as_deref()));

    let mut router = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/blog", get(pages::blog_index))
        .route("/blog/:slug", get(pages::blog_post))
        .route("/projects", get(pages::projects))
        .route("/feed.xml", get(pages::feed))
        .route("/search.json", get(pages::search_json))
        .route("/assets/style.css", get(pages::stylesheet))
        .route("/assets/favicon.svg", get(pages::favicon))
        .route("/api/posts/:slug", get(api::post_with_context))
        .route("/api/csp-report", post(api::csp_report));

    if state.dev {
        router = router.route("/__livereload", get(livereload_handler));
    }

    router
        .fallback(pages::not_found)
        .layer(axum::middleware::from_fn_with_state(
            security,
            security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, dev: bool) -> Result<()> {
    let state = AppState::new(folio, dev)?;

    if dev {
        let watch_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(watch_state).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let app = build_router(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if dev {
        println!("Dev mode: watching content for changes.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory and config, reload content on change
async fn watch_and_reload(state: AppState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let content_dir = state.folio.content_dir.clone();
    if content_dir.exists() {
        debouncer
            .watcher()
            .watch(&content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", content_dir);
    }

    let config_path = state.folio.base_dir.join("folio.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git") && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("Content changed, reloading");
                match state.folio.load_content() {
                    Ok(fresh) => {
                        if let Ok(mut guard) = state.content.write() {
                            *guard = fresh;
                        }
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Content reload failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Push a reload message whenever the watcher swaps content
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}
