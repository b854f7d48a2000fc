//! Development server with live reload
//!
//! Pages are rendered per request from the [`ContentCache`], so edits to the
//! content directory show up on the next request without a rebuild.

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cache::ContentCache;
use crate::content::ContentStore;
use crate::generator::Generator;
use crate::helpers;
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
pub struct ServerState {
    site: Site,
    cache: ContentCache,
    generator: Generator,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    pub fn new(site: &Site, live_reload: bool) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Ok(Self {
            site: site.clone(),
            cache: ContentCache::new(site),
            generator: Generator::new(site)?,
            reload_tx,
            live_reload,
        })
    }

    /// Render a page from the current content
    ///
    /// Loading and rendering run on the blocking pool. `render` returns
    /// `None` when the page does not exist.
    async fn respond<F>(self: Arc<Self>, pathname: String, render: F) -> Response
    where
        F: FnOnce(&Generator, &ContentStore) -> Result<Option<String>> + Send + 'static,
    {
        let state = Arc::clone(&self);
        let rendered = tokio::task::spawn_blocking(move || {
            let store = state.cache.get().context("Failed to load content")?;
            render(&state.generator, &store)
        })
        .await;

        match rendered {
            Ok(Ok(Some(html))) => self.html(StatusCode::OK, html),
            Ok(Ok(None)) => self.not_found(&pathname),
            Ok(Err(e)) => {
                tracing::error!("Failed to render {}: {:#}", pathname, e);
                server_error()
            }
            Err(e) => {
                tracing::error!("Render task for {} failed: {}", pathname, e);
                server_error()
            }
        }
    }

    fn not_found(&self, pathname: &str) -> Response {
        match self.generator.render_not_found(pathname) {
            Ok(html) => self.html(StatusCode::NOT_FOUND, html),
            Err(e) => {
                tracing::error!("Failed to render not-found page: {}", e);
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
        }
    }

    fn html(&self, status: StatusCode, html: String) -> Response {
        let html = if self.live_reload {
            inject_live_reload(&html)
        } else {
            html
        };
        (status, Html(html)).into_response()
    }
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// Build the router for a server state
pub fn router(state: Arc<ServerState>) -> Router {
    let static_dir = state.site.static_dir.clone();

    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/", get(blog_index_handler))
        .route("/blog/:slug", get(post_handler))
        .nest_service("/static", ServeDir::new(static_dir));

    if state.live_reload {
        app = app.route("/__livereload", get(livereload_handler));
    }

    app.fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(site, watch)?);

    // Load once up front so broken content is reported before serving
    let warm = Arc::clone(&state);
    if let Err(e) = tokio::task::spawn_blocking(move || warm.cache.get()).await? {
        tracing::error!("Failed to load content: {}", e);
    }

    let app = router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the site for changes, drop stale content and notify browsers
fn watch_and_reload(state: &ServerState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to coalesce editor save bursts
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&state.site.content_dir, &state.site.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = state.site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                if relevant.iter().any(|e| e.path == config_path) {
                    tracing::warn!("Configuration changed; restart the server to apply it");
                }

                state.cache.invalidate();
                // No receivers just means no browser is open
                let _ = state.reload_tx.send(());
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

/// Skip VCS metadata and editor backup files
fn is_relevant(path: &std::path::Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    state
        .respond("/".to_string(), |generator, store| {
            generator.render_home(store).map(Some)
        })
        .await
}

async fn blog_index_handler(State(state): State<Arc<ServerState>>) -> Response {
    state
        .respond("/blog".to_string(), |generator, store| {
            generator.render_blog_index(store).map(Some)
        })
        .await
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let pathname = format!("/blog/{}", helpers::encode_segment(&slug));
    state
        .respond(pathname, move |generator, store| match store.resolve(&slug) {
            Ok(post) => generator.render_post(store, post).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::debug!("No post with slug {:?}", slug);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        })
        .await
}

async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    state.not_found(uri.path())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
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

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write_post(dir: &std::path::Path, name: &str, title: &str, published: &str) {
        let blog = dir.join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join(name),
            format!(
                "---\ntitle: {}\ndescription: d\npublished: {}\n---\nbody\n",
                title, published
            ),
        )
        .unwrap();
    }

    fn app(dir: &std::path::Path, live_reload: bool) -> Router {
        let site = Site::new(dir).unwrap();
        router(Arc::new(ServerState::new(&site, live_reload).unwrap()))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_known_post() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.mdx", "Post A", "01 01 2024 9 AM");

        let (status, body) = get(app(tmp.path(), false), "/blog/a").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Post A"));
        assert!(!body.contains("__livereload"));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.mdx", "Post A", "01 01 2024 9 AM");

        let (status, body) = get(app(tmp.path(), false), "/blog/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found :("));
    }

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let (status, body) = get(app(tmp.path(), false), "/about/me").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Back to homepage"));
    }

    #[tokio::test]
    async fn test_index_pages() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.mdx", "Post A", "01 01 2024 9 AM");

        let (status, body) = get(app(tmp.path(), false), "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/blog/a""#));

        let (status, _) = get(app(tmp.path(), false), "/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_load_error_is_server_error() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.mdx", "Post A", "someday");

        let (status, _) = get(app(tmp.path(), false), "/blog").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_live_reload_injected() {
        let tmp = TempDir::new().unwrap();
        let (_, body) = get(app(tmp.path(), true), "/").await;
        assert!(body.contains("/__livereload"));
        assert!(body.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_static_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("static")).unwrap();
        fs::write(tmp.path().join("static/site.txt"), "hello").unwrap();

        let (status, body) = get(app(tmp.path(), false), "/static/site.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_render_panic_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(ServerState::new(&Site::new(tmp.path()).unwrap(), false).unwrap());

        let response = state
            .respond("/boom".to_string(), |_, _| -> Result<Option<String>> {
                panic!("render failed")
            })
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_respond_missing_page() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(ServerState::new(&Site::new(tmp.path()).unwrap(), false).unwrap());

        let response = state.respond("/gone".to_string(), |_, _| Ok(None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(std::path::Path::new("content/blog/a.md")));
        assert!(!is_relevant(std::path::Path::new("content/.git/index")));
        assert!(!is_relevant(std::path::Path::new("content/blog/a.md~")));
    }
}
