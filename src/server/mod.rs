//! Preview server: JSON views over the post set plus static files

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Component, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{estimate_reading_time, html_escape, ContentLoader, FsSource, Post};
use crate::helpers::{decode_url, post_url, DateStyle, SiteImages};
use crate::router::Route;
use crate::store::{views, BlogStore};
use crate::Blog;

/// Server state
struct ServerState {
    config: SiteConfig,
    source_dir: PathBuf,
    store: BlogStore,
    loader: ContentLoader<FsSource>,
}

/// A post in a listing, without its body
#[derive(Debug, Serialize)]
struct PostSummary {
    slug: String,
    title: String,
    date: String,
    display_date: String,
    tags: Vec<String>,
    categories: Vec<String>,
    cover: String,
    excerpt: String,
    url: String,
    reading_time: usize,
}

/// A full post
#[derive(Debug, Serialize)]
struct PostDetail {
    #[serde(flatten)]
    post: Post,
    display_date: String,
    relative_date: String,
    resolved_cover: String,
    reading_time: usize,
}

#[derive(Debug, Serialize)]
struct ArchiveSummary {
    year: Option<i32>,
    posts: Vec<PostSummary>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

impl ServerState {
    fn summary(&self, post: &Post) -> PostSummary {
        let root = &self.config.root;
        PostSummary {
            slug: post.slug().to_string(),
            title: post.title().to_string(),
            date: post.date().to_string(),
            display_date: self
                .config
                .date_formatter()
                .format(post.date(), DateStyle::Full),
            tags: post.tags().to_vec(),
            categories: post.categories().to_vec(),
            cover: post.cover_or_default(root),
            excerpt: post.excerpt().to_string(),
            url: post_url(root, post.slug()),
            reading_time: estimate_reading_time(&post.content),
        }
    }

    fn summaries<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Vec<PostSummary> {
        posts.into_iter().map(|p| self.summary(p)).collect()
    }
}

/// Load posts and start serving
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        config: blog.config.clone(),
        source_dir: blog.source_dir.clone(),
        store: BlogStore::new(),
        loader: blog.loader(),
    });
    state.store.load_posts(&state.loader).await;

    let app = app(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    // The debouncer stops watching when dropped, keep it for the server's lifetime
    let _debouncer = if watch {
        let (tx, rx) = mpsc::channel::<DebounceEventResult>(16);
        let mut debouncer = new_debouncer(Duration::from_millis(500), move |res| {
            let _ = tx.blocking_send(res);
        })?;
        debouncer
            .watcher()
            .watch(&state.source_dir, RecursiveMode::Recursive)?;
        tracing::info!("Watching {:?} for changes", state.source_dir);
        tokio::spawn(reload_on_change(state.clone(), rx));
        Some(debouncer)
    } else {
        None
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router
fn app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/site", get(site_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/:slug", get(post_handler))
        .route("/api/tags", get(tags_handler))
        .route("/api/tags/:tag", get(tag_posts_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/categories/:name", get(category_posts_handler))
        .route("/api/archives", get(archives_handler))
        .route("/highlight.css", get(highlight_css_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reload the post set whenever content changes
async fn reload_on_change(state: Arc<ServerState>, mut rx: mpsc::Receiver<DebounceEventResult>) {
    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.contains(".DS_Store") && !path.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::debug!("File changed: {}", event.path.display());
                }
                let report = state.store.load_posts(&state.loader).await;
                tracing::info!(
                    "Reloaded {} posts ({} failed)",
                    report.loaded,
                    report.failures.len()
                );
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }
}

async fn status_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "loading": state.store.is_loading(),
        "posts": state.store.posts().len(),
    }))
}

async fn site_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let config = &state.config;
    Json(serde_json::json!({
        "title": config.title,
        "subtitle": config.subtitle,
        "description": config.description,
        "author": config.author,
        "root": config.root,
        "images": SiteImages::new(&config.root),
    }))
}

async fn posts_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let posts = state.store.posts();
    Json(state.summaries(views::filtered(&posts, params.q.trim())))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let Some(post) = state.store.post_by_slug(&slug) else {
        return not_found(&format!("No post with slug {:?}", slug));
    };

    let dates = state.config.date_formatter();
    Json(PostDetail {
        display_date: dates.format(post.date(), DateStyle::Full),
        relative_date: dates.format(post.date(), DateStyle::Relative),
        resolved_cover: post.cover_or_default(&state.config.root),
        reading_time: estimate_reading_time(&post.content),
        post,
    })
    .into_response()
}

async fn tags_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.store.all_tags())
}

async fn tag_posts_handler(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> impl IntoResponse {
    let posts = state.store.posts();
    Json(state.summaries(views::by_tag(&posts, &tag)))
}

async fn categories_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.store.all_categories())
}

async fn category_posts_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let posts = state.store.posts();
    Json(state.summaries(views::by_category(&posts, &name)))
}

async fn archives_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let archives: Vec<ArchiveSummary> = state
        .store
        .archives_by_year()
        .iter()
        .map(|archive| ArchiveSummary {
            year: archive.year,
            posts: state.summaries(&archive.posts),
        })
        .collect();
    Json(archives)
}

async fn highlight_css_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.loader.renderer().highlight_css() {
        Some(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        None => not_found("No highlight theme available"),
    }
}

/// Serve static files; anything else is a page of the single-page site
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    if static_file(&state.source_dir, &path).is_some() {
        let mut service = ServeDir::new(&state.source_dir);
        return match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        };
    }

    let route = Route::resolve(&path);
    let status = if route.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    let index = state.source_dir.join("index.html");
    let page = match tokio::fs::read_to_string(&index).await {
        Ok(html) => html,
        Err(_) => format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body></body></html>",
            html_escape(&state.config.document_title(route.title()))
        ),
    };

    (status, Html(page)).into_response()
}

/// The file under `source_dir` a request path names, if it exists.
///
/// Decoded paths that climb out of the root or are absolute never match.
fn static_file(source_dir: &std::path::Path, path: &str) -> Option<PathBuf> {
    let decoded = decode_url(path.trim_start_matches('/'));
    let relative = std::path::Path::new(&decoded);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let candidate = source_dir.join(relative);
    candidate.is_file().then_some(candidate)
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use tower::ServiceExt;

    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        crate::commands::init::init_site(dir.path()).unwrap();
        fs::write(dir.path().join("public/img/avatar.jpg"), b"jpg").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let state = Arc::new(ServerState {
            config: blog.config.clone(),
            source_dir: blog.source_dir.clone(),
            store: BlogStore::new(),
            loader: blog.loader(),
        });
        state.store.load_posts(&state.loader).await;
        (dir, app(state))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_posts_and_search() {
        let (_dir, app) = test_app().await;

        let (status, posts) = get_json(&app, "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(posts[0]["slug"], "welcome");
        assert_eq!(posts[0]["url"], "/post/welcome");

        let (_, posts) = get_json(&app, "/api/posts?q=nothing-matches-this").await;
        assert_eq!(posts.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_post_detail_and_missing_post() {
        let (_dir, app) = test_app().await;

        let (status, post) = get_json(&app, "/api/posts/welcome").await;
        assert_eq!(status, StatusCode::OK);
        assert!(post["html"].as_str().unwrap().contains("<h1>"));
        assert_eq!(post["reading_time"], 1);

        let (status, _) = get_json(&app, "/api/posts/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_aggregates() {
        let (_dir, app) = test_app().await;

        let (_, tags) = get_json(&app, "/api/tags").await;
        assert_eq!(tags[0]["count"], 1);
        let (_, archives) = get_json(&app, "/api/archives").await;
        assert_eq!(archives[0]["year"], 2026);
        let (_, status) = get_json(&app, "/api/status").await;
        assert_eq!(status["loading"], false);
        assert_eq!(status["posts"], 1);
    }

    #[test]
    fn test_static_file_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("img/a b.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        assert_eq!(
            static_file(&root, "/img/a%20b.jpg"),
            Some(root.join("img/a b.jpg"))
        );
        assert_eq!(static_file(&root, "/img"), None);
        assert_eq!(static_file(&root, "/../secret.txt"), None);
        assert_eq!(static_file(&root, "/%2E%2E/secret.txt"), None);

        let absolute = dir.path().join("secret.txt");
        let encoded = crate::helpers::encode_url(&absolute.to_string_lossy());
        assert_eq!(static_file(&root, &format!("/{}", encoded)), None);
    }

    #[tokio::test]
    async fn test_encoded_absolute_path_is_not_found() {
        let (_dir, app) = test_app().await;
        let (status, _) = get(&app, "/%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files_and_pages() {
        let (_dir, app) = test_app().await;

        let (status, body) = get(&app, "/img/avatar.jpg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"jpg");

        let (status, body) = get(&app, "/archives").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("Archives | Leguan"));

        let (status, _) = get(&app, "/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(&app, "/highlight.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_empty());
    }
}
