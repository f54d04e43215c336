//! Local web viewer for unsafety propagation graphs.
//!
//! Serves a single page that mirrors the browsing flow of the published
//! viewer: a grouped menu on the left, the selected function's panels on the
//! right and a callee or ADT graph around it.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)
//! - `graph` - Graph building logic
//! - `templates` - HTML/CSS/JS template rendering

mod graph;
mod handlers;
mod models;
mod templates;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use upg_core::source::{self, DataSource};
use upg_core::{Config, Explorer};

// =============================================================================
// Application State
// =============================================================================

type Session = Explorer<Box<dyn DataSource>>;

/// Shared application state for the server.
pub struct AppState {
    /// Browsing session. Write-locked only to swap in a reloaded index.
    pub explorer: RwLock<Session>,
    /// Where the data comes from, shown in the page header.
    pub source_label: String,
}

impl AppState {
    /// Current session, detached from the lock so callers can fetch
    /// without blocking a reload.
    pub async fn session(&self) -> Session {
        self.explorer.read().await.clone()
    }
}

// =============================================================================
// Server Entry Point
// =============================================================================

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Main page
        .route("/", get(handlers::index))
        // API endpoints
        .route("/api/meta", get(handlers::api_meta))
        .route("/api/navi", get(handlers::api_navi))
        .route("/api/reload", post(handlers::api_reload))
        .route("/api/item/{idx}", get(handlers::api_item))
        .route("/api/fn/{name}", get(handlers::api_function))
        .route("/api/panel/{name}", get(handlers::api_panel))
        .route("/api/graph/{name}", get(handlers::api_graph))
        .route("/api/search", get(handlers::api_search))
        // CORS for API access
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Start the viewer server.
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = source::from_config(&config.data)?;
    let source_label = source.describe();
    let explorer = Explorer::load(source).await?;

    let state = Arc::new(AppState {
        explorer: RwLock::new(explorer),
        source_label,
    });
    let app = router(state);

    let server = &config.server;
    let addr = format!("{}:{}", server.host, server.port);
    let url = format!("http://{}", addr);

    println!("Starting UPG viewer...");
    println!("Dashboard: {}", url);
    println!("Press Ctrl+C to stop\n");

    if server.open_browser {
        if let Err(e) = open::that(&url) {
            eprintln!("Could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use upg_core::{DefPath, DefPathKind, FileSource, Function, Navigation, SourceError};

    /// File source whose navigation download stalls once `slow` is set.
    struct SlowNavigation {
        files: FileSource,
        slow: Arc<AtomicBool>,
    }

    #[async_trait]
    impl DataSource for SlowNavigation {
        async fn navigation(&self) -> Result<Navigation, SourceError> {
            if self.slow.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            self.files.navigation().await
        }

        async fn function(&self, name: &str) -> Result<Function, SourceError> {
            self.files.function(name).await
        }

        fn describe(&self) -> String {
            self.files.describe()
        }
    }

    async fn write_fixture(files: &FileSource) {
        let navi = Navigation::build(vec![vec![
            DefPath::new(DefPathKind::Mod, "poc"),
            DefPath::new(DefPathKind::Fn, "f"),
        ]]);
        files.save_navigation(&navi).await.unwrap();

        let mut func = Function::empty();
        func.name = "f".to_string();
        func.src = "fn f() {}".to_string();
        files.save_function("poc::f", &func).await.unwrap();
    }

    async fn state_with(source: Box<dyn DataSource>) -> Arc<AppState> {
        let explorer = Explorer::load(source).await.unwrap();
        Arc::new(AppState {
            explorer: RwLock::new(explorer),
            source_label: "test".to_string(),
        })
    }

    async fn state() -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let files = FileSource::new(dir.path());
        write_fixture(&files).await;
        let state = state_with(Box::new(files)).await;
        (dir, state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_item_and_function_routes() {
        let (_dir, state) = state().await;
        let app = router(state);

        let (status, item) = get_json(app.clone(), "/api/item/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["qualified_name"], "poc::f");
        assert_eq!(item["item"]["icon"], "tabler:square-letter-f");
        assert_eq!(item["breadcrumb"].as_array().unwrap().len(), 2);

        let (status, func) = get_json(app.clone(), "/api/fn/poc::f").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(func["function"]["src"], "fn f() {}");

        let (status, panel) = get_json(app, "/api/panel/poc::f?panel=MIR").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(panel["panel"], "mir");
        assert_eq!(panel["label"], "MIR");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (_dir, state) = state().await;
        let app = router(state);

        let (status, body) = get_json(app.clone(), "/api/item/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, _) = get_json(app.clone(), "/api/fn/poc::missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app.clone(), "/api/graph/poc::f?view=Bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app, "/api/panel/poc::f?panel=nope").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_route() {
        let (_dir, state) = state().await;
        let (status, hits) = get_json(router(state), "/api/search?q=F").await;
        assert_eq!(status, StatusCode::OK);
        let hits = hits.as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["name"], "poc::f");
        assert_eq!(hits[0]["is_fn"], true);
    }

    #[tokio::test]
    async fn test_reload_does_not_block_readers() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileSource::new(dir.path());
        write_fixture(&files).await;
        let slow = Arc::new(AtomicBool::new(false));
        let state = state_with(Box::new(SlowNavigation {
            files,
            slow: Arc::clone(&slow),
        }))
        .await;
        let app = router(Arc::clone(&state));

        slow.store(true, Ordering::SeqCst);
        let reload = tokio::spawn(
            app.clone()
                .oneshot(Request::post("/api/reload").body(Body::empty()).unwrap()),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The reload is still downloading; reads answer from the old index.
        let (status, item) = tokio::time::timeout(
            Duration::from_millis(200),
            get_json(app.clone(), "/api/item/1"),
        )
        .await
        .expect("reader blocked by reload");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["qualified_name"], "poc::f");

        let (status, _) = tokio::time::timeout(
            Duration::from_millis(200),
            get_json(app, "/api/fn/poc::f"),
        )
        .await
        .expect("function fetch blocked by reload");
        assert_eq!(status, StatusCode::OK);

        let response = reload.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
