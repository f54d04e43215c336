use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use upg_core::{DataSource, DefPath, DefPathKind, Function, Navigation, RemoteSource, SourceError};

/// Counts hits per test server.
#[derive(Default)]
struct Hits {
    navi: AtomicUsize,
    function: AtomicUsize,
}

async fn navi_json(State(hits): State<Arc<Hits>>) -> String {
    hits.navi.fetch_add(1, Ordering::SeqCst);
    let navi = Navigation::build(vec![vec![
        DefPath::new(DefPathKind::Mod, "poc"),
        DefPath::new(DefPathKind::Fn, "f"),
    ]]);
    serde_json::to_string(&navi).unwrap()
}

async fn function_json(
    State(hits): State<Arc<Hits>>,
    Path(file): Path<String>,
) -> Result<String, StatusCode> {
    hits.function.fetch_add(1, Ordering::SeqCst);
    // Slow enough that concurrent requests overlap.
    tokio::time::sleep(Duration::from_millis(200)).await;
    match file.as_str() {
        "poc::f.json" => {
            let mut func = Function::empty();
            func.name = "f".to_string();
            func.callees = vec!["SecretRegion::from".to_string()];
            Ok(serde_json::to_string(&func).unwrap())
        }
        "broken.json" => Ok("{\"name\": 1}".to_string()),
        "boom.json" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn start_server() -> (SocketAddr, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/data/navi/navi.json", get(navi_json))
        .route("/data/function/{file}", get(function_json))
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}

fn source_for(addr: SocketAddr) -> RemoteSource {
    RemoteSource::with_client(
        Client::new(),
        &format!("http://{addr}/data/navi/navi.json"),
        &format!("http://{addr}/data/function"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_navigation() {
    let (addr, hits) = start_server().await;
    let source = source_for(addr);

    let navi = source.navigation().await.unwrap();
    assert_eq!(navi.len(), 2);
    assert!(navi.index_of("poc::f").is_some());
    assert_eq!(hits.navi.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_function() {
    let (addr, _hits) = start_server().await;
    let source = source_for(addr);

    let func = source.function("poc::f").await.unwrap();
    assert_eq!(func.name, "f");
    assert_eq!(func.callees, vec!["SecretRegion::from"]);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_download() {
    let (addr, hits) = start_server().await;
    let source = source_for(addr);

    let (a, b, c) = tokio::join!(
        source.function("poc::f"),
        source.function("poc::f"),
        source.function("poc::f"),
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert!(c.is_ok());
    assert_eq!(hits.function.load(Ordering::SeqCst), 1);
    assert_eq!(source.pending(), 0);

    // Completed downloads are not cached.
    source.function("poc::f").await.unwrap();
    assert_eq!(hits.function.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_statuses() {
    let (addr, _hits) = start_server().await;
    let source = source_for(addr);

    assert!(matches!(
        source.function("missing").await,
        Err(SourceError::NotFound(_))
    ));
    assert!(matches!(
        source.function("boom").await,
        Err(SourceError::Status { status: 500, .. })
    ));
    assert!(matches!(
        source.function("broken").await,
        Err(SourceError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_timeout() {
    let (addr, _hits) = start_server().await;
    let client = Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let source = RemoteSource::with_client(
        client,
        &format!("http://{addr}/data/navi/navi.json"),
        &format!("http://{addr}/data/function"),
    )
    .unwrap();

    assert!(matches!(
        source.function("poc::f").await,
        Err(SourceError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_cancelled_fetch_does_not_poison_later_requests() {
    let (addr, hits) = start_server().await;
    let client = Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let source = RemoteSource::with_client(
        client,
        &format!("http://{addr}/data/navi/navi.json"),
        &format!("http://{addr}/data/function"),
    )
    .unwrap();

    // The only caller gives up while the server is still sleeping.
    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), source.function("poc::f")).await;
    assert!(cancelled.is_err());

    // The download still finishes and clears its entry.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(source.pending(), 0);
    assert_eq!(hits.function.load(Ordering::SeqCst), 1);

    let func = source.function("poc::f").await.unwrap();
    assert_eq!(func.name, "f");
    assert_eq!(hits.function.load(Ordering::SeqCst), 2);
}
