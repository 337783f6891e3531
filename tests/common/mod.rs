//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{body::Bytes, extract::State, Router};
use request_filter::config::{FilterConfig, HostConfig};
use request_filter::filter::{ContentFilter, SharedFilter};
use request_filter::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Start an upstream that echoes request bodies and counts hits.
pub async fn start_echo_backend() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .fallback(|State(hits): State<Arc<AtomicUsize>>, body: Bytes| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            body
        })
        .with_state(hits.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, hits)
}

/// Start the filter host in front of `upstream`.
///
/// The returned [`Shutdown`] must be kept alive for the server to keep running.
#[allow(dead_code)]
pub async fn start_filter_host(
    filter: FilterConfig,
    upstream: Option<SocketAddr>,
) -> (SocketAddr, SharedFilter, Shutdown) {
    let mut config = HostConfig::default();
    config.upstream.address = upstream.map(|a| a.to_string());
    config.filter = filter;

    let shared = SharedFilter::new(ContentFilter::new(&config.filter).unwrap());
    let server = HttpServer::new(config, shared.clone()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shared, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn patterns(patterns: &[&str]) -> FilterConfig {
    FilterConfig {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}
