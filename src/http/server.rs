//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (request ID, tracing, timeout, content filter)
//! - Bind server to listener
//! - Forward accepted requests to the upstream, or echo them back

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HostConfig;
use crate::filter::{ContentFilterLayer, SharedFilter};
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    /// `None` means echo mode.
    pub upstream: Option<Authority>,
}

/// HTTP server hosting the content filter.
pub struct HttpServer {
    router: Router,
    config: HostConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and live filter.
    pub fn new(config: HostConfig, filter: SharedFilter) -> Result<Self, InvalidUri> {
        let upstream = config
            .upstream
            .address
            .as_deref()
            .map(str::parse::<Authority>)
            .transpose()?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { client, upstream };

        let router = Self::build_router(&config, state, filter);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: request ID, trace span, timeout, content filter.
    #[allow(deprecated)]
    fn build_router(config: &HostConfig, state: AppState, filter: SharedFilter) -> Router {
        Router::new()
            .fallback(forward_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %req.request_id(),
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(ContentFilterLayer::new(filter)),
            )
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = ?self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Handler reached only by requests the filter forwarded.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(authority) = state.upstream else {
        return Response::new(request.into_body());
    };

    let request_id = request.request_id().to_string();
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use tower::ServiceExt;

    use crate::config::FilterConfig;
    use crate::filter::ContentFilter;

    fn server(patterns: &[&str]) -> HttpServer {
        let filter = ContentFilter::new(&FilterConfig {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        })
        .unwrap();
        HttpServer::new(HostConfig::default(), SharedFilter::new(filter)).unwrap()
    }

    #[tokio::test]
    async fn test_echo_mode_returns_body_and_request_id() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/submit")
            .body(Body::from("hello"))
            .unwrap();
        let response = server(&["forbidden"]).router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_blocked_request_keeps_client_request_id() {
        let req = Request::builder()
            .uri("/forbidden/area")
            .header("x-request-id", "client-id-1")
            .body(Body::empty())
            .unwrap();
        let response = server(&["forbidden"]).router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()["x-request-id"], "client-id-1");
    }

    #[test]
    fn test_invalid_upstream_rejected() {
        let mut config = HostConfig::default();
        config.upstream.address = Some("bad upstream".into());
        let filter = SharedFilter::new(ContentFilter::new(&FilterConfig::default()).unwrap());
        assert!(HttpServer::new(config, filter).is_err());
    }
}
