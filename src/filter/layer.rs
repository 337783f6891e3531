//! Tower middleware wrapping a downstream service with the content filter.

use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use super::decision::{rejection_response, Decision};
use super::shared::SharedFilter;
use crate::observability::metrics;

/// Layer that applies a [`SharedFilter`] to every request.
#[derive(Debug, Clone)]
pub struct ContentFilterLayer {
    filter: SharedFilter,
}

impl ContentFilterLayer {
    pub fn new(filter: impl Into<SharedFilter>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

impl<S> Layer<S> for ContentFilterLayer {
    type Service = ContentFilterService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ContentFilterService {
            inner,
            filter: self.filter.clone(),
        }
    }
}

/// Service produced by [`ContentFilterLayer`].
///
/// Calls `inner` exactly once when the request is forwarded and never when it
/// is rejected or its body cannot be read.
#[derive(Debug, Clone)]
pub struct ContentFilterService<S> {
    inner: S,
    filter: SharedFilter,
}

impl<S> Service<Request<Body>> for ContentFilterService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Keep the instance that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let filter = self.filter.load();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();

            match filter.evaluate(req).await {
                Ok(Decision::Forward(req)) => {
                    tracing::debug!(method = %method, path = %path, "Request forwarded");
                    metrics::record_forward();
                    inner.call(req).await
                }
                Ok(Decision::Reject(rejection)) => {
                    tracing::warn!(
                        method = %method,
                        path = %path,
                        matched = %rejection.target,
                        pattern_index = rejection.pattern_index,
                        pattern = %rejection.pattern,
                        "Request blocked"
                    );
                    metrics::record_reject(rejection.target);
                    Ok(rejection_response(filter.rejection_message()))
                }
                Err(e) => {
                    tracing::error!(method = %method, path = %path, error = %e, "Body read failed");
                    metrics::record_body_error();
                    Ok(e.into_response())
                }
            }
        })
    }
}
