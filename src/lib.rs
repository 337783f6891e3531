//! Regex-based HTTP request filtering middleware.
//!
//! [`ContentFilterLayer`] wraps any `tower::Service<Request<Body>>` and
//! rejects requests whose path, or POST/PUT/PATCH body, matches one of the
//! configured patterns.
//!
//! ```no_run
//! use axum::{routing::post, Router};
//! use request_filter::{ContentFilter, ContentFilterLayer, FilterConfig};
//!
//! # fn build() -> Result<Router, request_filter::filter::ConfigError> {
//! let filter = ContentFilter::new(&FilterConfig {
//!     patterns: vec!["(?i)drop\\s+table".into()],
//!     ..Default::default()
//! })?;
//!
//! let app: Router = Router::new()
//!     .route("/submit", post(|body: String| async move { body }))
//!     .layer(ContentFilterLayer::new(filter));
//! # Ok(app)
//! # }
//! ```

pub mod config;
pub mod filter;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{FilterConfig, HostConfig};
pub use filter::{ContentFilter, ContentFilterLayer, Decision};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
