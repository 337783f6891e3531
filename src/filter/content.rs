//! The compiled content filter.
//!
//! # Algorithm
//! ```text
//! patterns empty?            → Forward (body untouched)
//! path check (unless body-only)
//!     decoded path, each pattern in order → first hit = Reject(Path)
//! body check (unless path-only, only POST/PUT/PATCH)
//!     buffer whole body → read failure = BodyReadError
//!     each pattern in order → first hit = Reject(Body)
//!     re-attach Body::from(bytes)
//! → Forward
//! ```

use std::borrow::Cow;

use axum::{
    body::Body,
    http::{Method, Request, Uri},
};
use percent_encoding::percent_decode_str;

use super::decision::{Decision, Rejection, Target, DEFAULT_REJECTION_MESSAGE};
use super::error::{BodyReadError, ConfigError};
use super::pattern::PatternSet;
use crate::config::FilterConfig;

/// Which parts of a request are inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    PathAndBody,
    PathOnly,
    BodyOnly,
}

impl Mode {
    /// Resolve the two config flags, rejecting the invalid combination.
    pub fn from_flags(path_only: bool, body_only: bool) -> Result<Self, ConfigError> {
        match (path_only, body_only) {
            (true, true) => Err(ConfigError::ConflictingModes),
            (true, false) => Ok(Mode::PathOnly),
            (false, true) => Ok(Mode::BodyOnly),
            (false, false) => Ok(Mode::PathAndBody),
        }
    }

    fn checks_path(self) -> bool {
        self != Mode::BodyOnly
    }

    fn checks_body(self) -> bool {
        self != Mode::PathOnly
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::PathAndBody => "path_and_body",
            Mode::PathOnly => "path_only",
            Mode::BodyOnly => "body_only",
        }
    }
}

/// Validated, immutable filter. Safe to share across requests via `Arc`.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    patterns: PatternSet,
    rejection_message: String,
    mode: Mode,
    max_body_bytes: usize,
}

impl ContentFilter {
    /// Compile a filter from its configuration.
    ///
    /// Fails without producing a filter if the mode flags conflict or any
    /// pattern is invalid.
    pub fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        let mode = Mode::from_flags(config.path_only, config.body_only)?;
        let patterns = PatternSet::compile(config.patterns.as_slice())?;

        let rejection_message = config
            .rejection_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_REJECTION_MESSAGE)
            .to_string();

        tracing::info!(
            patterns = patterns.len(),
            mode = mode.as_str(),
            "Content filter compiled"
        );

        Ok(Self {
            patterns,
            rejection_message,
            mode,
            max_body_bytes: usize::MAX,
        })
    }

    /// Cap the number of body bytes buffered for inspection. Larger bodies
    /// fail with [`BodyReadError`].
    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn rejection_message(&self) -> &str {
        &self.rejection_message
    }

    /// Decide whether `req` may continue down the chain.
    ///
    /// On [`Decision::Forward`] the returned request carries a body
    /// byte-identical to the one received.
    pub async fn evaluate(&self, req: Request<Body>) -> Result<Decision, BodyReadError> {
        if self.patterns.is_empty() {
            return Ok(Decision::Forward(req));
        }

        if self.mode.checks_path() {
            let path = decoded_path(req.uri());
            if let Some(index) = self.patterns.first_match(&path) {
                return Ok(Decision::Reject(self.rejection(Target::Path, index)));
            }
        }

        if !self.mode.checks_body() || !inspects_body(req.method()) {
            return Ok(Decision::Forward(req));
        }

        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, self.max_body_bytes).await?;
        metrics::histogram!("request_filter_inspected_body_bytes").record(bytes.len() as f64);

        if let Some(index) = self.patterns.first_match(&bytes) {
            return Ok(Decision::Reject(self.rejection(Target::Body, index)));
        }

        Ok(Decision::Forward(Request::from_parts(parts, Body::from(bytes))))
    }

    fn rejection(&self, target: Target, pattern_index: usize) -> Rejection {
        Rejection {
            target,
            pattern_index,
            pattern: self
                .patterns
                .source(pattern_index)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

fn inspects_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Percent-decoded path, without scheme, authority or query.
fn decoded_path(uri: &Uri) -> Cow<'_, [u8]> {
    percent_decode_str(uri.path()).into()
}
