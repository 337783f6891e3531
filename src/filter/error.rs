//! Error types for filter construction and request inspection.

use thiserror::Error;

/// Construction-time failure. No filter exists when this is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A pattern failed to compile.
    #[error("invalid filter regex #{index} '{pattern}': {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `path_only` and `body_only` were both set.
    #[error("only one of pathOnly and bodyOnly can be set")]
    ConflictingModes,
}

/// The request body could not be fully read.
///
/// Covers connection resets, host cancellation and bodies over the
/// configured size limit.
#[derive(Debug, Error)]
#[error("failed to read request body: {0}")]
pub struct BodyReadError(#[from] pub axum::Error);
