//! Request content filtering.
//!
//! # Data Flow
//! ```text
//! FilterConfig
//!     → content.rs (validate modes, compile patterns via pattern.rs)
//!     → ContentFilter (immutable)
//!     → shared.rs (Arc snapshot, swapped on reload)
//!     → layer.rs (tower Service wrapping the downstream handler)
//!
//! Per request:
//!     evaluate → Forward(req) → inner service
//!              → Reject       → 403 + message
//!              → BodyReadError → 500
//! ```
//!
//! # Design Decisions
//! - Fail fast: the first bad pattern aborts construction
//! - Patterns are tried in configuration order, first match wins
//! - Only POST, PUT and PATCH bodies are inspected
//! - Inspected bodies are buffered and handed downstream as a new `Body`

pub mod content;
pub mod decision;
pub mod error;
pub mod layer;
pub mod pattern;
pub mod shared;

pub use content::{ContentFilter, Mode};
pub use decision::{Decision, Rejection, Target, DEFAULT_REJECTION_MESSAGE};
pub use error::{BodyReadError, ConfigError};
pub use layer::{ContentFilterLayer, ContentFilterService};
pub use shared::SharedFilter;
