//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! filter + server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (decision counters, body size histogram)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line via the trace span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
