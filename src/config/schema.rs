//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the filter
//! host. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the filter host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where forwarded requests go.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Content filter rules.
    pub filter: FilterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000"). When unset the host echoes
    /// forwarded request bodies back to the client.
    pub address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest body buffered for inspection, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Content filter rules.
///
/// Accepts the camelCase keys used by existing middleware configs
/// (`filterRegexes`, `httpErrorMessage`, `pathOnly`, `bodyOnly`).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Regular expressions, tried in order.
    #[serde(alias = "filterRegexes")]
    pub patterns: Vec<String>,

    /// Body of the 403 response. Empty or unset means "Request blocked".
    #[serde(alias = "httpErrorMessage", skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,

    /// Inspect the path only.
    #[serde(alias = "pathOnly")]
    pub path_only: bool,

    /// Inspect the body only.
    #[serde(alias = "bodyOnly")]
    pub body_only: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_pass_through() {
        let cfg = FilterConfig::default();
        assert!(cfg.patterns.is_empty());
        assert_eq!(cfg.rejection_message, None);
        assert!(!cfg.path_only);
        assert!(!cfg.body_only);
    }

    #[test]
    fn test_camel_case_aliases() {
        let cfg: FilterConfig = serde_json::from_str(
            r#"{"filterRegexes":["a","b"],"httpErrorMessage":"Access Denied","pathOnly":true}"#,
        )
        .unwrap();
        assert_eq!(cfg.patterns, vec!["a", "b"]);
        assert_eq!(cfg.rejection_message.as_deref(), Some("Access Denied"));
        assert!(cfg.path_only);
        assert!(!cfg.body_only);
    }

    #[test]
    fn test_minimal_toml() {
        let cfg: HostConfig = toml::from_str(
            r#"
            [filter]
            patterns = ["secret"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.filter.patterns, vec!["secret"]);
        assert_eq!(cfg.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(cfg.limits.max_body_bytes, 2 * 1024 * 1024);
        assert!(cfg.upstream.address.is_none());
    }
}
