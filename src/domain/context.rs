//! Request Context
//!
//! Metadata about the request that triggered a command, stored alongside
//! each event and attached to log lines.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Context for a command, used for event metadata and tracing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,

    /// Client IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,

    /// Free-form label of who or what issued the command (e.g. "dashboard", "import")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let ip: IpAddr = "10.0.0.7".parse().unwrap();

        let context = RequestContext::new()
            .with_correlation_id(correlation_id)
            .with_client_ip(ip)
            .with_source("dashboard");

        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.client_ip, Some(ip));
        assert_eq!(context.source.as_deref(), Some("dashboard"));
    }

    #[test]
    fn test_ensure_correlation_id_is_stable() {
        let mut context = RequestContext::new();
        let id = context.ensure_correlation_id();
        assert_eq!(context.ensure_correlation_id(), id);
    }

    #[test]
    fn test_empty_context_serializes_to_empty_object() {
        let json = serde_json::to_string(&RequestContext::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
