use serde::{Deserialize, Serialize};

/// `modules.api_ingress` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiIngressConfig {
    /// `host:port`; empty means `server.host:server.port`.
    pub bind_addr: String,
    /// Serve `/openapi.json` and `/docs`.
    pub enable_docs: bool,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: String::new(),
            enable_docs: true,
            cors_enabled: false,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ApiIngressConfig {
    /// Fill an empty `bind_addr` (normally from `server.host:server.port`).
    pub fn with_default_bind(mut self, addr: &str) -> Self {
        if self.bind_addr.trim().is_empty() {
            self.bind_addr = addr.to_string();
        }
        self
    }
}
