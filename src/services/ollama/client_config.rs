use std::collections::HashMap;

use super::{ModelClientError, OllamaClient};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Connection settings for an Ollama server.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub extra_headers: Option<HashMap<String, String>>,
    /// Per-request timeout; none means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Read the server address from `OLLAMA_HOST`, if set.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OLLAMA_HOST").ok().map(|h| normalize_host(&h)),
            ..Default::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn extra_headers(mut self, extra_headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(extra_headers);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn build(self) -> Result<OllamaClient, ModelClientError> {
        OllamaClient::new(self)
    }
}

/// `OLLAMA_HOST` is commonly given as `host:port` without a scheme.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_without_scheme_gets_http() {
        assert_eq!(normalize_host("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_host("https://ollama.local/"), "https://ollama.local");
    }

    #[test]
    fn builder_methods_chain() {
        let config = ClientConfig::default()
            .base_url("http://gpu-box:11434")
            .timeout_secs(30);

        assert_eq!(config.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.extra_headers.is_none());
    }
}
