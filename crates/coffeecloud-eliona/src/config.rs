// Configuration for ElionaClient

/// Configuration for the Eliona HTTP client
#[derive(Clone)]
pub struct ElionaClientConfig {
    /// API v2 endpoint (e.g. "http://api-v2:3000/v2")
    pub endpoint: String,
    /// API token sent as `X-API-Key`
    pub api_token: String,
    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
}

impl Default for ElionaClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://api-v2:3000/v2".to_string(),
            api_token: String::new(),
            timeout_ms: 30000,
        }
    }
}

impl ElionaClientConfig {
    pub fn new(endpoint: &str, api_token: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_token: api_token.to_string(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for ElionaClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElionaClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}
