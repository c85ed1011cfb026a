//! HTTP transport for the CoffeeCloud REST API
//!
//! One client is built per configuration cycle. It owns the base URL, tenant API key
//! and request timeout; session calls additionally carry the bearer token.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Header carrying the tenant API key
pub const API_KEY_HEADER: &str = "API-Key";

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Base URL of the CoffeeCloud API (e.g. "https://cloud.example.com")
    pub base_url: String,
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
    /// Tenant API key sent with every session request
    pub api_key: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            username: String::new(),
            password: String::new(),
            api_key: String::new(),
            timeout_ms: 120_000,
        }
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HttpClientConfig {
    /// Create a new config for a single base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Set the tenant API key
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }
}

/// HTTP client bound to one CoffeeCloud tenant
pub struct CoffeeCloudHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl CoffeeCloudHttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Build full URL from the configured base URL
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the tenant key and bearer token when a session token is given
    fn authorize(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder
                .bearer_auth(token)
                .header(API_KEY_HEADER, &self.config.api_key),
            None => builder,
        }
    }

    /// Make a GET request within a session
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url), Some(token))
            .send()
            .await
            .map_err(ClientError::transport)?;

        Self::handle_response(response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        token: Option<&str>,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!("POST {} {:?}", url, query);

        let response = self
            .authorize(self.client.post(&url).query(query).json(body), token)
            .send()
            .await
            .map_err(ClientError::transport)?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(ClientError::transport)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
