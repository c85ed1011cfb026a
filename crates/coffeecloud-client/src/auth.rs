//! Bearer token session for one collection cycle
//!
//! The token has no expiry tracking; a new session is opened for every cycle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::CoffeeCloudHttpClient;

pub const LOGIN_PATH: &str = "/rest/login";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    id_token: Option<String>,
}

/// Authenticated session holding the bearer token
#[derive(Clone)]
pub struct AuthSession {
    token: String,
}

impl AuthSession {
    /// Exchange the configured credentials for a bearer token
    pub async fn login(http: &CoffeeCloudHttpClient) -> Result<Self> {
        let config = http.config();
        debug!("Authenticating {} against {}", config.username, config.base_url);

        let response: LoginResponse = http
            .post_json(
                LOGIN_PATH,
                &[],
                &LoginRequest {
                    username: &config.username,
                    password: &config.password,
                    remember_me: false,
                },
                None,
            )
            .await
            .map_err(|e| ClientError::AuthFailed(e.to_string()))?;

        match response.id_token {
            Some(token) if !token.is_empty() => Ok(Self { token }),
            _ => Err(ClientError::AuthFailed("no token received".to_string())),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").finish_non_exhaustive()
    }
}
