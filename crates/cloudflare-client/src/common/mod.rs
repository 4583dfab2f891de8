//! Common utilities for the Cloudflare API client
//!
//! Provides the authenticated HTTP wrapper and the v4 envelope handling
//! shared by every endpoint.

use crate::error::CloudflareError;
use crate::models::{ApiResponse, ResponseInfo};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// HTTP client wrapper with bearer-token authentication
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Make a GET request and unwrap the v4 envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CloudflareError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(CloudflareError::Http)?;

        Self::unwrap_envelope("GET", path, response).await
    }

    /// Make a PUT request and unwrap the v4 envelope
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CloudflareError> {
        let url = self.build_url(path);
        debug!(
            "PUT {} with body: {}",
            url,
            serde_json::to_string(body).unwrap_or_default()
        );

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(CloudflareError::Http)?;

        Self::unwrap_envelope("PUT", path, response).await
    }

    /// Map HTTP status and envelope `success` flag onto `CloudflareError`,
    /// returning the `result` payload on success.
    async fn unwrap_envelope<T: DeserializeOwned>(
        method: &str,
        path: &str,
        response: Response,
    ) -> Result<T, CloudflareError> {
        let status = response.status();
        let body = response.text().await.map_err(CloudflareError::Http)?;

        // Error responses usually still carry an envelope; fall back to the raw body.
        let envelope: Option<ApiResponse<T>> = serde_json::from_str(&body).ok();
        let detail = match &envelope {
            Some(env) if !env.errors.is_empty() => ResponseInfo::join(&env.errors),
            _ => body.chars().take(500).collect::<String>(),
        };

        match status {
            StatusCode::NOT_FOUND => {
                return Err(CloudflareError::NotFound(format!(
                    "{} {}: {}",
                    method, path, detail
                )));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CloudflareError::Authentication(format!(
                    "{} {}: {} - {}",
                    method, path, status, detail
                )));
            }
            s if !s.is_success() => {
                return Err(CloudflareError::Api(format!(
                    "{} {} failed: {} - {}",
                    method, path, status, detail
                )));
            }
            _ => {}
        }

        let envelope = match envelope {
            Some(env) => env,
            // Re-parse to surface the real decode error
            None => serde_json::from_str::<ApiResponse<T>>(&body)?,
        };

        if !envelope.success {
            return Err(CloudflareError::Api(format!(
                "{} {} failed: {}",
                method,
                path,
                ResponseInfo::join(&envelope.errors)
            )));
        }

        envelope.result.ok_or_else(|| {
            CloudflareError::Api(format!("{} {} returned no result", method, path))
        })
    }
}
