//! Upstash-compatible Redis REST provider
//!
//! Each command is a `POST` of a JSON array (`["GET", key]`) to the endpoint
//! with a bearer token. Responses are `{"result": ...}` or `{"error": "..."}`.
//! No connection is held between calls, which keeps the provider usable from
//! restricted runtimes.

use crate::cache::errors::{CacheError, CacheResult};
use crate::cache::traits::CacheService;
use crate::config::{redact_url, CacheCredentials};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Redis REST cache service
#[derive(Clone)]
pub struct UpstashRestCache {
    client: reqwest::Client,
    url: Url,
    token: String,
}

impl std::fmt::Debug for UpstashRestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstashRestCache")
            .field("url", &self.url.as_str())
            .field("token", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashRestCache {
    /// Validate credentials and build the HTTP client
    ///
    /// Performs no request; the first command reaches the endpoint.
    pub fn new(credentials: &CacheCredentials, timeout: Duration) -> CacheResult<Self> {
        let url = Url::parse(&credentials.url).map_err(|e| {
            CacheError::ConnectionError(format!("Invalid cache URL: {}", e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CacheError::ConnectionError(format!(
                "Unsupported cache URL scheme: {}",
                url.scheme()
            )));
        }
        if credentials.token.trim().is_empty() {
            return Err(CacheError::ConnectionError(
                "Cache token is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CacheError::ConnectionError(format!("Failed to build HTTP client: {}", e))
            })?;

        debug!(url = %redact_url(url.as_str()), "REST cache client created");

        Ok(Self {
            client,
            url,
            token: credentials.token.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn execute(&self, command: &[String]) -> CacheResult<Value> {
        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.token)
            .json(command)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body: RestResponse = response.json().await.map_err(|e| {
            CacheError::BackendError(format!("Unreadable REST response ({}): {}", status, e))
        })?;

        parse_response(status.is_success(), status.as_u16(), body)
    }
}

fn parse_response(success: bool, status: u16, body: RestResponse) -> CacheResult<Value> {
    if let Some(error) = body.error {
        return Err(CacheError::BackendError(error));
    }
    if !success {
        return Err(CacheError::BackendError(format!(
            "REST command failed with status {}",
            status
        )));
    }
    Ok(body.result)
}

fn request_error(error: reqwest::Error) -> CacheError {
    if error.is_timeout() {
        CacheError::Timeout(error.to_string())
    } else if error.is_connect() {
        CacheError::ConnectionError(error.to_string())
    } else {
        CacheError::BackendError(error.to_string())
    }
}

fn get_command(key: &str) -> Vec<String> {
    vec!["GET".to_string(), key.to_string()]
}

fn set_command(key: &str, value: &str, ttl: Duration) -> Vec<String> {
    vec![
        "SET".to_string(),
        key.to_string(),
        value.to_string(),
        "EX".to_string(),
        ttl.as_secs().max(1).to_string(),
    ]
}

#[async_trait]
impl CacheService for UpstashRestCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self.execute(&get_command(key)).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Err(CacheError::BackendError(format!(
                "Unexpected GET result: {}",
                other
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let result = self.execute(&set_command(key, value, ttl)).await?;
        if result != Value::String("OK".to_string()) {
            return Err(CacheError::BackendError(format!(
                "Unexpected SET result: {}",
                result
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        let result = self.execute(&["PING".to_string()]).await?;
        Ok(result == Value::String("PONG".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "upstash"
    }
}
