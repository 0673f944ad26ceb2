//! HTTP transport for the Cachet REST API
//!
//! Thin wrapper around [`reqwest::Client`] that knows the API base endpoint
//! and the token header. It never interprets status codes: every response is
//! returned as `(status, json)` and left to the manager layer.

use crate::error::Result;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Header Cachet reads the API token from
pub const TOKEN_HEADER: &str = "X-Cachet-Token";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Decode a response body. Empty bodies become `Null`, non-JSON bodies are
/// kept verbatim as a string so error responses are never lost.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// HTTP client bound to one Cachet endpoint
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: Url,
    api_token: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token is deliberately left out
        f.debug_struct("HttpClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client for `endpoint` (e.g. `https://status.example.com/api/v1`)
    pub fn new(endpoint: &str, api_token: &str) -> Result<Self> {
        Self::with_options(endpoint, api_token, DEFAULT_TIMEOUT, None)
    }

    /// Create a client with an explicit timeout and user agent
    pub fn with_options(
        endpoint: &str,
        api_token: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(concat!("cachet-client/", env!("CARGO_PKG_VERSION"))))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_token: api_token.to_string(),
        })
    }

    /// Base endpoint all paths are resolved against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolve a resource path such as `components/3` against the endpoint
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.endpoint.join(path.trim_start_matches('/'))?)
    }

    /// GET `path` with query parameters
    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, params, None).await
    }

    /// POST a JSON body to `path`
    pub async fn post(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// PUT a JSON body to `path`
    pub async fn put(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, &[], None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value)> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(TOKEN_HEADER, &self.api_token)
            .header(reqwest::header::ACCEPT, "application/json");

        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("{} {} -> {} - {}", method, url, status, sanitize_for_log(&text));
        }

        Ok((status, decode_body(&text)))
    }
}

/// Ensure the endpoint ends with a slash so relative joins append instead of
/// replacing the last path segment.
fn normalize_endpoint(endpoint: &str) -> Result<Url> {
    let trimmed = endpoint.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}
