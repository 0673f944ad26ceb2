//! Cachet Client
//!
//! Main entry point, combining the HTTP transport with one manager per
//! resource type.

use crate::config::ClientConfig;
use crate::error::{CachetError, Result};
use crate::http::HttpClient;
use crate::v1::{
    ComponentGroupManager, ComponentManager, IncidentManager, IncidentUpdateManager,
    MetricManager, MetricPointManager, SubscriberManager,
};
use serde_json::Value;

/// Answer the `ping` endpoint gives when the API is up
const PONG: &str = "Pong!";

/// Server version information
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    /// Version string, e.g. `2.3.15`
    pub value: String,
    /// Whether the server runs the latest release
    pub on_latest: bool,
    /// Raw information about the latest release
    pub latest: Value,
}

impl Version {
    fn from_body(body: &Value) -> Option<Self> {
        let meta = body.get("meta");
        Some(Self {
            value: body.get("data")?.as_str()?.to_string(),
            on_latest: meta
                .and_then(|m| m.get("on_latest"))
                .and_then(crate::resource::decode_bool)
                .unwrap_or(false),
            latest: meta
                .and_then(|m| m.get("latest"))
                .cloned()
                .unwrap_or(Value::Null),
        })
    }
}

/// Cachet API client
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    pub components: ComponentManager,
    pub component_groups: ComponentGroupManager,
    pub incidents: IncidentManager,
    pub subscribers: SubscriberManager,
    pub metrics: MetricManager,
}

impl Client {
    /// Create a client for `endpoint` (e.g. `https://status.example.com/api/v1`)
    pub fn new(endpoint: &str, api_token: &str) -> Result<Self> {
        Ok(Self::with_http(HttpClient::new(endpoint, api_token)?))
    }

    /// Create a client from layered configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::with_options(
            config.endpoint()?,
            config.api_token()?,
            config.timeout(),
            config.user_agent.as_deref(),
        )?;
        Ok(Self::with_http(http))
    }

    /// Create a client from the config file and `CACHET_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::load())
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self {
            components: ComponentManager::new(http.clone()),
            component_groups: ComponentGroupManager::new(http.clone()),
            incidents: IncidentManager::new(http.clone(), IncidentUpdateManager::new(http.clone())),
            subscribers: SubscriberManager::new(http.clone()),
            metrics: MetricManager::new(http.clone(), MetricPointManager::new(http.clone())),
            http,
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Updates posted on incidents
    pub fn incident_updates(&self) -> &IncidentUpdateManager {
        &self.incidents.updates
    }

    /// Data points of metrics
    pub fn metric_points(&self) -> &MetricPointManager {
        &self.metrics.points
    }

    /// Check that the API answers
    pub async fn ping(&self) -> Result<bool> {
        let (status, body) = self.http.get("ping", &[]).await?;
        if !status.is_success() {
            return Err(CachetError::Api {
                status: status.as_u16(),
                path: "ping".to_string(),
                id: None,
                body,
            });
        }
        Ok(body.get("data").and_then(Value::as_str) == Some(PONG))
    }

    /// Server version
    pub async fn version(&self) -> Result<Version> {
        let (status, body) = self.http.get("version", &[]).await?;
        if !status.is_success() {
            return Err(CachetError::Api {
                status: status.as_u16(),
                path: "version".to_string(),
                id: None,
                body,
            });
        }
        Version::from_body(&body).ok_or_else(|| CachetError::Decode {
            path: "version".to_string(),
            source: serde::de::Error::custom("missing string `data` field"),
        })
    }
}
