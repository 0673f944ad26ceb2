//! Metric points
//!
//! Values recorded for a metric, nested under `metrics/{metric_id}/points`.

use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct MetricPoint {
    resource: Resource,
    manager: Manager<MetricPoint>,
}

impl Entity for MetricPoint {
    const KIND: &'static str = "metric points";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for MetricPoint {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl MetricPoint {
    pub fn id(&self) -> i64 {
        self.resource.id()
    }

    pub fn attrs(&self) -> &serde_json::Map<String, Value> {
        self.resource.attrs()
    }

    pub fn metric_id(&self) -> Option<i64> {
        self.resource.get_i64("metric_id")
    }

    pub fn value(&self) -> Option<f64> {
        self.resource.get_f64("value")
    }

    /// Number of raw points merged into this one
    pub fn counter(&self) -> Option<i64> {
        self.resource.get_i64("counter")
    }

    pub fn calculated_value(&self) -> Option<f64> {
        self.resource.get_f64("calculated_value")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("created_at")
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("updated_at")
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

/// Manager for `metrics/{metric_id}/points`
#[derive(Debug, Clone)]
pub struct MetricPointManager {
    http: HttpClient,
}

impl MetricPointManager {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn path(metric_id: i64) -> String {
        format!("metrics/{}/points", metric_id)
    }

    fn manager(&self, metric_id: i64) -> Manager<MetricPoint> {
        Manager::new(self.http.clone(), Self::path(metric_id))
    }

    /// Record a value. `timestamp` is unix seconds; the server uses the
    /// current time when omitted.
    pub async fn create(&self, metric_id: i64, value: f64, timestamp: Option<i64>) -> Result<MetricPoint> {
        let payload = Payload::new()
            .set("value", value)
            .opt("timestamp", timestamp);
        self.manager(metric_id).create(payload).await
    }

    pub async fn delete(&self, metric_id: i64, point_id: i64) -> Result<()> {
        self.manager(metric_id).delete(point_id).await
    }

    pub fn list(
        &self,
        metric_id: i64,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = Result<MetricPoint>> + Send + 'static {
        self.manager(metric_id).list(page, per_page)
    }

    pub async fn count(&self, metric_id: i64) -> Result<u64> {
        self.manager(metric_id).count().await
    }
}
