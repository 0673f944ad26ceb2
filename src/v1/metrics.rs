//! Metrics
//!
//! A metric is a time series shown as a chart on the status page. Data
//! points live in [`super::metric_points`].

use super::metric_points::{MetricPoint, MetricPointManager};
use crate::enums::{METRIC_CALC_SUM, METRIC_VIEW_LAST_HOUR};
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager, DEFAULT_PER_PAGE};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Metric {
    resource: Resource,
    manager: Manager<Metric>,
}

impl Entity for Metric {
    const KIND: &'static str = "metrics";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Metric {
    pub fn id(&self) -> i64 {
        self.resource.id()
    }

    pub fn attrs(&self) -> &serde_json::Map<String, Value> {
        self.resource.attrs()
    }

    pub fn name(&self) -> Option<&str> {
        self.resource.get_str("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.resource.set("name", name);
    }

    /// Unit shown after values, e.g. `ms`
    pub fn suffix(&self) -> Option<&str> {
        self.resource.get_str("suffix")
    }

    pub fn set_suffix(&mut self, suffix: &str) {
        self.resource.set("suffix", suffix);
    }

    pub fn description(&self) -> Option<&str> {
        self.resource.get_str("description")
    }

    pub fn set_description(&mut self, description: &str) {
        self.resource.set("description", description);
    }

    pub fn default_value(&self) -> Option<f64> {
        self.resource.get_f64("default_value")
    }

    pub fn set_default_value(&mut self, value: f64) {
        self.resource.set("default_value", value);
    }

    /// `METRIC_CALC_SUM` or `METRIC_CALC_AVG`
    pub fn calc_type(&self) -> Option<i64> {
        self.resource.get_i64("calc_type")
    }

    pub fn set_calc_type(&mut self, calc_type: i64) {
        self.resource.set("calc_type", calc_type);
    }

    pub fn display_chart(&self) -> bool {
        self.resource.get_bool("display_chart").unwrap_or(false)
    }

    pub fn set_display_chart(&mut self, display: bool) {
        self.resource.set_bool("display_chart", display);
    }

    /// Decimal places
    pub fn places(&self) -> Option<i64> {
        self.resource.get_i64("places")
    }

    pub fn set_places(&mut self, places: i64) {
        self.resource.set("places", places);
    }

    /// One of `METRIC_VIEW_*`
    pub fn default_view(&self) -> Option<i64> {
        self.resource.get_i64("default_view")
    }

    pub fn set_default_view(&mut self, view: i64) {
        self.resource.set("default_view", view);
    }

    /// Minutes between points before they are grouped
    pub fn threshold(&self) -> Option<i64> {
        self.resource.get_i64("threshold")
    }

    pub fn set_threshold(&mut self, threshold: i64) {
        self.resource.set("threshold", threshold);
    }

    pub fn order(&self) -> Option<i64> {
        self.resource.get_i64("order")
    }

    pub fn set_order(&mut self, order: i64) {
        self.resource.set("order", order);
    }

    pub fn visible(&self) -> Option<i64> {
        self.resource.get_i64("visible")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("created_at")
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("updated_at")
    }

    /// Data points recorded for this metric
    pub fn points(&self) -> impl Stream<Item = Result<MetricPoint>> + Send + 'static {
        MetricPointManager::new(self.manager.http().clone()).list(self.id(), 1, DEFAULT_PER_PAGE)
    }

    pub async fn update(&self) -> Result<Metric> {
        let update = MetricUpdate {
            name: self.name().map(str::to_string),
            suffix: self.suffix().map(str::to_string),
            description: self.description().map(str::to_string),
            default_value: self.default_value(),
            display_chart: self.resource.get_bool("display_chart"),
            calc_type: self.calc_type(),
            default_view: self.default_view(),
            threshold: self.threshold(),
            order: self.order(),
            places: self.places(),
        };
        self.manager.update(self.id(), update.into_payload()).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

/// Fields for creating a metric
#[derive(Debug, Clone)]
pub struct NewMetric {
    pub name: String,
    pub suffix: String,
    pub description: String,
    pub default_value: f64,
    pub display_chart: bool,
    pub calc_type: i64,
    pub default_view: i64,
    pub threshold: i64,
    pub order: i64,
    pub places: i64,
}

impl NewMetric {
    pub fn new(
        name: impl Into<String>,
        suffix: impl Into<String>,
        description: impl Into<String>,
        default_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            suffix: suffix.into(),
            description: description.into(),
            default_value,
            display_chart: true,
            calc_type: METRIC_CALC_SUM,
            default_view: METRIC_VIEW_LAST_HOUR,
            threshold: 5,
            order: 0,
            places: 2,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .set("name", self.name)
            .set("suffix", self.suffix)
            .set("description", self.description)
            .set("default_value", self.default_value)
            .flag("display_chart", self.display_chart)
            .set("calc_type", self.calc_type)
            .set("default_view", self.default_view)
            .set("threshold", self.threshold)
            .set("order", self.order)
            .set("places", self.places)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricUpdate {
    pub name: Option<String>,
    pub suffix: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<f64>,
    pub display_chart: Option<bool>,
    pub calc_type: Option<i64>,
    pub default_view: Option<i64>,
    pub threshold: Option<i64>,
    pub order: Option<i64>,
    pub places: Option<i64>,
}

impl MetricUpdate {
    fn into_payload(self) -> Payload {
        Payload::new()
            .opt("name", self.name)
            .opt("suffix", self.suffix)
            .opt("description", self.description)
            .opt("default_value", self.default_value)
            .opt_flag("display_chart", self.display_chart)
            .opt("calc_type", self.calc_type)
            .opt("default_view", self.default_view)
            .opt("threshold", self.threshold)
            .opt("order", self.order)
            .opt("places", self.places)
    }
}

/// Manager for `metrics`
#[derive(Debug, Clone)]
pub struct MetricManager {
    inner: Manager<Metric>,
    /// Data points of metrics
    pub points: MetricPointManager,
}

impl MetricManager {
    pub const PATH: &'static str = "metrics";

    pub fn new(http: HttpClient, points: MetricPointManager) -> Self {
        Self {
            inner: Manager::new(http, Self::PATH),
            points,
        }
    }

    pub async fn create(&self, metric: NewMetric) -> Result<Metric> {
        self.inner.create(metric.into_payload()).await
    }

    pub async fn get(&self, metric_id: i64) -> Result<Metric> {
        self.inner.get(metric_id).await
    }

    pub async fn update(&self, metric_id: i64, update: MetricUpdate) -> Result<Metric> {
        self.inner.update(metric_id, update.into_payload()).await
    }

    pub async fn delete(&self, metric_id: i64) -> Result<()> {
        self.inner.delete(metric_id).await
    }

    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<Metric>> + Send + 'static {
        self.inner.list(page, per_page)
    }

    pub async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_metric_defaults() {
        let payload = NewMetric::new("Response time", "ms", "API latency", 0.0)
            .into_payload()
            .into_value();

        assert_eq!(payload["display_chart"], 1);
        assert_eq!(payload["calc_type"], json!(METRIC_CALC_SUM));
        assert_eq!(payload["default_view"], json!(METRIC_VIEW_LAST_HOUR));
        assert_eq!(payload["threshold"], 5);
        assert_eq!(payload["places"], 2);
    }

    #[test]
    fn test_update_payload_is_partial() {
        let payload = MetricUpdate {
            suffix: Some("s".into()),
            display_chart: Some(false),
            ..Default::default()
        }
        .into_payload()
        .into_value();

        assert_eq!(payload, json!({"suffix": "s", "display_chart": 0}));
    }
}
