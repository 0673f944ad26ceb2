//! Incidents
//!
//! Incidents are the status page's announcements. Unlike the other
//! resources, an incident update is a full replace: name, message, status
//! and visibility must always be sent, and the manager refuses to issue the
//! request otherwise.

use super::incident_updates::{IncidentUpdate, IncidentUpdateManager};
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager, DEFAULT_PER_PAGE};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

/// A status page incident
#[derive(Debug, Clone)]
pub struct Incident {
    resource: Resource,
    manager: Manager<Incident>,
}

impl Entity for Incident {
    const KIND: &'static str = "incidents";
    const REQUIRED_ON_UPDATE: &'static [&'static str] = &["name", "message", "status", "visible"];

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for Incident {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Incident {
    pub fn id(&self) -> i64 {
        self.resource.id()
    }

    pub fn attrs(&self) -> &serde_json::Map<String, Value> {
        self.resource.attrs()
    }

    /// Component the incident is attached to, if any
    pub fn component_id(&self) -> Option<i64> {
        self.resource.get_i64("component_id").filter(|id| *id != 0)
    }

    pub fn set_component_id(&mut self, component_id: i64) {
        self.resource.set("component_id", component_id);
    }

    pub fn name(&self) -> Option<&str> {
        self.resource.get_str("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.resource.set("name", name);
    }

    pub fn message(&self) -> Option<&str> {
        self.resource.get_str("message")
    }

    pub fn set_message(&mut self, message: &str) {
        self.resource.set("message", message);
    }

    pub fn notify(&self) -> bool {
        self.resource.get_bool("notify").unwrap_or(false)
    }

    pub fn set_notify(&mut self, notify: bool) {
        self.resource.set_bool("notify", notify);
    }

    /// Status code, see `INCIDENT_*` in [`crate::enums`]
    pub fn status(&self) -> Option<i64> {
        self.resource.get_i64("status")
    }

    pub fn set_status(&mut self, status: i64) {
        self.resource.set("status", status);
    }

    pub fn human_status(&self) -> Option<&str> {
        self.resource.get_str("human_status")
    }

    pub fn visible(&self) -> bool {
        self.resource.get_bool("visible").unwrap_or(false)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.resource.set_bool("visible", visible);
    }

    pub fn stickied(&self) -> bool {
        self.resource.get_bool("stickied").unwrap_or(false)
    }

    /// Used for maintenance windows on servers without a schedules endpoint
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("scheduled_at")
    }

    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("occurred_at")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("created_at")
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("updated_at")
    }

    pub fn deleted_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("deleted_at")
    }

    /// Updates posted on this incident
    pub fn updates(&self) -> impl Stream<Item = Result<IncidentUpdate>> + Send + 'static {
        IncidentUpdateManager::new(self.manager.http().clone()).list(self.id(), 1, DEFAULT_PER_PAGE)
    }

    /// Persist local changes
    pub async fn update(&self) -> Result<Incident> {
        let update = IncidentChanges {
            name: self.name().map(str::to_string),
            message: self.message().map(str::to_string),
            status: self.status(),
            visible: self.resource.get_bool("visible"),
            component_id: self.component_id(),
            component_status: None,
            notify: self.resource.get_bool("notify").or(Some(true)),
            ..Default::default()
        };
        self.manager.update(self.id(), update.into_payload()).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

/// Fields for creating an incident
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub name: String,
    pub message: String,
    pub status: i64,
    pub visible: bool,
    /// Must be set together with `component_status` for a component incident
    pub component_id: Option<i64>,
    pub component_status: Option<i64>,
    pub notify: bool,
    pub created_at: Option<NaiveDateTime>,
    /// Slug of an incident template to render the message from
    pub template: Option<String>,
    pub template_vars: Option<Vec<String>>,
}

impl NewIncident {
    pub fn new(name: impl Into<String>, message: impl Into<String>, status: i64) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status,
            visible: true,
            component_id: None,
            component_status: None,
            notify: true,
            created_at: None,
            template: None,
            template_vars: None,
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn component(mut self, component_id: i64, component_status: i64) -> Self {
        self.component_id = Some(component_id);
        self.component_status = Some(component_status);
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn template(mut self, template: impl Into<String>, vars: Vec<String>) -> Self {
        self.template = Some(template.into());
        self.template_vars = Some(vars);
        self
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .set("name", self.name)
            .set("message", self.message)
            .set("status", self.status)
            .flag("visible", self.visible)
            .opt("component_id", self.component_id)
            .opt("component_status", self.component_status)
            .flag("notify", self.notify)
            .opt_datetime("created_at", self.created_at.as_ref())
            .opt("template", self.template)
            .opt("vars", self.template_vars)
    }
}

/// Incident update payload.
///
/// `name`, `message`, `status` and `visible` are required by
/// [`IncidentManager::update`]; the rest are optional.
#[derive(Debug, Clone)]
pub struct IncidentChanges {
    pub name: Option<String>,
    pub message: Option<String>,
    pub status: Option<i64>,
    pub visible: Option<bool>,
    pub component_id: Option<i64>,
    pub component_status: Option<i64>,
    pub notify: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
    pub template: Option<String>,
    pub template_vars: Option<Vec<String>>,
}

impl Default for IncidentChanges {
    fn default() -> Self {
        Self {
            name: None,
            message: None,
            status: None,
            visible: None,
            component_id: None,
            component_status: None,
            notify: Some(true),
            created_at: None,
            template: None,
            template_vars: None,
        }
    }
}

impl IncidentChanges {
    fn into_payload(self) -> Payload {
        Payload::new()
            .opt("name", self.name)
            .opt("message", self.message)
            .opt("status", self.status)
            .opt_flag("visible", self.visible)
            .opt("component_id", self.component_id)
            .opt("component_status", self.component_status)
            .opt_flag("notify", self.notify)
            .opt_datetime("created_at", self.created_at.as_ref())
            .opt("template", self.template)
            .opt("vars", self.template_vars)
    }
}

/// Manager for `incidents`
#[derive(Debug, Clone)]
pub struct IncidentManager {
    inner: Manager<Incident>,
    /// Updates posted on incidents
    pub updates: IncidentUpdateManager,
}

impl IncidentManager {
    pub const PATH: &'static str = "incidents";

    pub fn new(http: HttpClient, updates: IncidentUpdateManager) -> Self {
        Self {
            inner: Manager::new(http, Self::PATH),
            updates,
        }
    }

    pub async fn create(&self, incident: NewIncident) -> Result<Incident> {
        self.inner.create(incident.into_payload()).await
    }

    pub async fn get(&self, incident_id: i64) -> Result<Incident> {
        self.inner.get(incident_id).await
    }

    /// Replace an incident. Fails with a validation error before any request
    /// when name, message, status or visible is missing.
    pub async fn update(&self, incident_id: i64, changes: IncidentChanges) -> Result<Incident> {
        self.inner.update(incident_id, changes.into_payload()).await
    }

    pub async fn delete(&self, incident_id: i64) -> Result<()> {
        self.inner.delete(incident_id).await
    }

    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<Incident>> + Send + 'static {
        self.inner.list(page, per_page)
    }

    pub fn list_filtered(
        &self,
        filters: crate::manager::Filters,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = Result<Incident>> + Send + 'static {
        self.inner.list_filtered(filters, page, per_page)
    }

    pub async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }
}
