//! Incident updates
//!
//! Progress messages posted on an incident, nested under
//! `incidents/{incident_id}/updates`.

use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

/// One update posted on an incident
#[derive(Debug, Clone)]
pub struct IncidentUpdate {
    resource: Resource,
    manager: Manager<IncidentUpdate>,
}

impl Entity for IncidentUpdate {
    const KIND: &'static str = "incident updates";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for IncidentUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl IncidentUpdate {
    pub fn id(&self) -> i64 {
        self.resource.id()
    }

    pub fn attrs(&self) -> &serde_json::Map<String, Value> {
        self.resource.attrs()
    }

    pub fn incident_id(&self) -> Option<i64> {
        self.resource.get_i64("incident_id")
    }

    pub fn status(&self) -> Option<i64> {
        self.resource.get_i64("status")
    }

    pub fn set_status(&mut self, status: i64) {
        self.resource.set("status", status);
    }

    pub fn message(&self) -> Option<&str> {
        self.resource.get_str("message")
    }

    pub fn set_message(&mut self, message: &str) {
        self.resource.set("message", message);
    }

    /// Id of the user who posted the update
    pub fn user_id(&self) -> Option<i64> {
        self.resource.get_i64("user_id")
    }

    pub fn human_status(&self) -> Option<&str> {
        self.resource.get_str("human_status")
    }

    pub fn permalink(&self) -> Option<&str> {
        self.resource.get_str("permalink")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("created_at")
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("updated_at")
    }

    pub async fn update(&self) -> Result<IncidentUpdate> {
        let payload = Payload::new()
            .opt("status", self.status())
            .opt("message", self.message());
        self.manager.update(self.id(), payload).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

/// Manager for `incidents/{incident_id}/updates`
#[derive(Debug, Clone)]
pub struct IncidentUpdateManager {
    http: HttpClient,
}

impl IncidentUpdateManager {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Collection path for one incident
    pub fn path(incident_id: i64) -> String {
        format!("incidents/{}/updates", incident_id)
    }

    fn manager(&self, incident_id: i64) -> Manager<IncidentUpdate> {
        Manager::new(self.http.clone(), Self::path(incident_id))
    }

    pub async fn create(&self, incident_id: i64, status: i64, message: &str) -> Result<IncidentUpdate> {
        let payload = Payload::new().set("status", status).set("message", message);
        self.manager(incident_id).create(payload).await
    }

    pub async fn get(&self, incident_id: i64, update_id: i64) -> Result<IncidentUpdate> {
        self.manager(incident_id).get(update_id).await
    }

    pub async fn update(
        &self,
        incident_id: i64,
        update_id: i64,
        status: Option<i64>,
        message: Option<&str>,
    ) -> Result<IncidentUpdate> {
        let payload = Payload::new().opt("status", status).opt("message", message);
        self.manager(incident_id).update(update_id, payload).await
    }

    pub async fn delete(&self, incident_id: i64, update_id: i64) -> Result<()> {
        self.manager(incident_id).delete(update_id).await
    }

    pub fn list(
        &self,
        incident_id: i64,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = Result<IncidentUpdate>> + Send + 'static {
        self.manager(incident_id).list(page, per_page)
    }

    pub async fn count(&self, incident_id: i64) -> Result<u64> {
        self.manager(incident_id).count().await
    }
}
