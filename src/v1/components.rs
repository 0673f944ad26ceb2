//! Components
//!
//! A component is one monitored part of the service shown on the status
//! page (API, website, database...).

use crate::error::Result;
use crate::manager::{Entity, Manager, DEFAULT_PER_PAGE};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;
use std::collections::BTreeSet;

/// A status page component
#[derive(Debug, Clone)]
pub struct Component {
    resource: Resource,
    manager: Manager<Component>,
}

impl Entity for Component {
    const KIND: &'static str = "components";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Component {
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

    pub fn description(&self) -> Option<&str> {
        self.resource.get_str("description")
    }

    pub fn set_description(&mut self, description: &str) {
        self.resource.set("description", description);
    }

    /// Link to the component's own page
    pub fn link(&self) -> Option<&str> {
        self.resource.get_str("link")
    }

    pub fn set_link(&mut self, link: &str) {
        self.resource.set("link", link);
    }

    /// Status code, see [`crate::enums`]
    pub fn status(&self) -> Option<i64> {
        self.resource.get_i64("status")
    }

    pub fn set_status(&mut self, status: i64) {
        self.resource.set("status", status);
    }

    /// Server-side human readable status
    pub fn status_name(&self) -> Option<&str> {
        self.resource.get_str("status_name")
    }

    pub fn order(&self) -> Option<i64> {
        self.resource.get_i64("order")
    }

    pub fn set_order(&mut self, order: i64) {
        self.resource.set("order", order);
    }

    pub fn group_id(&self) -> Option<i64> {
        self.resource.get_i64("group_id")
    }

    pub fn set_group_id(&mut self, group_id: i64) {
        self.resource.set("group_id", group_id);
    }

    pub fn enabled(&self) -> bool {
        self.resource.get_bool("enabled").unwrap_or(false)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.resource.set_bool("enabled", enabled);
    }

    /// Tag names. Cachet returns tags as a `{slug: name}` object; older
    /// servers and locally staged values use a list or a comma separated
    /// string.
    pub fn tags(&self) -> BTreeSet<String> {
        match self.resource.get("tags") {
            Some(Value::Object(map)) => map
                .values()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => split_tags(s),
            _ => BTreeSet::new(),
        }
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.resource.set("tags", tags);
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

    /// Persist local changes and return the server's copy
    pub async fn update(&self) -> Result<Component> {
        ComponentManager::from_inner(self.manager.clone())
            .update(self.id(), ComponentUpdate::from(self))
            .await
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

fn split_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Fields for creating a component
#[derive(Debug, Clone)]
pub struct NewComponent {
    pub name: String,
    pub status: i64,
    pub description: Option<String>,
    pub link: Option<String>,
    pub order: Option<i64>,
    pub group_id: Option<i64>,
    pub enabled: bool,
    pub tags: Option<BTreeSet<String>>,
}

impl NewComponent {
    pub fn new(name: impl Into<String>, status: i64) -> Self {
        Self {
            name: name.into(),
            status,
            description: None,
            link: None,
            order: None,
            group_id: None,
            enabled: true,
            tags: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn group_id(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .set("name", self.name)
            .set("status", self.status)
            .opt("description", self.description)
            .opt("link", self.link)
            .opt("order", self.order)
            .opt("group_id", self.group_id)
            .flag("enabled", self.enabled)
            .opt("tags", self.tags.as_ref().map(join_tags))
    }
}

/// Partial component update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ComponentUpdate {
    pub name: Option<String>,
    pub status: Option<i64>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub order: Option<i64>,
    pub group_id: Option<i64>,
    pub enabled: Option<bool>,
    pub tags: Option<BTreeSet<String>>,
}

impl ComponentUpdate {
    fn into_payload(self) -> Payload {
        Payload::new()
            .opt("name", self.name)
            .opt("status", self.status)
            .opt("description", self.description)
            .opt("link", self.link)
            .opt("order", self.order)
            .opt("group_id", self.group_id)
            .opt_flag("enabled", self.enabled)
            .opt("tags", self.tags.as_ref().map(join_tags))
    }
}

impl From<&Component> for ComponentUpdate {
    fn from(c: &Component) -> Self {
        Self {
            name: c.name().map(str::to_string),
            status: c.status(),
            description: c.description().map(str::to_string),
            link: c.link().map(str::to_string),
            order: c.order(),
            group_id: c.group_id(),
            enabled: c.resource.get_bool("enabled"),
            tags: c.resource.get("tags").map(|_| c.tags()),
        }
    }
}

/// Manager for `components`
#[derive(Debug, Clone)]
pub struct ComponentManager {
    inner: Manager<Component>,
}

impl ComponentManager {
    pub const PATH: &'static str = "components";

    pub fn new(http: crate::http::HttpClient) -> Self {
        Self::from_inner(Manager::new(http, Self::PATH))
    }

    fn from_inner(inner: Manager<Component>) -> Self {
        Self { inner }
    }

    pub async fn create(&self, component: NewComponent) -> Result<Component> {
        self.inner.create(component.into_payload()).await
    }

    pub async fn get(&self, component_id: i64) -> Result<Component> {
        self.inner.get(component_id).await
    }

    pub async fn update(&self, component_id: i64, update: ComponentUpdate) -> Result<Component> {
        self.inner.update(component_id, update.into_payload()).await
    }

    pub async fn delete(&self, component_id: i64) -> Result<()> {
        self.inner.delete(component_id).await
    }

    /// Lazily list components, one page per request
    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<Component>> + Send + 'static {
        self.inner.list(page, per_page)
    }

    /// List with the default page size
    pub fn list_all(&self) -> impl Stream<Item = Result<Component>> + Send + 'static {
        self.inner.list(1, DEFAULT_PER_PAGE)
    }

    /// List components matching query filters such as `status` or `group_id`
    pub fn list_filtered(
        &self,
        filters: crate::manager::Filters,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = Result<Component>> + Send + 'static {
        self.inner.list_filtered(filters, page, per_page)
    }

    pub async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    pub async fn count_filtered(&self, filters: &[(String, String)]) -> Result<u64> {
        self.inner.count_filtered(filters).await
    }
}
