//! Component groups

use crate::enums::{
    COMPONENT_GROUP_COLLAPSED_FALSE, COMPONENT_GROUP_COLLAPSED_TRUE,
    COMPONENT_GROUP_VISIBILITY_PUBLIC, COMPONENT_STATUS_OPERATIONAL,
};
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

/// A named group of components
#[derive(Debug, Clone)]
pub struct ComponentGroup {
    resource: Resource,
    manager: Manager<ComponentGroup>,
}

impl Entity for ComponentGroup {
    const KIND: &'static str = "component groups";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for ComponentGroup {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl ComponentGroup {
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

    pub fn order(&self) -> i64 {
        self.resource.get_i64("order").unwrap_or_default()
    }

    pub fn set_order(&mut self, order: i64) {
        self.resource.set("order", order);
    }

    /// Collapse mode, see `COMPONENT_GROUP_COLLAPSED_*`
    pub fn collapsed(&self) -> i64 {
        self.resource
            .get_i64("collapsed")
            .unwrap_or(COMPONENT_GROUP_COLLAPSED_FALSE)
    }

    pub fn set_collapsed(&mut self, collapsed: i64) {
        self.resource.set("collapsed", collapsed);
    }

    /// Visibility, see `COMPONENT_GROUP_VISIBILITY_*`
    pub fn visible(&self) -> i64 {
        self.resource
            .get_i64("visible")
            .unwrap_or(COMPONENT_GROUP_VISIBILITY_PUBLIC)
    }

    pub fn set_visible(&mut self, visible: i64) {
        self.resource.set("visible", visible);
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed() == COMPONENT_GROUP_COLLAPSED_TRUE
    }

    pub fn is_open(&self) -> bool {
        self.collapsed() == COMPONENT_GROUP_COLLAPSED_FALSE
    }

    /// True when no enabled component in the group reports a problem
    pub fn is_operational(&self) -> bool {
        self.enabled_components().iter().all(|component| {
            component
                .get("status")
                .and_then(|s| s.as_i64().or_else(|| s.as_str()?.parse().ok()))
                .map_or(true, |status| status <= COMPONENT_STATUS_OPERATIONAL)
        })
    }

    /// Raw component objects embedded in the group
    pub fn enabled_components(&self) -> &[Value] {
        self.resource
            .get("enabled_components")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn lowest_human_status(&self) -> Option<&str> {
        self.resource.get_str("lowest_human_status")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("created_at")
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("updated_at")
    }

    /// Persist local changes
    pub async fn update(&self) -> Result<ComponentGroup> {
        let update = ComponentGroupUpdate {
            name: self.name().map(str::to_string),
            order: self.resource.get_i64("order"),
            collapsed: self.resource.get_i64("collapsed"),
            visible: self.resource.get_i64("visible"),
        };
        self.manager.update(self.id(), update.into_payload()).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self.id()).await
    }
}

/// Fields for creating a component group
#[derive(Debug, Clone)]
pub struct NewComponentGroup {
    pub name: String,
    pub order: i64,
    pub collapsed: i64,
    pub visible: i64,
}

impl NewComponentGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: 0,
            collapsed: COMPONENT_GROUP_COLLAPSED_FALSE,
            visible: COMPONENT_GROUP_VISIBILITY_PUBLIC,
        }
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn collapsed(mut self, collapsed: i64) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn visible(mut self, visible: i64) -> Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentGroupUpdate {
    pub name: Option<String>,
    pub order: Option<i64>,
    pub collapsed: Option<i64>,
    pub visible: Option<i64>,
}

impl ComponentGroupUpdate {
    fn into_payload(self) -> Payload {
        Payload::new()
            .opt("name", self.name)
            .opt("order", self.order)
            .opt("collapsed", self.collapsed)
            .opt("visible", self.visible)
    }
}

/// Manager for `components/groups`
#[derive(Debug, Clone)]
pub struct ComponentGroupManager {
    inner: Manager<ComponentGroup>,
}

impl ComponentGroupManager {
    pub const PATH: &'static str = "components/groups";

    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: Manager::new(http, Self::PATH),
        }
    }

    pub async fn create(&self, group: NewComponentGroup) -> Result<ComponentGroup> {
        let payload = Payload::new()
            .set("name", group.name)
            .set("order", group.order)
            .set("collapsed", group.collapsed)
            .set("visible", group.visible);
        self.inner.create(payload).await
    }

    pub async fn get(&self, group_id: i64) -> Result<ComponentGroup> {
        self.inner.get(group_id).await
    }

    pub async fn update(&self, group_id: i64, update: ComponentGroupUpdate) -> Result<ComponentGroup> {
        self.inner.update(group_id, update.into_payload()).await
    }

    pub async fn delete(&self, group_id: i64) -> Result<()> {
        self.inner.delete(group_id).await
    }

    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<ComponentGroup>> + Send + 'static {
        self.inner.list(page, per_page)
    }

    pub async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }
}
