//! Subscribers
//!
//! The API only supports creating, listing and deleting subscribers.

use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::{Entity, Manager};
use crate::payload::Payload;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use futures::Stream;
use serde_json::Value;

/// An email subscriber
#[derive(Debug, Clone)]
pub struct Subscriber {
    resource: Resource,
    manager: Manager<Subscriber>,
}

impl Entity for Subscriber {
    const KIND: &'static str = "subscribers";

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self {
        Self { resource, manager }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Subscriber {
    pub fn id(&self) -> i64 {
        self.resource.id()
    }

    pub fn attrs(&self) -> &serde_json::Map<String, Value> {
        self.resource.attrs()
    }

    pub fn email(&self) -> Option<&str> {
        self.resource.get_str("email")
    }

    pub fn verify_code(&self) -> Option<&str> {
        self.resource.get_str("verify_code")
    }

    /// Subscribed to every component
    pub fn is_global(&self) -> bool {
        self.resource.get_bool("global").unwrap_or(false)
    }

    pub fn verified_at(&self) -> Option<NaiveDateTime> {
        self.resource.get_datetime("verified_at")
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

/// Manager for `subscribers`
#[derive(Debug, Clone)]
pub struct SubscriberManager {
    inner: Manager<Subscriber>,
}

impl SubscriberManager {
    pub const PATH: &'static str = "subscribers";

    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: Manager::new(http, Self::PATH),
        }
    }

    /// Create a subscriber.
    ///
    /// `components` restricts the subscription to the given component ids;
    /// `None` subscribes to everything. With `verify` set the subscriber is
    /// marked verified and no confirmation email is sent.
    pub async fn create(&self, email: &str, components: Option<&[i64]>, verify: bool) -> Result<Subscriber> {
        let payload = Payload::new()
            .set("email", email)
            .opt("components", components.map(<[i64]>::to_vec))
            .flag("verify", verify);
        self.inner.create(payload).await
    }

    pub async fn delete(&self, subscriber_id: i64) -> Result<()> {
        self.inner.delete(subscriber_id).await
    }

    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<Subscriber>> + Send + 'static {
        self.inner.list(page, per_page)
    }

    pub async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }
}
