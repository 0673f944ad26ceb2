//! Generic resource manager
//!
//! Every Cachet collection endpoint follows the same shape: `POST path`,
//! `GET path/{id}`, `PUT path/{id}`, `DELETE path/{id}` and a paginated
//! `GET path`. [`Manager`] implements that template once; entity modules
//! only add typed create/update signatures on top.

use crate::error::{CachetError, Result};
use crate::http::HttpClient;
use crate::payload::Payload;
use crate::resource::Resource;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::marker::PhantomData;

/// Default page size used by `list`
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Query parameters passed through to list/count calls
pub type Filters = Vec<(String, String)>;

/// An entity type managed by a [`Manager`]
pub trait Entity: Sized + Send + 'static {
    /// Short name used in errors and logs
    const KIND: &'static str;

    /// Fields an update must carry. Checked before any request is sent.
    const REQUIRED_ON_UPDATE: &'static [&'static str] = &[];

    fn from_resource(resource: Resource, manager: Manager<Self>) -> Self;

    fn resource(&self) -> &Resource;

    fn id(&self) -> i64 {
        self.resource().id()
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_pages: u32,
    #[serde(default)]
    pub links: PaginationLinks,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PaginationLinks {
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub previous_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<Value>,
    meta: ListMeta,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    pagination: Pagination,
}

/// Some server versions send pagination numbers as strings
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("expected unsigned integer, got {}", n))),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("expected integer, got {}", other))),
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = lenient_u64(deserializer)?;
    u32::try_from(value).map_err(serde::de::Error::custom)
}

/// Page to request after `requested`, or `None` when the listing is done.
///
/// Uses the larger of the requested and reported page so a server that keeps
/// answering with page 1 cannot make the listing loop forever.
pub fn next_page(requested: u32, pagination: &Pagination) -> Option<u32> {
    let current = pagination.current_page.max(requested);
    (current < pagination.total_pages).then(|| current + 1)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One fetched page of entities
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub requested: u32,
}

impl<T> Page<T> {
    pub fn next_page(&self) -> Option<u32> {
        next_page(self.requested, &self.pagination)
    }
}

/// CRUD gateway for one resource path
pub struct Manager<T> {
    http: HttpClient,
    path: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Manager<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            path: self.path.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Manager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager").field("path", &self.path).finish()
    }
}

impl<T: Entity> Manager<T> {
    pub fn new(http: HttpClient, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            _entity: PhantomData,
        }
    }

    /// Collection path, e.g. `components` or `incidents/3/updates`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    /// Map a response to its body, or to the matching error
    fn check(&self, status: StatusCode, body: Value, id: Option<i64>) -> Result<Value> {
        if status.is_success() {
            return Ok(body);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CachetError::NotFound {
                path: self.path.clone(),
                id,
                body,
            });
        }
        Err(CachetError::Api {
            status: status.as_u16(),
            path: self.path.clone(),
            id,
            body,
        })
    }

    /// Wrap one JSON object; anything else is a decode error
    fn wrap(&self, value: Value) -> Result<T> {
        match value {
            Value::Object(attrs) => Ok(T::from_resource(Resource::new(attrs), self.clone())),
            other => Err(self.decode_error(format!("expected an object, got {}", kind_of(&other)))),
        }
    }

    /// Wrap the `data` object of a single-entity response
    fn wrap_data(&self, mut body: Value) -> Result<T> {
        match body.get_mut("data").map(Value::take) {
            Some(data @ Value::Object(_)) => self.wrap(data),
            _ => Err(self.decode_error("missing `data` object".to_string())),
        }
    }

    fn decode_error(&self, msg: String) -> CachetError {
        CachetError::Decode {
            path: self.path.clone(),
            source: serde::de::Error::custom(msg),
        }
    }

    /// POST a new entity
    pub async fn create(&self, payload: Payload) -> Result<T> {
        tracing::debug!("create {}", self.path);
        let (status, body) = self.http.post(&self.path, &payload.into_value()).await?;
        let body = self.check(status, body, None)?;
        self.wrap_data(body)
    }

    /// GET one entity by id
    pub async fn get(&self, id: i64) -> Result<T> {
        let (status, body) = self.http.get(&self.item_path(id), &[]).await?;
        let body = self.check(status, body, Some(id))?;
        self.wrap_data(body)
    }

    /// PUT a partial update. Fails with [`CachetError::Validation`] when a
    /// field in [`Entity::REQUIRED_ON_UPDATE`] is absent.
    pub async fn update(&self, id: i64, payload: Payload) -> Result<T> {
        let missing = payload.missing(T::REQUIRED_ON_UPDATE);
        if !missing.is_empty() {
            return Err(CachetError::Validation {
                resource: T::KIND,
                fields: missing,
            });
        }

        tracing::debug!("update {}/{}", self.path, id);
        let (status, body) = self.http.put(&self.item_path(id), &payload.into_value()).await?;
        let body = self.check(status, body, Some(id))?;
        self.wrap_data(body)
    }

    /// DELETE one entity by id
    pub async fn delete(&self, id: i64) -> Result<()> {
        tracing::debug!("delete {}/{}", self.path, id);
        let (status, body) = self.http.delete(&self.item_path(id)).await?;
        self.check(status, body, Some(id))?;
        Ok(())
    }

    /// Fetch a single page
    pub async fn fetch_page(&self, filters: &[(String, String)], page: u32, per_page: u32) -> Result<Page<T>> {
        let mut params = filters.to_vec();
        params.push(("page".to_string(), page.to_string()));
        params.push(("per_page".to_string(), per_page.to_string()));

        let (status, body) = self.http.get(&self.path, &params).await?;
        let body = self.check(status, body, None)?;
        let envelope: ListEnvelope =
            serde_json::from_value(body).map_err(|source| CachetError::Decode {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            "{}: page {}/{} ({} rows, {} total)",
            self.path,
            envelope.meta.pagination.current_page,
            envelope.meta.pagination.total_pages,
            envelope.data.len(),
            envelope.meta.pagination.total
        );

        Ok(Page {
            items: envelope
                .data
                .into_iter()
                .map(|v| self.wrap(v))
                .collect::<Result<Vec<_>>>()?,
            pagination: envelope.meta.pagination,
            requested: page,
        })
    }

    /// Lazily list entities starting at `page`.
    ///
    /// Each call returns a fresh stream. Pages are requested one at a time
    /// as the stream is polled, and only the current page is held in memory.
    pub fn list(&self, page: u32, per_page: u32) -> impl Stream<Item = Result<T>> + Send + 'static {
        self.list_filtered(Vec::new(), page, per_page)
    }

    /// Like [`Manager::list`] with extra query parameters
    pub fn list_filtered(
        &self,
        filters: Filters,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = Result<T>> + Send + 'static {
        let manager = self.clone();
        stream::try_unfold(Some(page), move |next| {
            let manager = manager.clone();
            let filters = filters.clone();
            async move {
                let Some(page) = next else {
                    return Ok::<_, CachetError>(None);
                };
                let page = manager.fetch_page(&filters, page, per_page).await?;
                let next = page.next_page();
                Ok::<_, CachetError>(Some((page.items, next)))
            }
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
    }

    /// Total number of entities, read from the pagination block
    pub async fn count(&self) -> Result<u64> {
        self.count_filtered(&[]).await
    }

    pub async fn count_filtered(&self, filters: &[(String, String)]) -> Result<u64> {
        let page = self.fetch_page(filters, 1, 1).await?;
        Ok(page.pagination.total)
    }
}
