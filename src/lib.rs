//! Client library for the [Cachet](https://cachethq.io) status page API.
//!
//! Manage components, component groups, incidents and their updates,
//! subscribers, metrics and metric points on a Cachet installation.
//!
//! # Module Structure
//!
//! - [`client`] - The [`Client`] façade holding one manager per resource
//! - [`manager`] - Generic CRUD and pagination shared by all resources
//! - [`resource`] - The raw record every entity wraps, with typed accessors
//! - [`v1`] - Per-resource entities and managers
//! - [`http`] - HTTP transport with token authentication
//! - [`enums`] - Integer status codes
//! - [`config`] - Layered connection settings
//!
//! # Example
//!
//! ```no_run
//! use cachet_client::{enums, Client, NewComponent};
//! use futures::TryStreamExt;
//!
//! # async fn example() -> cachet_client::Result<()> {
//! let client = Client::new("https://status.example.com/api/v1", "token")?;
//!
//! let mut component = client
//!     .components
//!     .create(NewComponent::new("API", enums::COMPONENT_STATUS_OPERATIONAL))
//!     .await?;
//!
//! component.set_status(enums::COMPONENT_STATUS_MAJOR_OUTAGE);
//! let component = component.update().await?;
//!
//! let all: Vec<_> = client.components.list(1, 20).try_collect().await?;
//! println!("{} components, {:?} is down", all.len(), component.name());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod enums;
pub mod error;
pub mod http;
pub mod manager;
pub mod payload;
pub mod resource;
pub mod v1;

pub use client::{Client, Version};
pub use config::ClientConfig;
pub use error::{CachetError, Result};
pub use http::HttpClient;
pub use manager::{Entity, Manager, Page, Pagination};
pub use payload::Payload;
pub use resource::Resource;
pub use v1::*;
