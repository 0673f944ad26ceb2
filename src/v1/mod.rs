//! Cachet API v1 resources
//!
//! # Module Structure
//!
//! - [`components`] - Components shown on the status page
//! - [`component_groups`] - Groups of components
//! - [`incidents`] - Incidents
//! - [`incident_updates`] - Updates posted on an incident
//! - [`subscribers`] - Email subscribers
//! - [`metrics`] - Metrics
//! - [`metric_points`] - Data points of a metric

pub mod component_groups;
pub mod components;
pub mod incident_updates;
pub mod incidents;
pub mod metric_points;
pub mod metrics;
pub mod subscribers;

pub use component_groups::{ComponentGroup, ComponentGroupManager, ComponentGroupUpdate, NewComponentGroup};
pub use components::{Component, ComponentManager, ComponentUpdate, NewComponent};
pub use incident_updates::{IncidentUpdate, IncidentUpdateManager};
pub use incidents::{Incident, IncidentChanges, IncidentManager, NewIncident};
pub use metric_points::{MetricPoint, MetricPointManager};
pub use metrics::{Metric, MetricManager, MetricUpdate, NewMetric};
pub use subscribers::{Subscriber, SubscriberManager};
