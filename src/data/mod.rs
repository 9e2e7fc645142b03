//! Data models and derivation logic for status payloads.
//!
//! This module turns raw status-API payloads into the dashboard's
//! renderable model.
//!
//! ## Submodules
//!
//! - [`status`]: serde models of the wire format ([`EndpointStatus`],
//!   [`HealthResult`], [`Event`])
//! - [`group`]: partitioning of the flat snapshot list into ordered groups
//! - [`stats`]: min/avg/max response-time aggregation
//! - [`narrative`]: annotated event timelines for the detail view
//! - [`time`]: relative and absolute time formatting
//!
//! ## Data Flow
//!
//! ```text
//! Vec<EndpointStatus> (raw JSON)
//!        │
//!        ├──▶ group::group_statuses()          (dashboard layout)
//!        ├──▶ stats::ResponseTimeStats         (per-endpoint latency)
//!        └──▶ narrative::build_narrative()     (detail timeline)
//! ```

pub mod group;
pub mod narrative;
pub mod stats;
pub mod status;
pub mod time;

pub use group::{group_statuses, StatusGroup, UNGROUPED};
pub use narrative::{build_narrative, AnnotatedEvent};
pub use stats::ResponseTimeStats;
pub use status::{ConditionResult, EndpointStatus, Event, EventKind, HealthResult, ServerConfig};
