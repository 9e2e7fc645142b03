// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # statuswatch
//!
//! A terminal dashboard and library for monitoring Gatus-style
//! health-check status pages.
//!
//! This crate polls a status server's read-only HTTP API and derives the
//! dashboard's renderable model from the raw payloads: grouped endpoint
//! grids, response-time statistics, human-readable event timelines,
//! relative times, hover-tooltip placement, and theme-driven colors.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (state) │    │(derive)  │    │(render) │    │          │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐     ┌─────────┐                                 │
//! │  │ poller  │◀───▶│ client  │──▶ status server HTTP API       │
//! │  └─────────┘     └─────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and the
//!   snapshot-changed recomputation of all derived data
//! - **[`client`]**: HTTP client for the status API (statuses, detail,
//!   config, badge/chart URLs)
//! - **[`poller`]**: Background fetch task with generation-tokened
//!   requests and runtime-reconfigurable interval and page
//! - **[`data`]**: Pure derivation logic - grouping, response-time
//!   aggregation, event narratives, time formatting
//! - **[`settings`]**: Persisted local preferences, defensively
//!   re-validated on every read
//! - **[`ui`]**: Terminal rendering with ratatui - dashboard grid,
//!   detail timeline, themes, tooltip placement
//!
//! ## Usage
//!
//! ```bash
//! statuswatch --server http://status.example.org
//! ```

pub mod app;
pub mod client;
pub mod data;
pub mod events;
pub mod poller;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use client::{ApiClient, BadgeDuration};
pub use data::{
    build_narrative, group_statuses, AnnotatedEvent, EndpointStatus, Event, EventKind,
    HealthResult, ResponseTimeStats, StatusGroup,
};
pub use poller::{PollPayload, PollView, Poller};
pub use settings::{SettingsStore, StoredAuth};
