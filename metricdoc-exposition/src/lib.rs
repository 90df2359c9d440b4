//! In-process KubeVirt metrics exposition endpoint.
//!
//! This crate provides the metrics endpoint that `metricdoc` scrapes. Collectors
//! are registered explicitly from configuration, then the axum router is driven
//! in-process with `tower::ServiceExt::oneshot`; no socket is opened.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   Collectors    │────>│ MetricCollector │────>│     Router      │
//! │ (domain/vm/...) │     │ (HELP/TYPE/...) │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! The recording rules in [`rules`] are owned here too: they describe series
//! Prometheus derives from this endpoint.

pub mod collector;
pub mod collectors;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod rules;

pub use collector::{MetricCollector, MetricFamily, Sample, SharedCollector};
pub use config::{CollectorsConfig, ExpositionConfig};
pub use error::ExpositionError;
pub use http::{ExpositionHandler, ScrapeResponse};
pub use mapping::MetricType;
pub use rules::{RecordingRule, recording_rules};
