//! Markdown rendering of plans, graphs and operation results.
//!
//! Domain types implement `Display` directly where one rendering fits every
//! context ([`PlanSummary`](crate::models::PlanSummary),
//! [`DependencyGraph`](crate::graph::DependencyGraph),
//! [`PlanView`](crate::store::PlanView)). Collections are wrapped in newtypes
//! that also handle the empty case.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Newtypes and   │    │    Markdown     │
//! │ (views, graphs) │───▶│  Display impls  │───▶│ (terminal/text) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (PlanSummaries, MetricReferences, ...)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use scaleplan_core::{analyzer, display::MetricReferences};
//!
//! let references = MetricReferences(analyzer::analyze(
//!     "get({metric_id: 'cpu_usage', tags: {region: 'eu'}}) > 80",
//! ));
//! let output = references.to_string();
//! assert!(output.contains("`cpu_usage`"));
//! assert!(output.contains("region=eu"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{Components, MetricReferences, Metrics, PlanSummaries};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
