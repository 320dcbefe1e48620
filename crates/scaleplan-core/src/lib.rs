//! Core library for editing scaling plans.
//!
//! A scaling plan is a YAML document of prioritized rules: each plan item
//! watches metrics through a JavaScript-like expression (or fires on a cron
//! schedule) and configures scaling components. This crate keeps an edited
//! plan consistent with what it depends on:
//!
//! - [`analyzer`]: extracts the `metric_id` references of an expression
//! - [`codec`]: converts documents to and from YAML with located errors
//! - [`graph`]: builds the metric → plan item → component dependency graph
//! - [`store`]: caches loaded plans with dirty tracking and copy-on-write
//!   snapshots
//! - [`repository`]: collaborator traits plus SQLite and in-memory backends
//! - [`display`]: markdown rendering for the terminal
//!
//! # Quick Start
//!
//! ```rust
//! use scaleplan_core::{params::CreatePlan, PlanStoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = PlanStoreBuilder::new()
//!     .with_database_path(Some("scaleplan.db"))
//!     .build()
//!     .await?;
//!
//! store
//!     .create_plan(&CreatePlan {
//!         id: "web".to_string(),
//!         title: Some("Web frontend".to_string()),
//!         enabled: true,
//!     })
//!     .await?;
//! store.add_plan_item()?;
//! store.push().await?;
//!
//! println!("{}", store.current()?);
//! println!("{}", store.yaml_code()?);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod codec;
pub mod db;
pub mod display;
pub mod error;
pub mod graph;
pub mod models;
pub mod params;
pub mod repository;
pub mod store;

// Re-export commonly used types
pub use analyzer::{MetricReference, Resolution};
pub use codec::{CodecError, CodecMode};
pub use db::Database;
pub use display::{LocalDateTime, OperationStatus, PlanSummaries};
pub use error::{Result, ScalingPlanError};
pub use graph::{DependencyGraph, GraphEdge, GraphNode, NodeKind};
pub use models::{PlanItem, PlanSummary, ScalingPlanDocument, Trigger};
pub use params::{CreatePlan, PlanItemPatch, RegisterComponent, RegisterMetric};
pub use repository::{MemoryRepository, SqliteRepository};
pub use store::{PlanStateStore, PlanStoreBuilder, PlanView};
