//! Data models for scaling plan documents.
//!
//! A [`ScalingPlanDocument`] is an ordered list of [`PlanItem`]s, each one a
//! prioritized rule whose [`Trigger`] (a JavaScript-like boolean expression or
//! a cron expression) selects the scaling components it configures. The
//! document shape mirrors the YAML persisted by the backend; the only field
//! that never leaves the process is [`PlanItem::ui`], which the store derives
//! from the item on every sync.
//!
//! Registry types ([`MetricMeta`], [`ComponentMeta`]) describe the metrics and
//! scaling components known to the hosting system and are used to label nodes
//! of the dependency graph.
//!
//! # Examples
//!
//! ```rust
//! use scaleplan_core::models::{PlanItem, ScalingPlanDocument, Trigger};
//!
//! let mut document = ScalingPlanDocument::new("web-frontend");
//! document.metadata.title = Some("Web frontend".to_string());
//! document.items.push(PlanItem::new(
//!     "plan_1",
//!     Trigger::Expression("get({metric_id: 'cpu_usage'}) > 80".to_string()),
//! ));
//!
//! assert!(document.item("plan_1").is_some());
//! assert_eq!(document.title(), "Web frontend");
//! ```

pub mod document;
pub mod item;
pub mod registry;
pub mod summary;

pub use document::{DocumentKind, Metadata, ScalingPlanDocument};
pub use item::{ItemUi, NodePosition, PlanItem, ScalingComponentRef, Trigger};
pub use registry::{ComponentCatalog, ComponentMeta, MetricCatalog, MetricMeta};
pub use summary::PlanSummary;
