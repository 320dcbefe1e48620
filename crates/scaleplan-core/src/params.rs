//! Parameter structures for scaling plan operations.
//!
//! These structures are shared by every interface that drives a
//! [`PlanStateStore`](crate::store::PlanStateStore). They carry no
//! framework-specific derives: the CLI defines its own clap argument structs
//! and converts them with `.into()`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ScalingPlanError},
    models::{ComponentMeta, MetricMeta, ScalingComponentRef, Trigger},
};

/// Parameters for creating a new, empty plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Plan ID (required, unique within the repository)
    pub id: String,
    /// Optional human-readable title
    pub title: Option<String>,
    /// Whether the engine should evaluate the plan
    #[serde(default)]
    pub enabled: bool,
}

impl CreatePlan {
    /// Rejects blank plan ids.
    ///
    /// ```rust
    /// use scaleplan_core::params::CreatePlan;
    ///
    /// let params = CreatePlan { id: "  ".to_string(), ..Default::default() };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ScalingPlanError::invalid_input("id").with_reason("must not be empty"));
        }
        Ok(())
    }
}

/// Partial update of a plan item.
///
/// Only the fields set to `Some` are applied; everything else is kept.
/// Setting `trigger` replaces an expression with a cron schedule or the
/// other way round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanItemPatch {
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub trigger: Option<Trigger>,
    /// Replaces the whole component list
    pub scaling_components: Option<Vec<ScalingComponentRef>>,
}

impl PlanItemPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.priority.is_none()
            && self.trigger.is_none()
            && self.scaling_components.is_none()
    }
}

/// Parameters for registering a metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterMetric {
    pub id: String,
    pub collector_kind: String,
}

impl From<RegisterMetric> for MetricMeta {
    fn from(params: RegisterMetric) -> Self {
        MetricMeta {
            id: params.id,
            collector_kind: params.collector_kind,
        }
    }
}

/// Parameters for registering a scaling component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterComponent {
    pub id: String,
    pub component_kind: String,
}

impl From<RegisterComponent> for ComponentMeta {
    fn from(params: RegisterComponent) -> Self {
        ComponentMeta {
            id: params.id,
            component_kind: params.component_kind,
        }
    }
}
