//! Plan item model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition that activates a plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// JavaScript-like boolean expression evaluated by the autoscaling engine
    Expression(String),
    /// Cron schedule
    Cron(String),
}

impl Trigger {
    /// Returns the boolean expression, if this trigger is one.
    pub fn expression(&self) -> Option<&str> {
        match self {
            Trigger::Expression(expression) => Some(expression),
            Trigger::Cron(_) => None,
        }
    }

    /// Returns the cron schedule, if this trigger is one.
    pub fn cron(&self) -> Option<&str> {
        match self {
            Trigger::Cron(cron) => Some(cron),
            Trigger::Expression(_) => None,
        }
    }
}

/// A scaling component targeted by a plan item together with the parameters
/// the engine passes to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalingComponentRef {
    pub component_id: String,

    #[serde(flatten)]
    pub params: IndexMap<String, Value>,
}

impl ScalingComponentRef {
    /// References a component without parameters.
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            params: IndexMap::new(),
        }
    }
}

/// Canvas coordinates of a plan item node.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// Derived, never persisted view state of a plan item.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ItemUi {
    /// Metric ids referenced by the expression, deduplicated
    pub metrics: Vec<String>,
    /// Component ids targeted by the item, deduplicated
    pub scaling_components: Vec<String>,
    /// Parser message when the expression could not be analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<NodePosition>,
    pub selected: bool,
}

/// One prioritized rule of a scaling plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "PlanItemRecord", into = "PlanItemRecord")]
pub struct PlanItem {
    pub id: String,
    pub description: Option<String>,
    /// Higher priorities are evaluated first by the engine
    pub priority: i64,
    pub trigger: Trigger,
    pub scaling_components: Vec<ScalingComponentRef>,
    pub ui: ItemUi,
}

impl PlanItem {
    /// Creates an item with priority 0 and no components.
    pub fn new(id: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            id: id.into(),
            description: None,
            priority: 0,
            trigger,
            scaling_components: Vec::new(),
            ui: ItemUi::default(),
        }
    }
}

/// Serialized shape of a plan item.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanItemRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cron_expression: Option<String>,
    #[serde(default)]
    scaling_components: Vec<ScalingComponentRef>,
}

impl TryFrom<PlanItemRecord> for PlanItem {
    type Error = String;

    fn try_from(record: PlanItemRecord) -> Result<Self, Self::Error> {
        let trigger = match (record.expression, record.cron_expression) {
            (Some(expression), None) => Trigger::Expression(expression),
            (None, Some(cron)) => Trigger::Cron(cron),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "plan item '{}' sets both expression and cron_expression",
                    record.id
                ))
            }
            (None, None) => {
                return Err(format!(
                    "plan item '{}' needs either expression or cron_expression",
                    record.id
                ))
            }
        };

        Ok(Self {
            id: record.id,
            description: record.description,
            priority: record.priority,
            trigger,
            scaling_components: record.scaling_components,
            ui: ItemUi::default(),
        })
    }
}

impl From<PlanItem> for PlanItemRecord {
    fn from(item: PlanItem) -> Self {
        let (expression, cron_expression) = match item.trigger {
            Trigger::Expression(expression) => (Some(expression), None),
            Trigger::Cron(cron) => (None, Some(cron)),
        };
        Self {
            id: item.id,
            description: item.description,
            priority: item.priority,
            expression,
            cron_expression,
            scaling_components: item.scaling_components,
        }
    }
}
