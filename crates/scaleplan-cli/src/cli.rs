//! Command-line argument definitions using clap.
//!
//! Each command has a clap argument struct converted into the matching core
//! parameter type, so clap attributes never leak into `scaleplan-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → PlanStateStore
//! ```

use std::path::PathBuf;

use clap::{Args, Subcommand};
use scaleplan_core::{
    models::{ScalingComponentRef, Trigger},
    params::{CreatePlan, PlanItemPatch, RegisterComponent, RegisterMetric},
};

/// Create a new, empty plan
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Unique identifier of the plan
    pub id: String,
    /// Human-readable title
    #[arg(short, long)]
    pub title: Option<String>,
    /// Let the autoscaling engine evaluate the plan
    #[arg(long)]
    pub enabled: bool,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan {
            id: val.id,
            title: val.title,
            enabled: val.enabled,
        }
    }
}

#[derive(Args)]
pub struct PlanIdArgs {
    #[arg(help = "Identifier of the plan")]
    pub id: String,
}

/// Print the dependency graph of a plan
#[derive(Args)]
pub struct GraphArgs {
    #[arg(help = "Identifier of the plan")]
    pub id: String,
    /// Print nodes and edges as JSON
    #[arg(long)]
    pub json: bool,
}

/// Print the YAML of a plan
#[derive(Args)]
pub struct ExportArgs {
    #[arg(help = "Identifier of the plan")]
    pub id: String,
    /// Include the storage identifier
    #[arg(long)]
    pub persistence: bool,
}

/// Replace a plan with edited YAML
#[derive(Args)]
pub struct ApplyArgs {
    #[arg(help = "Identifier of the plan")]
    pub id: String,
    #[arg(help = "YAML file to apply, or - for standard input")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List stored plans
    #[command(alias = "l")]
    List,
    /// Create a new plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// Show a plan with its items and dependencies
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Show the dependency graph of a plan
    #[command(alias = "g")]
    Graph(GraphArgs),
    /// Print the YAML of a plan
    #[command(alias = "e")]
    Export(ExportArgs),
    /// Replace a plan with edited YAML
    #[command(alias = "a")]
    Apply(ApplyArgs),
    /// Delete a plan
    #[command(alias = "d")]
    Delete(PlanIdArgs),
}

/// Append an empty item to a plan
#[derive(Args)]
pub struct AddItemArgs {
    #[arg(help = "Identifier of the plan")]
    pub plan: String,
}

/// Update the fields of a plan item
#[derive(Args)]
pub struct UpdateItemArgs {
    #[arg(help = "Identifier of the plan")]
    pub plan: String,
    #[arg(help = "Identifier of the plan item")]
    pub item: String,
    /// New description; an empty value clears it
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, allow_hyphen_values = true)]
    pub priority: Option<i64>,
    /// Boolean expression triggering the item
    #[arg(short, long, conflicts_with = "cron")]
    pub expression: Option<String>,
    /// Cron schedule triggering the item
    #[arg(long)]
    pub cron: Option<String>,
    /// Scaling components to configure; replaces the current list
    #[arg(short, long = "component", value_name = "COMPONENT_ID")]
    pub components: Vec<String>,
}

impl From<&UpdateItemArgs> for PlanItemPatch {
    fn from(val: &UpdateItemArgs) -> Self {
        let trigger = match (&val.expression, &val.cron) {
            (Some(expression), _) => Some(Trigger::Expression(expression.clone())),
            (None, Some(cron)) => Some(Trigger::Cron(cron.clone())),
            (None, None) => None,
        };
        let scaling_components = (!val.components.is_empty()).then(|| {
            val.components
                .iter()
                .map(|id| ScalingComponentRef::new(id.as_str()))
                .collect()
        });

        PlanItemPatch {
            description: val.description.clone(),
            priority: val.priority,
            trigger,
            scaling_components,
        }
    }
}

/// Remove an item from a plan
#[derive(Args)]
pub struct RemoveItemArgs {
    #[arg(help = "Identifier of the plan")]
    pub plan: String,
    #[arg(help = "Identifier of the plan item")]
    pub item: String,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Append an empty item to a plan
    #[command(alias = "a")]
    Add(AddItemArgs),
    /// Update the fields of a plan item
    #[command(alias = "u")]
    Update(UpdateItemArgs),
    /// Remove an item from a plan
    #[command(alias = "r")]
    Remove(RemoveItemArgs),
}

/// Register a metric or change its collector
#[derive(Args)]
pub struct RegisterMetricArgs {
    #[arg(help = "Metric identifier used as metric_id in expressions")]
    pub id: String,
    /// Collector producing the metric (e.g. prometheus)
    #[arg(long)]
    pub collector: String,
}

impl From<RegisterMetricArgs> for RegisterMetric {
    fn from(val: RegisterMetricArgs) -> Self {
        RegisterMetric {
            id: val.id,
            collector_kind: val.collector,
        }
    }
}

#[derive(Subcommand)]
pub enum MetricCommands {
    /// Register a metric
    #[command(alias = "r")]
    Register(RegisterMetricArgs),
    /// List registered metrics
    #[command(alias = "l")]
    List,
}

/// Register a scaling component or change its kind
#[derive(Args)]
pub struct RegisterComponentArgs {
    #[arg(help = "Component identifier used as component_id in plans")]
    pub id: String,
    /// Component implementation (e.g. kubernetes_deployment)
    #[arg(long)]
    pub kind: String,
}

impl From<RegisterComponentArgs> for RegisterComponent {
    fn from(val: RegisterComponentArgs) -> Self {
        RegisterComponent {
            id: val.id,
            component_kind: val.kind,
        }
    }
}

#[derive(Subcommand)]
pub enum ComponentCommands {
    /// Register a scaling component
    #[command(alias = "r")]
    Register(RegisterComponentArgs),
    /// List registered scaling components
    #[command(alias = "l")]
    List,
}

/// Print the metric references found in an expression
#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(help = "Expression to analyze")]
    pub expression: String,
    /// Print the references as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args() -> UpdateItemArgs {
        UpdateItemArgs {
            plan: "web".to_string(),
            item: "plan_1".to_string(),
            description: None,
            priority: None,
            expression: None,
            cron: None,
            components: vec![],
        }
    }

    #[test]
    fn test_empty_update_maps_to_empty_patch() {
        assert!(PlanItemPatch::from(&update_args()).is_empty());
    }

    #[test]
    fn test_update_args_conversion() {
        let mut args = update_args();
        args.cron = Some("0 2 * * *".to_string());
        args.priority = Some(-3);
        args.components = vec!["batch".to_string()];

        let patch = PlanItemPatch::from(&args);
        assert_eq!(patch.trigger, Some(Trigger::Cron("0 2 * * *".to_string())));
        assert_eq!(patch.priority, Some(-3));
        assert_eq!(
            patch.scaling_components,
            Some(vec![ScalingComponentRef::new("batch")])
        );
    }
}
