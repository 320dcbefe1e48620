//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper renders its items as markdown and prints a placeholder line
//! when empty.

use std::fmt;

use crate::{
    analyzer::{MetricReference, Resolution},
    models::{ComponentMeta, MetricMeta, PlanSummary},
};

/// Newtype wrapper for displaying collections of plan summaries.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use scaleplan_core::{display::PlanSummaries, models::PlanSummary};
///
/// let plan = PlanSummary {
///     id: "web".to_string(),
///     db_id: "1".to_string(),
///     title: Some("Web frontend".to_string()),
///     enabled: true,
///     item_count: 2,
///     updated_at: Timestamp::now(),
/// };
/// let output = PlanSummaries(vec![plan]).to_string();
/// assert!(output.contains("## Web frontend (ID: web)"));
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Metric references extracted from one expression, in source order.
pub struct MetricReferences(pub Vec<MetricReference>);

impl fmt::Display for MetricReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No metric references found.");
        }
        for reference in &self.0 {
            match &reference.resolution {
                Resolution::Unresolved { reason } => {
                    writeln!(f, "- **{}**: {reason}", reference.metric_id)?;
                }
                Resolution::Literal => {
                    write!(f, "- `{}`", reference.metric_id)?;
                    if let Some(name) = &reference.name {
                        write!(f, " ({name})")?;
                    }
                    if !reference.tags.is_empty() {
                        let tags: Vec<String> = reference
                            .tags
                            .iter()
                            .map(|(key, value)| format!("{key}={value}"))
                            .collect();
                        write!(f, " tags: {}", tags.join(", "))?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

/// Registered metrics.
pub struct Metrics(pub Vec<MetricMeta>);

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No metrics registered.");
        }
        for metric in &self.0 {
            writeln!(f, "- `{}` (collector: {})", metric.id, metric.collector_kind)?;
        }
        Ok(())
    }
}

/// Registered scaling components.
pub struct Components(pub Vec<ComponentMeta>);

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No scaling components registered.");
        }
        for component in &self.0 {
            writeln!(f, "- `{}` (kind: {})", component.id, component.component_kind)?;
        }
        Ok(())
    }
}
