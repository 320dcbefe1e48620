//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; every implementation produces
//! markdown for the terminal renderer.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    graph::{DependencyGraph, GraphNode, NodeKind},
    models::{PlanItem, PlanSummary, Trigger},
    store::PlanView,
};

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Expression(expression) if expression.is_empty() => write!(f, "(empty)"),
            Trigger::Expression(expression) => write!(f, "`{expression}`"),
            Trigger::Cron(cron) => write!(f, "cron `{cron}`"),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn code_list(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or(&self.id);
        writeln!(f, "## {title} (ID: {})", self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Enabled**: {}", yes_no(self.enabled))?;
        writeln!(f, "- **Items**: {}", self.item_count)?;
        writeln!(f, "- **Updated**: {}", LocalDateTime::from(&self.updated_at))?;
        writeln!(f)
    }
}

impl PlanItem {
    fn fmt_item(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "### {}", self.id)?;
        if let Some(description) = &self.description {
            write!(f, ". {description}")?;
        }
        write!(f, " (priority {})", self.priority)?;
        if self.ui.selected {
            write!(f, " [selected]")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        match &self.trigger {
            Trigger::Cron(_) => writeln!(f, "- **Schedule**: {}", self.trigger)?,
            Trigger::Expression(_) => writeln!(f, "- **Expression**: {}", self.trigger)?,
        }
        if !self.ui.metrics.is_empty() {
            writeln!(f, "- **Metrics**: {}", code_list(&self.ui.metrics))?;
        }
        if let Some(reason) = &self.ui.unresolved {
            writeln!(f, "- **Parse error**: {reason}")?;
        }
        if !self.ui.scaling_components.is_empty() {
            writeln!(
                f,
                "- **Components**: {}",
                code_list(&self.ui.scaling_components)
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for PlanView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = &self.document;
        writeln!(f, "# {} (ID: {})", document.title(), self.id)?;
        writeln!(f)?;

        match &document.db_id {
            Some(db_id) => writeln!(f, "- **Storage ID**: {db_id}")?,
            None => writeln!(f, "- **Storage ID**: not saved yet")?,
        }
        writeln!(f, "- **Enabled**: {}", yes_no(document.enabled))?;
        writeln!(f, "- **Unsaved changes**: {}", yes_no(self.dirty))?;
        if self.modified_at.is_some() {
            writeln!(f, "- **Modified**: {}", LocalDateTime(self.modified_at.as_ref()))?;
        }
        if self.saved_at.is_some() {
            writeln!(f, "- **Saved**: {}", LocalDateTime(self.saved_at.as_ref()))?;
        }
        if let Some(seconds) = document.metadata.cool_down_seconds {
            writeln!(f, "- **Cool down**: {seconds} s")?;
        }
        if let Some(millis) = document.metadata.interval_millis {
            writeln!(f, "- **Interval**: {millis} ms")?;
        }

        if document.items.is_empty() {
            return writeln!(f, "\nNo items in this plan.");
        }

        writeln!(f, "\n## Items")?;
        writeln!(f)?;
        for item in &document.items {
            item.fmt_item(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.id)?;
        if self.label != self.id {
            write!(f, ": {}", self.label)?;
        }
        if !self.extra.is_empty() {
            let details: Vec<String> = self
                .extra
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect();
            write!(f, " ({})", details.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Empty dependency graph.");
        }

        writeln!(f, "## Nodes")?;
        writeln!(f)?;
        for node in &self.nodes {
            writeln!(f, "- {node}")?;
        }

        if !self.edges.is_empty() {
            writeln!(f, "\n## Edges")?;
            writeln!(f)?;
            for edge in &self.edges {
                writeln!(f, "- `{}` → `{}`", edge.source, edge.target)?;
            }
        }
        Ok(())
    }
}
