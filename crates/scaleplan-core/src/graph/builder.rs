//! Graph construction and per-item dependency sync.

use indexmap::{IndexMap, IndexSet};

use super::{DependencyGraph, GraphEdge, GraphNode, NodeKind, NOT_DEFINED};
use crate::{
    analyzer::{self, UNRESOLVED_METRIC_ID},
    models::{ComponentCatalog, MetricCatalog, PlanItem, ScalingPlanDocument, Trigger},
};

/// Deduplicated dependencies of one plan item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDependencies {
    pub metrics: Vec<String>,
    pub components: Vec<String>,
    /// Parser message when the expression could not be analyzed
    pub unresolved: Option<String>,
}

/// Computes the metric and component dependencies of `item`. Cron-triggered
/// items depend on no metric.
pub fn item_dependencies(item: &PlanItem) -> ItemDependencies {
    let expression = match &item.trigger {
        Trigger::Expression(expression) => analyzer::dependencies(expression),
        Trigger::Cron(_) => Default::default(),
    };

    let components: IndexSet<&str> = item
        .scaling_components
        .iter()
        .map(|component| component.component_id.as_str())
        .collect();

    ItemDependencies {
        metrics: expression.metric_ids,
        components: components.into_iter().map(String::from).collect(),
        unresolved: expression.unresolved,
    }
}

/// Returns a copy of `document` whose items carry freshly derived `ui`
/// dependencies. Selection and position are kept.
pub fn sync_document(document: &ScalingPlanDocument) -> ScalingPlanDocument {
    let mut synced = document.clone();
    for item in &mut synced.items {
        let dependencies = item_dependencies(item);
        item.ui.metrics = dependencies.metrics;
        item.ui.scaling_components = dependencies.components;
        item.ui.unresolved = dependencies.unresolved;
    }
    synced
}

/// Builds the dependency graph of `document`, labelling metric and component
/// nodes from the registry catalogs.
pub fn build(
    document: &ScalingPlanDocument,
    metrics: &MetricCatalog,
    components: &ComponentCatalog,
) -> DependencyGraph {
    let dependencies: Vec<(&PlanItem, ItemDependencies)> = document
        .items
        .iter()
        .map(|item| (item, item_dependencies(item)))
        .collect();

    let mut metric_ids = IndexSet::new();
    let mut component_ids = IndexSet::new();
    for (_, deps) in &dependencies {
        metric_ids.extend(deps.metrics.iter().map(String::as_str));
        component_ids.extend(deps.components.iter().map(String::as_str));
    }

    let mut graph = DependencyGraph::default();

    for id in metric_ids {
        let collector = metrics
            .get(id)
            .map_or(NOT_DEFINED, |meta| meta.collector_kind.as_str());
        graph.nodes.push(GraphNode {
            id: id.to_string(),
            kind: NodeKind::Metric,
            label: id.to_string(),
            extra: IndexMap::from([("collector".to_string(), collector.to_string())]),
        });
    }

    for (item, deps) in &dependencies {
        if let Some(reason) = &deps.unresolved {
            graph.nodes.push(GraphNode {
                id: unresolved_node_id(&item.id),
                kind: NodeKind::Unresolved,
                label: UNRESOLVED_METRIC_ID.to_string(),
                extra: IndexMap::from([("error".to_string(), reason.clone())]),
            });
        }
    }

    for (item, _) in &dependencies {
        graph.nodes.push(plan_item_node(item));
    }

    for id in component_ids {
        let kind = components
            .get(id)
            .map_or(NOT_DEFINED, |meta| meta.component_kind.as_str());
        graph.nodes.push(GraphNode {
            id: id.to_string(),
            kind: NodeKind::Component,
            label: id.to_string(),
            extra: IndexMap::from([("kind".to_string(), kind.to_string())]),
        });
    }

    for (item, deps) in &dependencies {
        for metric in &deps.metrics {
            graph.edges.push(GraphEdge::new(metric.as_str(), item.id.as_str()));
        }
        if deps.unresolved.is_some() {
            graph
                .edges
                .push(GraphEdge::new(unresolved_node_id(&item.id), item.id.as_str()));
        }
        for component in &deps.components {
            graph
                .edges
                .push(GraphEdge::new(item.id.as_str(), component.as_str()));
        }
    }

    graph
}

/// Id of the node standing in for an unparsable expression of `item_id`.
pub fn unresolved_node_id(item_id: &str) -> String {
    format!("unresolved:{item_id}")
}

fn plan_item_node(item: &PlanItem) -> GraphNode {
    let mut extra = IndexMap::new();
    extra.insert("priority".to_string(), item.priority.to_string());
    match &item.trigger {
        Trigger::Expression(expression) => {
            extra.insert("expression".to_string(), expression.clone());
        }
        Trigger::Cron(cron) => {
            extra.insert("cron".to_string(), cron.clone());
        }
    }

    GraphNode {
        id: item.id.clone(),
        kind: NodeKind::PlanItem,
        label: item.description.clone().unwrap_or_else(|| item.id.clone()),
        extra,
    }
}
