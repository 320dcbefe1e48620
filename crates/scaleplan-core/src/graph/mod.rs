//! Dependency graph linking metrics, plan items and scaling components.
//!
//! The graph is a derived, read-only structure rebuilt from a document after
//! every store mutation:
//!
//! ```text
//! ┌──────────┐      ┌───────────┐      ┌─────────────┐
//! │  Metric  │─────▶│ Plan item │─────▶│  Component  │
//! └──────────┘      └───────────┘      └─────────────┘
//!                         ▲
//! ┌────────────┐          │
//! │ Unresolved │──────────┘   (expression failed to parse)
//! └────────────┘
//! ```
//!
//! Nodes are unique per `(kind, id)`; an id shared by several plan items
//! yields one node and one edge per item. Edge ids are `"{source}-{target}"`
//! so identical input always produces identical ids.

use indexmap::IndexMap;
use serde::Serialize;

pub mod builder;

pub use builder::{build, item_dependencies, sync_document, ItemDependencies};

/// Label used for registry metadata that is missing.
pub const NOT_DEFINED: &str = "Not defined";

/// Node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Metric,
    PlanItem,
    Component,
    /// Stands in for the metrics of an expression that could not be parsed
    Unresolved,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Metric => "metric",
            NodeKind::PlanItem => "plan_item",
            NodeKind::Component => "component",
            NodeKind::Unresolved => "unresolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Kind-specific details (collector, component kind, priority, ...)
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, kind: NodeKind, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.kind == kind && node.id == id)
    }

    /// Nodes of one kind, in graph order.
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Edges touching the node with the given id.
    pub fn edges_of<'g>(&'g self, id: &'g str) -> impl Iterator<Item = &'g GraphEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.source == id || edge.target == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }
}
