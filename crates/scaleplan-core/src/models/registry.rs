//! Metric and scaling component registry entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A metric known to the hosting system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricMeta {
    pub id: String,
    /// Collector producing the metric (e.g. `prometheus`, `cloudwatch`)
    pub collector_kind: String,
}

/// A scaling component known to the hosting system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentMeta {
    pub id: String,
    /// Component implementation (e.g. `kubernetes_deployment`)
    pub component_kind: String,
}

/// Metric registry snapshot keyed by metric id.
pub type MetricCatalog = IndexMap<String, MetricMeta>;

/// Component registry snapshot keyed by component id.
pub type ComponentCatalog = IndexMap<String, ComponentMeta>;

impl MetricMeta {
    /// Builds a catalog from a registry listing; later duplicates win.
    pub fn catalog(metrics: impl IntoIterator<Item = MetricMeta>) -> MetricCatalog {
        metrics
            .into_iter()
            .map(|metric| (metric.id.clone(), metric))
            .collect()
    }
}

impl ComponentMeta {
    /// Builds a catalog from a registry listing; later duplicates win.
    pub fn catalog(components: impl IntoIterator<Item = ComponentMeta>) -> ComponentCatalog {
        components
            .into_iter()
            .map(|component| (component.id.clone(), component))
            .collect()
    }
}
