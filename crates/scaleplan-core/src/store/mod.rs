//! In-memory state of the scaling plans being edited.
//!
//! The [`PlanStateStore`] caches one entry per loaded plan and keeps the
//! document, its derived dependency graph and the dirty-tracking timestamps
//! consistent across every edit:
//!
//! ```text
//! ┌──────────────┐  load   ┌──────────────────┐  edit   ┌──────────────────┐
//! │ Uninitialized│────────▶│  Loaded (clean)  │────────▶│  Loaded (dirty)  │
//! └──────────────┘         └──────────────────┘◀────────└──────────────────┘
//!                                              push ok       │  ▲
//!                                                            └──┘ edit / push failed
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory wiring the store to its collaborators
//! - [`plan_ops`]: Loading, pushing, creating and deleting plans
//! - [`item_ops`]: Plan item edits and selection
//! - [`yaml_ops`]: Text editor round trip
//!
//! Every edit is copy-on-write: the entry receives a new
//! `Arc<ScalingPlanDocument>` and a new `Arc<DependencyGraph>`, so a
//! [`PlanView`] taken earlier keeps observing the state it was taken from.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use scaleplan_core::{
//!     models::{PlanItem, ScalingPlanDocument, Trigger},
//!     repository::MemoryRepository,
//!     PlanStoreBuilder,
//! };
//!
//! # async fn example() -> scaleplan_core::Result<()> {
//! let repository = Arc::new(MemoryRepository::new());
//! let mut document = ScalingPlanDocument::new("web");
//! document.items.push(PlanItem::new(
//!     "plan_1",
//!     Trigger::Expression("get({metric_id: 'cpu'}) > 80".to_string()),
//! ));
//! repository.insert(document);
//!
//! let mut store = PlanStoreBuilder::new()
//!     .with_repository(repository.clone())
//!     .with_metric_registry(repository.clone())
//!     .with_component_registry(repository)
//!     .build()
//!     .await?;
//!
//! store.load("web").await?;
//! let id = store.add_plan_item()?;
//! assert_eq!(id, "plan_2");
//! assert!(store.need_to_save("web"));
//!
//! store.push().await?;
//! assert!(!store.need_to_save("web"));
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use jiff::{SignedDuration, Timestamp};
use log::{debug, warn};

use crate::{
    error::{Result, ScalingPlanError},
    graph::{self, DependencyGraph},
    models::{ComponentCatalog, ComponentMeta, MetricCatalog, MetricMeta, ScalingPlanDocument},
    repository::{ComponentRegistry, MetricRegistry, PlanRepository},
};

pub mod builder;
pub mod item_ops;
pub mod plan_ops;
pub mod yaml_ops;

#[cfg(test)]
mod tests;

pub use builder::PlanStoreBuilder;

/// Cached state of one plan.
#[derive(Debug, Clone)]
pub struct PlanCacheEntry {
    pub document: Arc<ScalingPlanDocument>,
    pub graph: Arc<DependencyGraph>,
    /// Last content edit; unset right after a load
    pub modified_at: Option<Timestamp>,
    /// Last successful push
    pub saved_at: Option<Timestamp>,
    pub selected_item_id: Option<String>,
}

impl PlanCacheEntry {
    fn new(document: Arc<ScalingPlanDocument>, graph: Arc<DependencyGraph>) -> Self {
        Self {
            document,
            graph,
            modified_at: None,
            saved_at: None,
            selected_item_id: None,
        }
    }

    /// Whether the entry holds edits that were never pushed.
    pub fn need_to_save(&self) -> bool {
        match (self.modified_at, self.saved_at) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(modified_at), Some(saved_at)) => modified_at > saved_at,
        }
    }
}

/// Immutable snapshot of a cached plan.
#[derive(Debug, Clone)]
pub struct PlanView {
    pub id: String,
    pub document: Arc<ScalingPlanDocument>,
    pub graph: Arc<DependencyGraph>,
    pub dirty: bool,
    pub modified_at: Option<Timestamp>,
    pub saved_at: Option<Timestamp>,
    pub selected_item_id: Option<String>,
}

impl PlanView {
    fn new(id: &str, entry: &PlanCacheEntry) -> Self {
        Self {
            id: id.to_string(),
            document: Arc::clone(&entry.document),
            graph: Arc::clone(&entry.graph),
            dirty: entry.need_to_save(),
            modified_at: entry.modified_at,
            saved_at: entry.saved_at,
            selected_item_id: entry.selected_item_id.clone(),
        }
    }
}

/// What an edit touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    /// Persisted content: bumps `modified_at` and re-derives the graph
    Content,
    /// Selection or layout only
    View,
}

/// Registry snapshots used to label graph nodes.
#[derive(Debug, Default)]
struct Catalogs {
    metrics: MetricCatalog,
    components: ComponentCatalog,
    loaded: bool,
}

/// Cache of loaded scaling plans and the "current" plan being edited.
pub struct PlanStateStore {
    repository: Arc<dyn PlanRepository>,
    metric_registry: Arc<dyn MetricRegistry>,
    component_registry: Arc<dyn ComponentRegistry>,
    entries: HashMap<String, PlanCacheEntry>,
    current_id: Option<String>,
    catalogs: Catalogs,
    last_tick: Option<Timestamp>,
}

impl PlanStateStore {
    pub(crate) fn new(
        repository: Arc<dyn PlanRepository>,
        metric_registry: Arc<dyn MetricRegistry>,
        component_registry: Arc<dyn ComponentRegistry>,
    ) -> Self {
        Self {
            repository,
            metric_registry,
            component_registry,
            entries: HashMap::new(),
            current_id: None,
            catalogs: Catalogs::default(),
            last_tick: None,
        }
    }

    /// ID of the plan the item and YAML operations act on.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Snapshot of the current plan.
    pub fn current(&self) -> Result<PlanView> {
        let (id, entry) = self.current_entry()?;
        Ok(PlanView::new(id, entry))
    }

    /// Snapshot of a cached plan.
    pub fn view(&self, id: &str) -> Option<PlanView> {
        self.entries.get(id).map(|entry| PlanView::new(id, entry))
    }

    /// Whether the cached plan `id` has unpushed edits. Plans that are not
    /// cached never need saving.
    pub fn need_to_save(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .is_some_and(PlanCacheEntry::need_to_save)
    }

    /// IDs of every cached plan, sorted.
    pub fn cached_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn metric_catalog(&self) -> &MetricCatalog {
        &self.catalogs.metrics
    }

    pub fn component_catalog(&self) -> &ComponentCatalog {
        &self.catalogs.components
    }

    fn current_entry(&self) -> Result<(&str, &PlanCacheEntry)> {
        let id = self
            .current_id
            .as_deref()
            .ok_or(ScalingPlanError::NoCurrentPlan)?;
        let entry = self
            .entries
            .get(id)
            .ok_or(ScalingPlanError::NoCurrentPlan)?;
        Ok((id, entry))
    }

    /// Returns a timestamp strictly greater than every earlier one.
    fn tick(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let tick = match self.last_tick {
            Some(last) if now <= last => last
                .checked_add(SignedDuration::from_nanos(1))
                .unwrap_or(now),
            _ => now,
        };
        self.last_tick = Some(tick);
        tick
    }

    /// Syncs the derived `ui` state of `document` and builds its graph.
    fn derive(
        &self,
        document: &ScalingPlanDocument,
    ) -> (Arc<ScalingPlanDocument>, Arc<DependencyGraph>) {
        let synced = graph::sync_document(document);
        let graph = graph::build(&synced, &self.catalogs.metrics, &self.catalogs.components);
        debug!(
            "Synced plan {} ({} nodes, {} edges)",
            synced.id,
            graph.nodes.len(),
            graph.edges.len()
        );
        (Arc::new(synced), Arc::new(graph))
    }

    /// Applies `edit` to a copy of the current document and swaps the copy
    /// in. A failing edit leaves the store untouched.
    fn edit_current<T>(
        &mut self,
        change: Change,
        edit: impl FnOnce(&mut ScalingPlanDocument, &mut Option<String>) -> Result<T>,
    ) -> Result<T> {
        let (id, entry) = self.current_entry()?;
        let id = id.to_string();
        let mut document = ScalingPlanDocument::clone(&entry.document);
        let mut selected = entry.selected_item_id.clone();

        let output = edit(&mut document, &mut selected)?;

        let (document, graph, modified_at) = match change {
            Change::Content => {
                let (document, graph) = self.derive(&document);
                (document, Some(graph), Some(self.tick()))
            }
            Change::View => (Arc::new(document), None, None),
        };

        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(ScalingPlanError::NoCurrentPlan)?;
        entry.document = document;
        if let Some(graph) = graph {
            entry.graph = graph;
        }
        if modified_at.is_some() {
            entry.modified_at = modified_at;
        }
        entry.selected_item_id = selected;
        Ok(output)
    }

    /// Fetches the registry catalogs unless they were fetched before. A
    /// registry failure leaves the catalogs empty, so nodes are labelled
    /// "Not defined", and the next call tries again.
    async fn ensure_catalogs(&mut self) {
        if self.catalogs.loaded {
            return;
        }
        if let Err(e) = self.fetch_catalogs().await {
            warn!("Registries unavailable, graph nodes stay unlabelled: {e}");
        }
    }

    async fn fetch_catalogs(&mut self) -> Result<()> {
        let metrics = self.metric_registry.list_metrics().await?;
        let components = self.component_registry.list_components().await?;
        debug!(
            "Fetched {} metrics and {} scaling components",
            metrics.len(),
            components.len()
        );
        self.catalogs = Catalogs {
            metrics: MetricMeta::catalog(metrics),
            components: ComponentMeta::catalog(components),
            loaded: true,
        };
        Ok(())
    }
}
