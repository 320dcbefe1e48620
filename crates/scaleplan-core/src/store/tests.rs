//! Tests for the store module.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use super::*;
use crate::{
    graph::NodeKind,
    models::{
        ComponentMeta, MetricMeta, NodePosition, PlanItem, PlanSummary, ScalingComponentRef,
        Trigger,
    },
    params::{CreatePlan, PlanItemPatch},
    repository::MemoryRepository,
};

/// Repository double that counts fetches and can refuse writes.
#[derive(Default)]
struct FlakyRepository {
    inner: MemoryRepository,
    offline: AtomicBool,
    gets: AtomicUsize,
}

impl FlakyRepository {
    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ScalingPlanError::Configuration {
                message: "storage offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PlanRepository for FlakyRepository {
    async fn get(&self, id: &str) -> Result<Option<ScalingPlanDocument>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        self.inner.list().await
    }

    async fn create(&self, document: &ScalingPlanDocument) -> Result<String> {
        self.check()?;
        self.inner.create(document).await
    }

    async fn update(&self, document: &ScalingPlanDocument) -> Result<()> {
        self.check()?;
        self.inner.update(document).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.check()?;
        self.inner.delete(id).await
    }
}

/// Registry double that fails while offline.
#[derive(Default)]
struct FlakyRegistry {
    inner: MemoryRepository,
    offline: AtomicBool,
}

impl FlakyRegistry {
    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ScalingPlanError::Configuration {
                message: "registry offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MetricRegistry for FlakyRegistry {
    async fn list_metrics(&self) -> Result<Vec<MetricMeta>> {
        self.check()?;
        self.inner.list_metrics().await
    }
}

#[async_trait]
impl ComponentRegistry for FlakyRegistry {
    async fn list_components(&self) -> Result<Vec<ComponentMeta>> {
        self.check()?;
        self.inner.list_components().await
    }
}

fn expression_item(id: &str, expression: &str, components: &[&str]) -> PlanItem {
    let mut item = PlanItem::new(id, Trigger::Expression(expression.to_string()));
    item.scaling_components = components
        .iter()
        .map(|component| ScalingComponentRef::new(*component))
        .collect();
    item
}

fn web_plan() -> ScalingPlanDocument {
    let mut document = ScalingPlanDocument::new("web");
    document.items = vec![
        expression_item("plan_1", "get({metric_id: 'cpu_usage'}) > 80", &["web-deployment"]),
        expression_item("plan_3", "get({metric_id: 'cpu_usage'}) < 20", &["web-deployment"]),
    ];
    document
}

/// Helper function to create a store over a seeded flaky repository
async fn create_test_store() -> (Arc<FlakyRepository>, PlanStateStore) {
    let repository = Arc::new(FlakyRepository::default());
    repository.inner.insert(web_plan());

    let registries = Arc::new(MemoryRepository::new());
    registries.register_metric(MetricMeta {
        id: "cpu_usage".to_string(),
        collector_kind: "prometheus".to_string(),
    });
    registries.register_component(ComponentMeta {
        id: "web-deployment".to_string(),
        component_kind: "kubernetes_deployment".to_string(),
    });

    let store = PlanStoreBuilder::new()
        .with_repository(repository.clone())
        .with_metric_registry(registries.clone())
        .with_component_registry(registries)
        .build()
        .await
        .expect("Failed to build store");
    (repository, store)
}

#[tokio::test]
async fn test_load_syncs_document_and_graph() {
    let (_repository, mut store) = create_test_store().await;
    let view = store.load("web").await.expect("Failed to load plan");

    assert_eq!(view.id, "web");
    assert!(!view.dirty);
    assert!(view.modified_at.is_none());
    assert!(view.saved_at.is_none());
    assert_eq!(view.document.items[0].ui.metrics, vec!["cpu_usage"]);
    assert_eq!(view.graph.nodes_of(NodeKind::Metric).count(), 1);
    assert_eq!(
        view.graph.node(NodeKind::Metric, "cpu_usage").unwrap().extra["collector"],
        "prometheus"
    );
    assert_eq!(store.current_id(), Some("web"));
}

#[tokio::test]
async fn test_load_missing_plan() {
    let (_repository, mut store) = create_test_store().await;
    let error = store.load("missing").await.unwrap_err();
    assert!(matches!(error, ScalingPlanError::PlanNotFound { ref id } if id == "missing"));
    assert!(store.current_id().is_none());
}

#[tokio::test]
async fn test_load_reuses_cache_entry() {
    let (repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");
    store.add_plan_item().expect("Failed to add item");

    let view = store.load("web").await.expect("Failed to reload plan");
    assert_eq!(repository.gets.load(Ordering::SeqCst), 1);
    assert_eq!(view.document.items.len(), 3);
    assert!(view.dirty);
}

#[tokio::test]
async fn test_operations_require_current_plan() {
    let (_repository, mut store) = create_test_store().await;
    assert!(matches!(store.add_plan_item(), Err(ScalingPlanError::NoCurrentPlan)));
    assert!(matches!(store.yaml_code(), Err(ScalingPlanError::NoCurrentPlan)));
    assert!(matches!(store.push().await, Err(ScalingPlanError::NoCurrentPlan)));
}

#[tokio::test]
async fn test_need_to_save_transitions() {
    let (_repository, mut store) = create_test_store().await;
    assert!(!store.need_to_save("web"));

    store.load("web").await.expect("Failed to load plan");
    assert!(!store.need_to_save("web"));

    store.add_plan_item().expect("Failed to add item");
    assert!(store.need_to_save("web"));

    store.push().await.expect("Failed to push plan");
    assert!(!store.need_to_save("web"));

    store
        .update_plan_item(
            "plan_1",
            &PlanItemPatch {
                priority: Some(5),
                ..Default::default()
            },
        )
        .expect("Failed to update item");
    assert!(store.need_to_save("web"));

    let view = store.current().expect("current plan");
    assert!(view.modified_at > view.saved_at);
}

#[tokio::test]
async fn test_add_plan_item_skips_taken_ids() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    let id = store.add_plan_item().expect("Failed to add item");
    assert_eq!(id, "plan_4");

    let view = store.current().expect("current plan");
    let added = view.document.item("plan_4").expect("added item");
    assert_eq!(added.trigger, Trigger::Expression(String::new()));
    assert_eq!(added.priority, 0);
    assert!(added.scaling_components.is_empty());
    assert!(view.graph.node(NodeKind::PlanItem, "plan_4").is_some());
    assert_eq!(view.graph.edges_of("plan_4").count(), 0);
}

#[tokio::test]
async fn test_update_plan_item_rebuilds_graph() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    store
        .update_plan_item(
            "plan_3",
            &PlanItemPatch {
                description: Some("Scale in".to_string()),
                trigger: Some(Trigger::Expression(
                    "get({metric_id: 'queue_depth'}) < 5".to_string(),
                )),
                scaling_components: Some(vec![ScalingComponentRef::new("worker")]),
                ..Default::default()
            },
        )
        .expect("Failed to update item");

    let view = store.current().expect("current plan");
    let item = view.document.item("plan_3").unwrap();
    assert_eq!(item.description.as_deref(), Some("Scale in"));
    assert_eq!(item.priority, 0);
    assert_eq!(item.ui.metrics, vec!["queue_depth"]);
    assert!(view.graph.edge("queue_depth", "plan_3").is_some());
    assert!(view.graph.edge("cpu_usage", "plan_3").is_none());
    assert_eq!(
        view.graph.node(NodeKind::Component, "worker").unwrap().extra["kind"],
        graph::NOT_DEFINED
    );
}

#[tokio::test]
async fn test_update_missing_item_leaves_store_untouched() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");
    let before = store.current().expect("current plan");

    let error = store
        .update_plan_item("plan_9", &PlanItemPatch::default())
        .unwrap_err();
    assert!(matches!(error, ScalingPlanError::PlanItemNotFound { ref item_id, .. } if item_id == "plan_9"));
    assert!(matches!(store.remove_plan_item("plan_9"), Err(ScalingPlanError::PlanItemNotFound { .. })));

    let after = store.current().expect("current plan");
    assert!(Arc::ptr_eq(&before.document, &after.document));
    assert!(!after.dirty);
}

#[tokio::test]
async fn test_remove_plan_item_keeps_shared_nodes() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");
    store.select_plan_item("plan_1").expect("Failed to select item");

    store.remove_plan_item("plan_1").expect("Failed to remove item");

    let view = store.current().expect("current plan");
    assert!(view.document.item("plan_1").is_none());
    assert!(view.selected_item_id.is_none());
    assert!(view.graph.node(NodeKind::PlanItem, "plan_1").is_none());
    assert!(view.graph.node(NodeKind::Metric, "cpu_usage").is_some());
    assert!(view.graph.node(NodeKind::Component, "web-deployment").is_some());
    assert_eq!(view.graph.edges_of("plan_1").count(), 0);
}

#[tokio::test]
async fn test_selection_is_not_an_edit() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    store.select_plan_item("plan_3").expect("Failed to select item");
    store
        .move_plan_item("plan_3", NodePosition { x: 120.0, y: 40.0 })
        .expect("Failed to move item");

    let view = store.current().expect("current plan");
    assert_eq!(view.selected_item_id.as_deref(), Some("plan_3"));
    assert!(view.document.item("plan_3").unwrap().ui.selected);
    assert!(!view.document.item("plan_1").unwrap().ui.selected);
    assert!(!view.dirty);

    store.select_plan_item("plan_1").expect("Failed to select item");
    let view = store.current().expect("current plan");
    assert_eq!(
        view.document
            .items
            .iter()
            .filter(|item| item.ui.selected)
            .count(),
        1
    );

    store.clear_selection().expect("Failed to clear selection");
    let view = store.current().expect("current plan");
    assert!(view.selected_item_id.is_none());
    assert!(view.document.items.iter().all(|item| !item.ui.selected));
    assert!(matches!(
        store.select_plan_item("plan_9"),
        Err(ScalingPlanError::PlanItemNotFound { .. })
    ));
}

#[tokio::test]
async fn test_snapshots_are_copy_on_write() {
    let (_repository, mut store) = create_test_store().await;
    let before = store.load("web").await.expect("Failed to load plan");

    store.add_plan_item().expect("Failed to add item");
    store.remove_plan_item("plan_1").expect("Failed to remove item");

    assert_eq!(before.document.items.len(), 2);
    assert!(before.document.item("plan_1").is_some());
    assert_eq!(before.graph.nodes_of(NodeKind::PlanItem).count(), 2);

    let after = store.current().expect("current plan");
    assert!(!Arc::ptr_eq(&before.document, &after.document));
    assert!(!Arc::ptr_eq(&before.graph, &after.graph));
}

#[tokio::test]
async fn test_push_failure_keeps_plan_dirty() {
    let (repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");
    store.add_plan_item().expect("Failed to add item");

    repository.set_offline(true);
    let error = store.push().await.unwrap_err();
    assert!(matches!(error, ScalingPlanError::Configuration { .. }));
    assert!(store.need_to_save("web"));
    assert!(store.current().unwrap().saved_at.is_none());

    repository.set_offline(false);
    store.push().await.expect("Failed to push plan");
    assert!(!store.need_to_save("web"));

    let stored = repository.inner.get("web").await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 3);
    assert!(stored.items.iter().all(|item| item.ui == Default::default()));
}

#[tokio::test]
async fn test_create_plan_then_push_assigns_db_id() {
    let (repository, mut store) = create_test_store().await;

    let view = store
        .create_plan(&CreatePlan {
            id: "batch".to_string(),
            title: Some("Batch jobs".to_string()),
            enabled: true,
        })
        .await
        .expect("Failed to create plan");
    assert!(view.dirty);
    assert!(view.document.db_id.is_none());
    assert!(view.graph.is_empty());

    let pushed = store.push().await.expect("Failed to push plan");
    let db_id = pushed.document.db_id.clone().expect("db_id after create");
    assert!(!pushed.dirty);

    let stored = repository.inner.get("batch").await.unwrap().unwrap();
    assert_eq!(stored.db_id.as_deref(), Some(db_id.as_str()));
    assert_eq!(stored.title(), "Batch jobs");

    store.add_plan_item().expect("Failed to add item");
    store.push().await.expect("Failed to push update");
    assert_eq!(repository.inner.get("batch").await.unwrap().unwrap().items.len(), 1);
}

#[tokio::test]
async fn test_create_plan_rejects_existing_ids() {
    let (_repository, mut store) = create_test_store().await;
    let error = store
        .create_plan(&CreatePlan {
            id: "web".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(error, ScalingPlanError::PlanExists { .. }));

    let error = store.create_plan(&CreatePlan::default()).await.unwrap_err();
    assert!(matches!(error, ScalingPlanError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_yaml_code_omits_storage_identifier() {
    let (_repository, mut store) = create_test_store().await;
    let view = store.load("web").await.expect("Failed to load plan");
    assert!(view.document.db_id.is_some());

    let yaml = store.yaml_code().expect("Failed to render YAML");
    assert!(yaml.contains("id: web"));
    assert!(!yaml.contains("db_id"));
    assert!(!yaml.contains("ui:"));
}

#[tokio::test]
async fn test_apply_yaml_code_keeps_db_id_and_layout() {
    let (_repository, mut store) = create_test_store().await;
    let loaded = store.load("web").await.expect("Failed to load plan");
    store.select_plan_item("plan_3").expect("Failed to select item");
    store
        .move_plan_item("plan_3", NodePosition { x: 10.0, y: 20.0 })
        .expect("Failed to move item");

    let yaml = "kind: ScalingPlan\nid: web\nenabled: true\nplans:\n  - id: plan_3\n    expression: \"get({metric_id: 'memory'}) > 90\"\n  - id: plan_5\n    cron_expression: '0 2 * * *'\n";
    store.apply_yaml_code(yaml).expect("Failed to apply YAML");

    let view = store.current().expect("current plan");
    assert!(view.dirty);
    assert_eq!(view.document.db_id, loaded.document.db_id);
    assert!(view.document.enabled);
    assert_eq!(view.selected_item_id.as_deref(), Some("plan_3"));
    let item = view.document.item("plan_3").unwrap();
    assert!(item.ui.selected);
    assert_eq!(item.ui.position, Some(NodePosition { x: 10.0, y: 20.0 }));
    assert_eq!(item.ui.metrics, vec!["memory"]);
    assert!(view.graph.node(NodeKind::Metric, "cpu_usage").is_none());
    assert!(view.graph.node(NodeKind::PlanItem, "plan_5").is_some());
}

#[tokio::test]
async fn test_apply_invalid_yaml_leaves_store_unchanged() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");
    let before = store.current().expect("current plan");

    let error = store.apply_yaml_code("id: [").unwrap_err();
    let annotation = error.annotation().expect("parse error location");
    assert!(annotation.line >= 1);
    assert!(annotation.column >= 1);

    let after = store.current().expect("current plan");
    assert!(Arc::ptr_eq(&before.document, &after.document));
    assert!(Arc::ptr_eq(&before.graph, &after.graph));
    assert!(!store.need_to_save("web"));
}

#[tokio::test]
async fn test_apply_yaml_code_rejects_renaming() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    let error = store.apply_yaml_code("id: renamed\n").unwrap_err();
    assert!(matches!(error, ScalingPlanError::InvalidInput { ref field, .. } if field == "id"));
    assert!(!store.need_to_save("web"));
}

#[tokio::test]
async fn test_delete_plan_evicts_cache() {
    let (repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    assert!(store.delete_plan("web").await.expect("Failed to delete plan"));
    assert!(store.current_id().is_none());
    assert!(store.view("web").is_none());
    assert!(repository.inner.get("web").await.unwrap().is_none());
    assert!(!store.delete_plan("web").await.expect("Failed to delete plan"));
}

#[tokio::test]
async fn test_refresh_registries_relabels_cached_graphs() {
    let repository = Arc::new(MemoryRepository::new());
    repository.insert(web_plan());
    let mut store = PlanStoreBuilder::new()
        .with_repository(repository.clone())
        .with_metric_registry(repository.clone())
        .with_component_registry(repository.clone())
        .build()
        .await
        .expect("Failed to build store");

    let view = store.load("web").await.expect("Failed to load plan");
    let collector = |view: &PlanView| {
        view.graph.node(NodeKind::Metric, "cpu_usage").unwrap().extra["collector"].clone()
    };
    assert_eq!(collector(&view), graph::NOT_DEFINED);

    repository.register_metric(MetricMeta {
        id: "cpu_usage".to_string(),
        collector_kind: "cloudwatch".to_string(),
    });
    store.refresh_registries().await.expect("Failed to refresh");
    assert_eq!(collector(&store.current().unwrap()), "cloudwatch");
    assert!(!store.need_to_save("web"));
    assert_eq!(store.metric_catalog()["cpu_usage"].collector_kind, "cloudwatch");
    assert!(store.component_catalog().is_empty());
}

#[tokio::test]
async fn test_registry_outage_does_not_block_loading() {
    let repository = Arc::new(MemoryRepository::new());
    repository.insert(web_plan());
    let mut batch = web_plan();
    batch.id = "batch".to_string();
    repository.insert(batch);

    let registry = Arc::new(FlakyRegistry::default());
    registry.inner.register_metric(MetricMeta {
        id: "cpu_usage".to_string(),
        collector_kind: "prometheus".to_string(),
    });
    registry.offline.store(true, Ordering::SeqCst);

    let mut store = PlanStoreBuilder::new()
        .with_repository(repository)
        .with_metric_registry(registry.clone())
        .with_component_registry(registry.clone())
        .build()
        .await
        .expect("Failed to build store");
    let collector = |view: &PlanView| {
        view.graph.node(NodeKind::Metric, "cpu_usage").unwrap().extra["collector"].clone()
    };

    let view = store.load("web").await.expect("Failed to load plan");
    assert_eq!(collector(&view), graph::NOT_DEFINED);
    assert_eq!(view.document.items.len(), 2);
    assert!(store.metric_catalog().is_empty());

    registry.offline.store(false, Ordering::SeqCst);
    let view = store.load("batch").await.expect("Failed to load plan");
    assert_eq!(collector(&view), "prometheus");
    assert_eq!(store.metric_catalog().len(), 1);
    assert_eq!(store.cached_ids(), vec!["batch", "web"]);
}

#[tokio::test]
async fn test_deeply_nested_expression_is_unresolved() {
    let (_repository, mut store) = create_test_store().await;
    store.load("web").await.expect("Failed to load plan");

    let expression = format!(
        "{}get({{metric_id: 'cpu_usage'}}){}",
        "(".repeat(3000),
        ")".repeat(3000)
    );
    store
        .update_plan_item(
            "plan_1",
            &PlanItemPatch {
                trigger: Some(Trigger::Expression(expression)),
                ..Default::default()
            },
        )
        .expect("Failed to update item");

    let view = store.current().expect("current plan");
    assert!(view.document.item("plan_1").unwrap().ui.unresolved.is_some());
    assert!(view
        .graph
        .node(NodeKind::Unresolved, "unresolved:plan_1")
        .is_some());
    assert!(view.graph.edge("cpu_usage", "plan_3").is_some());
}
