use scaleplan_core::{
    graph::NodeKind,
    models::{ComponentMeta, MetricMeta, ScalingComponentRef, Trigger},
    CreatePlan, PlanItemPatch, PlanStoreBuilder, SqliteRepository,
};
use std::sync::Arc;
use tempfile::TempDir;

mod common;

use common::{create_test_store, WEB_PLAN_YAML};

#[tokio::test]
async fn test_create_push_and_reload() {
    let (temp_dir, mut store) = create_test_store().await;

    store
        .create_plan(&CreatePlan {
            id: "web".to_string(),
            title: None,
            enabled: false,
        })
        .await
        .expect("Failed to create plan");
    store.apply_yaml_code(WEB_PLAN_YAML).expect("Failed to apply YAML");
    let pushed = store.push().await.expect("Failed to push plan");
    assert!(pushed.document.db_id.is_some());
    assert!(!pushed.dirty);

    // A second store over the same file sees the pushed plan
    let mut reopened = PlanStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("nested").join("test.db")))
        .build()
        .await
        .expect("Failed to reopen store");
    let view = reopened.load("web").await.expect("Failed to load plan");
    assert_eq!(view.document.db_id, pushed.document.db_id);
    assert_eq!(view.document.title(), "Web frontend");
    assert_eq!(view.document.items.len(), 2);
    assert_eq!(view.graph.nodes_of(NodeKind::Metric).count(), 1);
    assert_eq!(view.graph.edges_of("cpu_usage").count(), 2);
    assert!(!view.dirty);
}

#[tokio::test]
async fn test_edit_session_against_sqlite() {
    let (_temp_dir, mut store) = create_test_store().await;
    store
        .create_plan(&CreatePlan {
            id: "web".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    store.apply_yaml_code(WEB_PLAN_YAML).expect("Failed to apply YAML");
    store.push().await.expect("Failed to push plan");

    let id = store.add_plan_item().expect("Failed to add item");
    assert_eq!(id, "plan_4");
    store
        .update_plan_item(
            &id,
            &PlanItemPatch {
                trigger: Some(Trigger::Cron("0 2 * * *".to_string())),
                scaling_components: Some(vec![ScalingComponentRef::new("batch")]),
                ..Default::default()
            },
        )
        .expect("Failed to update item");
    store.remove_plan_item("plan_1").expect("Failed to remove item");
    assert!(store.need_to_save("web"));
    store.push().await.expect("Failed to push plan");

    let summaries = store.list_plans().await.expect("Failed to list plans");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].item_count, 2);

    let yaml = store.yaml_code().expect("Failed to render YAML");
    assert!(yaml.contains("id: plan_4"));
    assert!(!yaml.contains("id: plan_1"));
    assert!(!yaml.contains("db_id"));
}

#[tokio::test]
async fn test_registries_label_graph_nodes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sqlite = Arc::new(
        SqliteRepository::open(temp_dir.path().join("test.db"))
            .await
            .expect("Failed to open repository"),
    );
    assert_eq!(sqlite.path(), temp_dir.path().join("test.db").as_path());
    sqlite
        .register_metric(MetricMeta {
            id: "cpu_usage".to_string(),
            collector_kind: "prometheus".to_string(),
        })
        .await
        .expect("Failed to register metric");
    sqlite
        .register_component(ComponentMeta {
            id: "web-deployment".to_string(),
            component_kind: "kubernetes_deployment".to_string(),
        })
        .await
        .expect("Failed to register component");

    let mut store = PlanStoreBuilder::new()
        .with_repository(sqlite.clone())
        .with_metric_registry(sqlite.clone())
        .with_component_registry(sqlite)
        .build()
        .await
        .expect("Failed to build store");
    store
        .create_plan(&CreatePlan {
            id: "web".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    store.apply_yaml_code(WEB_PLAN_YAML).expect("Failed to apply YAML");

    let view = store.current().expect("current plan");
    let metric = view.graph.node(NodeKind::Metric, "cpu_usage").unwrap();
    assert_eq!(metric.extra["collector"], "prometheus");
    let component = view
        .graph
        .node(NodeKind::Component, "web-deployment")
        .unwrap();
    assert_eq!(component.extra["kind"], "kubernetes_deployment");
}

#[tokio::test]
async fn test_invalid_yaml_keeps_pushed_state() {
    let (_temp_dir, mut store) = create_test_store().await;
    store
        .create_plan(&CreatePlan {
            id: "web".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    store.push().await.expect("Failed to push plan");

    let error = store.apply_yaml_code("id: [").unwrap_err();
    assert!(error.annotation().is_some());
    assert!(!store.need_to_save("web"));
}
