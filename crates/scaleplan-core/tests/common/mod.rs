#![allow(dead_code)]

use scaleplan_core::{PlanStateStore, PlanStoreBuilder};
use tempfile::TempDir;

/// Helper function to create a store backed by a fresh SQLite file
pub async fn create_test_store() -> (TempDir, PlanStateStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("test.db");
    let store = PlanStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// A two-item plan sharing one metric and one component.
pub const WEB_PLAN_YAML: &str = r#"kind: ScalingPlan
id: web
metadata:
  title: Web frontend
  cool_down: 60
  interval: 10000
  owner: platform-team
variables:
  threshold: 80
enabled: true
plans:
  - id: plan_1
    description: Scale up under load
    priority: 10
    expression: "get({metric_id: 'cpu_usage', stats: 'max', period_sec: 5}) > 80"
    scaling_components:
      - component_id: web-deployment
        replicas: 5
  - id: plan_3
    priority: 1
    expression: "get({metric_id: 'cpu_usage'}) < 20"
    scaling_components:
      - component_id: web-deployment
        replicas: 2
"#;
