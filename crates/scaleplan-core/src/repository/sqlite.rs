//! SQLite-backed collaborators.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::task;

use super::{ComponentRegistry, MetricRegistry, PlanRepository};
use crate::{
    db::Database,
    error::{Result, ScalingPlanError},
    models::{ComponentMeta, MetricMeta, PlanSummary, ScalingPlanDocument},
};

/// Plan repository and registries stored in one SQLite file.
///
/// Every call opens its own connection on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: PathBuf,
}

impl SqliteRepository {
    /// Opens (and initializes) the database at `path`, creating parent
    /// directories as needed.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ScalingPlanError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let repository = Self { db_path };
        repository.run(|_| Ok(())).await?;
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub async fn register_metric(&self, metric: MetricMeta) -> Result<()> {
        debug!("Registering metric {}", metric.id);
        self.run(move |db| db.upsert_metric(&metric)).await
    }

    pub async fn register_component(&self, component: ComponentMeta) -> Result<()> {
        debug!("Registering scaling component {}", component.id);
        self.run(move |db| db.upsert_component(&component)).await
    }

    async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(ScalingPlanError::join)?
    }
}

#[async_trait]
impl PlanRepository for SqliteRepository {
    async fn get(&self, id: &str) -> Result<Option<ScalingPlanDocument>> {
        let id = id.to_string();
        self.run(move |db| db.get_plan(&id)).await
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        self.run(|db| db.list_plans()).await
    }

    async fn create(&self, document: &ScalingPlanDocument) -> Result<String> {
        let document = document.clone();
        self.run(move |db| db.insert_plan(&document)).await
    }

    async fn update(&self, document: &ScalingPlanDocument) -> Result<()> {
        let document = document.clone();
        self.run(move |db| db.update_plan(&document)).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |db| db.delete_plan(&id)).await
    }
}

#[async_trait]
impl MetricRegistry for SqliteRepository {
    async fn list_metrics(&self) -> Result<Vec<MetricMeta>> {
        self.run(|db| db.list_metrics()).await
    }
}

#[async_trait]
impl ComponentRegistry for SqliteRepository {
    async fn list_components(&self) -> Result<Vec<ComponentMeta>> {
        self.run(|db| db.list_components()).await
    }
}
