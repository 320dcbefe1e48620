//! Builder for creating and configuring PlanStateStore instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::PlanStateStore;
use crate::{
    error::{Result, ScalingPlanError},
    repository::{ComponentRegistry, MetricRegistry, PlanRepository, SqliteRepository},
};

/// Builder for creating and configuring PlanStateStore instances.
///
/// Collaborators that are not injected explicitly are served by one
/// [`SqliteRepository`] at the configured (or default) database path.
#[derive(Default)]
pub struct PlanStoreBuilder {
    database_path: Option<PathBuf>,
    repository: Option<Arc<dyn PlanRepository>>,
    metric_registry: Option<Arc<dyn MetricRegistry>>,
    component_registry: Option<Arc<dyn ComponentRegistry>>,
}

impl PlanStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/scaleplan/scaleplan.db` or
    /// `~/.local/share/scaleplan/scaleplan.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    pub fn with_repository<R: PlanRepository + 'static>(mut self, repository: Arc<R>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_metric_registry<R: MetricRegistry + 'static>(mut self, registry: Arc<R>) -> Self {
        self.metric_registry = Some(registry);
        self
    }

    pub fn with_component_registry<R: ComponentRegistry + 'static>(
        mut self,
        registry: Arc<R>,
    ) -> Self {
        self.component_registry = Some(registry);
        self
    }

    /// Path of the SQLite file used for collaborators that were not injected.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path(),
        }
    }

    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns `ScalingPlanError::XdgDirectory` if no default path can be found
    /// Returns `ScalingPlanError::FileSystem` if the database directory cannot be created
    /// Returns `ScalingPlanError::Database` if database initialization fails
    pub async fn build(self) -> Result<PlanStateStore> {
        if let (Some(repository), Some(metrics), Some(components)) = (
            self.repository.clone(),
            self.metric_registry.clone(),
            self.component_registry.clone(),
        ) {
            return Ok(PlanStateStore::new(repository, metrics, components));
        }

        let sqlite = Arc::new(SqliteRepository::open(self.database_path()?).await?);
        let repository: Arc<dyn PlanRepository> = match self.repository {
            Some(repository) => repository,
            None => sqlite.clone(),
        };
        let metric_registry: Arc<dyn MetricRegistry> = match self.metric_registry {
            Some(registry) => registry,
            None => sqlite.clone(),
        };
        let component_registry: Arc<dyn ComponentRegistry> = match self.component_registry {
            Some(registry) => registry,
            None => sqlite,
        };
        Ok(PlanStateStore::new(
            repository,
            metric_registry,
            component_registry,
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("scaleplan")
            .place_data_file("scaleplan.db")
            .map_err(|e| ScalingPlanError::XdgDirectory(e.to_string()))
    }
}
