//! Plan operations for the PlanStateStore.

use std::sync::Arc;

use log::{debug, info, warn};

use super::{PlanCacheEntry, PlanStateStore, PlanView};
use crate::{
    error::{Result, ScalingPlanError},
    models::{PlanSummary, ScalingPlanDocument},
    params::CreatePlan,
};

impl PlanStateStore {
    /// Makes `id` the current plan.
    ///
    /// A cached plan is reused as is, unpushed edits included. Otherwise the
    /// document is fetched from the repository and cached clean.
    pub async fn load(&mut self, id: &str) -> Result<PlanView> {
        if let Some(entry) = self.entries.get(id) {
            debug!("Plan {id} served from cache");
            let view = PlanView::new(id, entry);
            self.current_id = Some(id.to_string());
            return Ok(view);
        }

        let document = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| ScalingPlanError::PlanNotFound { id: id.to_string() })?;
        self.ensure_catalogs().await;

        let (document, graph) = self.derive(&document);
        let entry = PlanCacheEntry::new(document, graph);
        let view = PlanView::new(id, &entry);
        self.entries.insert(id.to_string(), entry);
        self.current_id = Some(id.to_string());
        debug!("Loaded plan {id}");
        Ok(view)
    }

    /// Persists the current plan.
    ///
    /// A document without `db_id` is created and receives the identifier
    /// assigned by the repository; any other is updated in place. On failure
    /// the plan stays dirty and the error is returned.
    pub async fn push(&mut self) -> Result<PlanView> {
        let (id, entry) = self.current_entry()?;
        let id = id.to_string();
        let document = entry.document.persisted();

        let pushed = match &document.db_id {
            None => self.repository.create(&document).await.map(Some),
            Some(_) => self.repository.update(&document).await.map(|()| None),
        };
        let created_db_id = match pushed {
            Ok(created_db_id) => created_db_id,
            Err(e) => {
                warn!("Failed to push plan {id}: {e}");
                return Err(e);
            }
        };

        let saved_at = self.tick();
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(ScalingPlanError::NoCurrentPlan)?;
        if let Some(db_id) = created_db_id {
            let mut document = ScalingPlanDocument::clone(&entry.document);
            document.db_id = Some(db_id);
            entry.document = Arc::new(document);
        }
        entry.saved_at = Some(saved_at);

        info!("Pushed plan {id}");
        Ok(PlanView::new(&id, entry))
    }

    /// Starts a new, empty plan and makes it current. Nothing is persisted
    /// until the next [`push`](Self::push).
    pub async fn create_plan(&mut self, params: &CreatePlan) -> Result<PlanView> {
        params.validate()?;
        let exists = self.entries.contains_key(&params.id)
            || self.repository.get(&params.id).await?.is_some();
        if exists {
            return Err(ScalingPlanError::PlanExists {
                id: params.id.clone(),
            });
        }
        self.ensure_catalogs().await;

        let mut document = ScalingPlanDocument::new(params.id.as_str());
        document.metadata.title = params.title.clone();
        document.enabled = params.enabled;

        let (document, graph) = self.derive(&document);
        let mut entry = PlanCacheEntry::new(document, graph);
        entry.modified_at = Some(self.tick());
        let view = PlanView::new(&params.id, &entry);
        self.entries.insert(params.id.clone(), entry);
        self.current_id = Some(params.id.clone());

        info!("Created plan {}", params.id);
        Ok(view)
    }

    /// Deletes a plan from the repository and the cache. Returns whether
    /// anything was removed.
    pub async fn delete_plan(&mut self, id: &str) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        let evicted = self.evict(id);
        if deleted {
            info!("Deleted plan {id}");
        }
        Ok(deleted || evicted)
    }

    /// Lists every plan stored in the repository.
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        self.repository.list().await
    }

    /// Drops the cache entry of `id`, discarding unpushed edits. The next
    /// `load` fetches the plan again.
    pub fn evict(&mut self, id: &str) -> bool {
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
        }
        self.entries.remove(id).is_some()
    }

    /// Fetches the registries again and relabels every cached graph.
    pub async fn refresh_registries(&mut self) -> Result<()> {
        self.fetch_catalogs().await?;
        let ids: Vec<String> = self.entries.keys().cloned().collect();
        for id in ids {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };
            let (document, graph) = self.derive(&entry.document);
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.document = document;
                entry.graph = graph;
            }
        }
        Ok(())
    }
}
