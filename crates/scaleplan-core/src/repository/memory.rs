//! In-memory collaborators.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use indexmap::IndexMap;
use jiff::Timestamp;

use super::{ComponentRegistry, MetricRegistry, PlanRepository};
use crate::{
    error::{Result, ScalingPlanError},
    models::{ComponentMeta, MetricMeta, PlanSummary, ScalingPlanDocument},
};

#[derive(Default)]
struct State {
    plans: IndexMap<String, StoredPlan>,
    next_db_id: u64,
    metrics: Vec<MetricMeta>,
    components: Vec<ComponentMeta>,
}

struct StoredPlan {
    db_id: String,
    document: ScalingPlanDocument,
    updated_at: Timestamp,
}

/// Plan repository and registries backed by process memory.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document as if it had been persisted earlier. Returns its
    /// storage identifier.
    pub fn insert(&self, document: ScalingPlanDocument) -> String {
        let mut state = self.lock();
        state.next_db_id += 1;
        let db_id = state.next_db_id.to_string();
        let mut document = document.persisted();
        document.db_id = Some(db_id.clone());
        state.plans.insert(
            document.id.clone(),
            StoredPlan {
                db_id: db_id.clone(),
                document,
                updated_at: Timestamp::now(),
            },
        );
        db_id
    }

    pub fn register_metric(&self, metric: MetricMeta) {
        let mut state = self.lock();
        state.metrics.retain(|existing| existing.id != metric.id);
        state.metrics.push(metric);
    }

    pub fn register_component(&self, component: ComponentMeta) {
        let mut state = self.lock();
        state.components.retain(|existing| existing.id != component.id);
        state.components.push(component);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PlanRepository for MemoryRepository {
    async fn get(&self, id: &str) -> Result<Option<ScalingPlanDocument>> {
        Ok(self.lock().plans.get(id).map(|plan| plan.document.clone()))
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        Ok(self
            .lock()
            .plans
            .values()
            .map(|plan| PlanSummary::from_document(&plan.document, &plan.db_id, plan.updated_at))
            .collect())
    }

    async fn create(&self, document: &ScalingPlanDocument) -> Result<String> {
        if self.lock().plans.contains_key(&document.id) {
            return Err(ScalingPlanError::PlanExists {
                id: document.id.clone(),
            });
        }
        Ok(self.insert(document.clone()))
    }

    async fn update(&self, document: &ScalingPlanDocument) -> Result<()> {
        let mut state = self.lock();
        let stored = state
            .plans
            .get_mut(&document.id)
            .filter(|plan| Some(&plan.db_id) == document.db_id.as_ref())
            .ok_or_else(|| ScalingPlanError::PlanNotFound {
                id: document.id.clone(),
            })?;
        stored.document = document.persisted();
        stored.updated_at = Timestamp::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.lock().plans.shift_remove(id).is_some())
    }
}

#[async_trait]
impl MetricRegistry for MemoryRepository {
    async fn list_metrics(&self) -> Result<Vec<MetricMeta>> {
        Ok(self.lock().metrics.clone())
    }
}

#[async_trait]
impl ComponentRegistry for MemoryRepository {
    async fn list_components(&self) -> Result<Vec<ComponentMeta>> {
        Ok(self.lock().components.clone())
    }
}
