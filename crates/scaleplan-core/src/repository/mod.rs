//! Collaborator interfaces consumed by the plan state store.
//!
//! The store never talks to storage directly. It fetches and persists
//! documents through a [`PlanRepository`] and labels graph nodes from a
//! [`MetricRegistry`] and a [`ComponentRegistry`]. Two implementations ship
//! with the crate:
//!
//! - [`SqliteRepository`]: a SQLite file, used by the CLI
//! - [`MemoryRepository`]: process-local maps, for embedding and tests
//!
//! All methods are async; blocking implementations move their work onto
//! `tokio::task::spawn_blocking`.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{ComponentMeta, MetricMeta, PlanSummary, ScalingPlanDocument},
};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

/// Storage of scaling plan documents.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Fetches the document stored under `id`, with its `db_id` set.
    async fn get(&self, id: &str) -> Result<Option<ScalingPlanDocument>>;

    /// Lists every stored plan.
    async fn list(&self) -> Result<Vec<PlanSummary>>;

    /// Stores a new document and returns its storage identifier.
    async fn create(&self, document: &ScalingPlanDocument) -> Result<String>;

    /// Replaces the document identified by its `db_id`.
    async fn update(&self, document: &ScalingPlanDocument) -> Result<()>;

    /// Deletes the plan; returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Source of metric metadata.
#[async_trait]
pub trait MetricRegistry: Send + Sync {
    async fn list_metrics(&self) -> Result<Vec<MetricMeta>>;
}

/// Source of scaling component metadata.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    async fn list_components(&self) -> Result<Vec<ComponentMeta>>;
}
