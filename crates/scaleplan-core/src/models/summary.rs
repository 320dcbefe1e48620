//! Plan summary types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ScalingPlanDocument;

/// Listing row for a persisted plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Plan ID
    pub id: String,
    /// Storage identifier
    pub db_id: String,
    /// Title from the plan metadata
    pub title: Option<String>,
    pub enabled: bool,
    /// Number of plan items
    pub item_count: u32,
    /// Last persisted update
    pub updated_at: Timestamp,
}

impl PlanSummary {
    /// Create a PlanSummary from a persisted document
    pub fn from_document(
        document: &ScalingPlanDocument,
        db_id: impl Into<String>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id: document.id.clone(),
            db_id: db_id.into(),
            title: document.metadata.title.clone(),
            enabled: document.enabled,
            item_count: u32::try_from(document.items.len()).unwrap_or(u32::MAX),
            updated_at,
        }
    }
}
