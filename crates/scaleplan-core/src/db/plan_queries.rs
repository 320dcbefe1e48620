//! Plan document CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    codec::{self, CodecMode},
    error::{DatabaseResultExt, Result, ScalingPlanError},
    models::{PlanSummary, ScalingPlanDocument},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (plan_id, title, enabled, item_count, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)";
const SELECT_PLAN_SQL: &str = "SELECT db_id, document FROM plans WHERE plan_id = ?1";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE plan_id = ?1)";
const UPDATE_PLAN_SQL: &str = "UPDATE plans SET title = ?1, enabled = ?2, item_count = ?3, document = ?4, updated_at = ?5 WHERE db_id = ?6 AND plan_id = ?7";
const LIST_PLANS_SQL: &str =
    "SELECT db_id, plan_id, title, enabled, item_count, updated_at FROM plans ORDER BY plan_id";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE plan_id = ?1";

impl super::Database {
    /// Stores a new document and returns its row id as the storage identifier.
    pub fn insert_plan(&mut self, document: &ScalingPlanDocument) -> Result<String> {
        let yaml = codec::to_yaml(document, CodecMode::Persistence)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![&document.id], |row| row.get(0))
            .db_context("Failed to check plan existence")?;
        if exists {
            return Err(ScalingPlanError::PlanExists {
                id: document.id.clone(),
            });
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            INSERT_PLAN_SQL,
            params![
                &document.id,
                document.metadata.title.as_deref(),
                document.enabled,
                item_count(document),
                &yaml,
                &now
            ],
        )
        .db_context("Failed to insert plan")?;

        let db_id = tx.last_insert_rowid();
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(db_id.to_string())
    }

    /// Retrieves a document by plan id, with `db_id` taken from the row.
    pub fn get_plan(&self, plan_id: &str) -> Result<Option<ScalingPlanDocument>> {
        let row: Option<(i64, String)> = self
            .connection
            .query_row(SELECT_PLAN_SQL, params![plan_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to query plan")?;

        row.map(|(db_id, yaml)| {
            let mut document = codec::parse(&yaml)?;
            document.db_id = Some(db_id.to_string());
            Ok(document)
        })
        .transpose()
    }

    /// Replaces the stored document identified by its `db_id`.
    pub fn update_plan(&mut self, document: &ScalingPlanDocument) -> Result<()> {
        let db_id = document
            .db_id
            .as_deref()
            .ok_or_else(|| {
                ScalingPlanError::invalid_input("db_id")
                    .with_reason("document has not been persisted yet")
            })?
            .parse::<i64>()
            .map_err(|_| {
                ScalingPlanError::invalid_input("db_id").with_reason("not a storage identifier")
            })?;

        let yaml = codec::to_yaml(document, CodecMode::Persistence)?;
        let updated = self
            .connection
            .execute(
                UPDATE_PLAN_SQL,
                params![
                    document.metadata.title.as_deref(),
                    document.enabled,
                    item_count(document),
                    &yaml,
                    Timestamp::now().to_string(),
                    db_id,
                    &document.id
                ],
            )
            .db_context("Failed to update plan")?;

        if updated == 0 {
            return Err(ScalingPlanError::PlanNotFound {
                id: document.id.clone(),
            });
        }
        Ok(())
    }

    /// Lists stored plans ordered by plan id.
    pub fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        let mut stmt = self
            .connection
            .prepare(LIST_PLANS_SQL)
            .db_context("Failed to prepare query")?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(PlanSummary {
                    db_id: row.get::<_, i64>(0)?.to_string(),
                    id: row.get(1)?,
                    title: row.get(2)?,
                    enabled: row.get(3)?,
                    item_count: row.get(4)?,
                    updated_at: row.get::<_, String>(5)?.parse::<Timestamp>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                    })?,
                })
            })
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read plan row")?;

        Ok(summaries)
    }

    /// Deletes a plan; returns whether a row was removed.
    pub fn delete_plan(&mut self, plan_id: &str) -> Result<bool> {
        let deleted = self
            .connection
            .execute(DELETE_PLAN_SQL, params![plan_id])
            .db_context("Failed to delete plan")?;
        Ok(deleted > 0)
    }
}

fn item_count(document: &ScalingPlanDocument) -> i64 {
    i64::try_from(document.items.len()).unwrap_or(i64::MAX)
}
